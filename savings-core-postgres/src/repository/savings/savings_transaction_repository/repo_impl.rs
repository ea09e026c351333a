use async_trait::async_trait;
use parking_lot::RwLock as ParkingRwLock;
use postgres_index_cache::TransactionAwareIdxModelCache;
use postgres_unit_of_work::{Executor, TransactionAware, TransactionResult};
use sqlx::{postgres::PgRow, Row};
use std::error::Error;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::utils::{get_optional_heapless_string, TryFromRow};
use savings_core_db::models::savings::savings_transaction::{
    SavingsTransactionIdxModel, SavingsTransactionModel,
};

pub struct SavingsTransactionRepositoryImpl {
    pub executor: Executor,
    pub savings_transaction_idx_cache:
        Arc<RwLock<TransactionAwareIdxModelCache<SavingsTransactionIdxModel>>>,
}

impl SavingsTransactionRepositoryImpl {
    pub fn new(
        executor: Executor,
        savings_transaction_idx_cache: Arc<
            ParkingRwLock<savings_core_db::IdxModelCache<SavingsTransactionIdxModel>>,
        >,
    ) -> Self {
        Self {
            executor,
            savings_transaction_idx_cache: Arc::new(RwLock::new(
                TransactionAwareIdxModelCache::new(savings_transaction_idx_cache),
            )),
        }
    }
}

#[async_trait]
impl TransactionAware for SavingsTransactionRepositoryImpl {
    async fn on_commit(&self) -> TransactionResult<()> {
        self.savings_transaction_idx_cache
            .read()
            .await
            .on_commit()
            .await
    }

    async fn on_rollback(&self) -> TransactionResult<()> {
        self.savings_transaction_idx_cache
            .read()
            .await
            .on_rollback()
            .await
    }
}

impl TryFromRow<PgRow> for SavingsTransactionModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(SavingsTransactionModel {
            id: row.get("id"),
            plan_id: row.get("plan_id"),
            person_id: row.get("person_id"),
            transaction_type: row.get("transaction_type"),
            gross_amount: row.get("gross_amount"),
            charge_amount: row.get("charge_amount"),
            penalty_amount: row.get("penalty_amount"),
            net_amount: row.get("net_amount"),
            early_withdrawal: row.get("early_withdrawal"),
            payment_reference: get_optional_heapless_string(row, "payment_reference")?,
            status: row.get("status"),
            created_at: row.get("created_at"),
            completed_at: row.try_get("completed_at")?,
            antecedent_hash: row.get("antecedent_hash"),
            antecedent_audit_log_id: row.get("antecedent_audit_log_id"),
            hash: row.get("hash"),
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}

