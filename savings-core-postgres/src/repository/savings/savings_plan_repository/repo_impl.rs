use async_trait::async_trait;
use parking_lot::RwLock as ParkingRwLock;
use postgres_index_cache::TransactionAwareIdxModelCache;
use postgres_unit_of_work::{Executor, TransactionAware, TransactionResult};
use sqlx::{postgres::PgRow, Row};
use std::error::Error;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::utils::{get_optional_heapless_string, TryFromRow};
use savings_core_db::models::savings::savings_plan::{SavingsPlanIdxModel, SavingsPlanModel};

pub struct SavingsPlanRepositoryImpl {
    pub executor: Executor,
    pub savings_plan_idx_cache: Arc<RwLock<TransactionAwareIdxModelCache<SavingsPlanIdxModel>>>,
}

impl SavingsPlanRepositoryImpl {
    pub fn new(
        executor: Executor,
        savings_plan_idx_cache: Arc<ParkingRwLock<savings_core_db::IdxModelCache<SavingsPlanIdxModel>>>,
    ) -> Self {
        Self {
            executor,
            savings_plan_idx_cache: Arc::new(RwLock::new(TransactionAwareIdxModelCache::new(
                savings_plan_idx_cache,
            ))),
        }
    }
}

#[async_trait]
impl TransactionAware for SavingsPlanRepositoryImpl {
    async fn on_commit(&self) -> TransactionResult<()> {
        self.savings_plan_idx_cache.read().await.on_commit().await
    }

    async fn on_rollback(&self) -> TransactionResult<()> {
        self.savings_plan_idx_cache.read().await.on_rollback().await
    }
}

impl TryFromRow<PgRow> for SavingsPlanModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(SavingsPlanModel {
            id: row.get("id"),
            owner_person_id: row.get("owner_person_id"),
            property_id: row.try_get("property_id")?,
            external_property: row.get("external_property"),
            external_property_details: get_optional_heapless_string(row, "external_property_details")?,
            target_amount: row.get("target_amount"),
            current_amount: row.get("current_amount"),
            due_date: row.get("due_date"),
            status: row.get("status"),
            penalty_rate: row.get("penalty_rate"),
            charge_rate: row.get("charge_rate"),
            created_at: row.get("created_at"),
            antecedent_hash: row.get("antecedent_hash"),
            antecedent_audit_log_id: row.get("antecedent_audit_log_id"),
            hash: row.get("hash"),
            audit_log_id: row.try_get("audit_log_id")?,
        })
    }
}

