use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use savings_core_api::{
    CreatePlanCommand, DepositCommand, LedgerError, LedgerResult, SavingsLedgerService,
    WithdrawCommand,
};
use savings_core_db::models::audit::AuditLogModel;
use savings_core_db::models::savings::savings_plan::SavingsPlanModel;
use savings_core_db::models::savings::savings_transaction::SavingsTransactionModel;
use savings_core_db::repository::load_batch::LoadBatch;

use crate::repository::audit::audit_log_repository::AuditLogRepositoryImpl;
use crate::repository::savings::{SavingsPlanRepositoryImpl, SavingsTransactionRepositoryImpl};

/// Orchestrates the savings lifecycle over repositories sharing one
/// unit-of-work transaction.
///
/// Each operation creates its own audit log, threads it through every write,
/// and leaves the plan balance and the transaction record consistent within
/// the shared database transaction. Commit and rollback belong to the caller
/// that opened the unit of work.
pub struct SavingsLedger {
    pub(super) audit_log_repository: Arc<AuditLogRepositoryImpl>,
    pub(super) savings_plan_repository: Arc<SavingsPlanRepositoryImpl>,
    pub(super) savings_transaction_repository: Arc<SavingsTransactionRepositoryImpl>,
}

impl SavingsLedger {
    pub fn new(
        audit_log_repository: Arc<AuditLogRepositoryImpl>,
        savings_plan_repository: Arc<SavingsPlanRepositoryImpl>,
        savings_transaction_repository: Arc<SavingsTransactionRepositoryImpl>,
    ) -> Self {
        Self {
            audit_log_repository,
            savings_plan_repository,
            savings_transaction_repository,
        }
    }

    /// One audit log per ledger unit of work; every entity written in the
    /// operation references it.
    pub(super) async fn begin_audit(&self, actor_person_id: Uuid) -> LedgerResult<AuditLogModel> {
        let audit_log = AuditLogModel {
            id: Uuid::new_v4(),
            updated_at: Utc::now(),
            updated_by_person_id: actor_person_id,
        };
        self.audit_log_repository.create(&audit_log).await?;
        Ok(audit_log)
    }

    pub(super) async fn load_plan(&self, plan_id: Uuid) -> LedgerResult<SavingsPlanModel> {
        let plans = self.savings_plan_repository.load_batch(&[plan_id]).await?;
        plans
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| LedgerError::NotFound(format!("savings plan {plan_id}")))
    }

    pub(super) async fn load_transaction(
        &self,
        transaction_id: Uuid,
    ) -> LedgerResult<SavingsTransactionModel> {
        let transactions = self
            .savings_transaction_repository
            .load_batch(&[transaction_id])
            .await?;
        transactions
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| LedgerError::NotFound(format!("savings transaction {transaction_id}")))
    }
}

#[async_trait]
impl SavingsLedgerService for SavingsLedger {
    type Plan = SavingsPlanModel;
    type Transaction = SavingsTransactionModel;

    async fn create_plan(&self, command: CreatePlanCommand) -> LedgerResult<SavingsPlanModel> {
        Self::create_plan_impl(self, command).await
    }

    async fn deposit(&self, command: DepositCommand) -> LedgerResult<SavingsTransactionModel> {
        Self::deposit_impl(self, command).await
    }

    async fn withdraw(&self, command: WithdrawCommand) -> LedgerResult<SavingsTransactionModel> {
        Self::withdraw_impl(self, command).await
    }

    async fn confirm_transaction(
        &self,
        transaction_id: Uuid,
    ) -> LedgerResult<SavingsTransactionModel> {
        Self::confirm_transaction_impl(self, transaction_id).await
    }

    async fn fail_transaction(
        &self,
        transaction_id: Uuid,
    ) -> LedgerResult<SavingsTransactionModel> {
        Self::fail_transaction_impl(self, transaction_id).await
    }

    async fn cancel_plan(&self, plan_id: Uuid, cancelled_by: Uuid) -> LedgerResult<SavingsPlanModel> {
        Self::cancel_plan_impl(self, plan_id, cancelled_by).await
    }

    async fn mature_plan(&self, plan_id: Uuid, matured_by: Uuid) -> LedgerResult<SavingsPlanModel> {
        Self::mature_plan_impl(self, plan_id, matured_by).await
    }
}
