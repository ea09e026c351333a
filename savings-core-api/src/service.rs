use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CreatePlanCommand, DepositCommand, WithdrawCommand};
use crate::error::LedgerResult;

/// The narrow interface the rest of the platform calls the savings ledger
/// through. The payment-initiation service records deposits and withdrawals
/// as pending transactions; the payment gateway callback settles them via
/// `confirm_transaction` / `fail_transaction`.
///
/// Associated types let the storage crate expose its own entity models
/// without this crate depending on them.
#[async_trait]
pub trait SavingsLedgerService: Send + Sync {
    type Plan;
    type Transaction;

    /// Open a new savings plan for a tenant.
    async fn create_plan(&self, command: CreatePlanCommand) -> LedgerResult<Self::Plan>;

    /// Record a funding attempt as a pending deposit transaction.
    async fn deposit(&self, command: DepositCommand) -> LedgerResult<Self::Transaction>;

    /// Record a withdrawal attempt as a pending withdrawal transaction.
    async fn withdraw(&self, command: WithdrawCommand) -> LedgerResult<Self::Transaction>;

    /// Settle a pending transaction after payment confirmation, applying its
    /// net effect to the plan balance atomically.
    async fn confirm_transaction(&self, transaction_id: Uuid) -> LedgerResult<Self::Transaction>;

    /// Mark a pending transaction as failed; the plan balance is untouched.
    async fn fail_transaction(&self, transaction_id: Uuid) -> LedgerResult<Self::Transaction>;

    /// Cancel an active plan.
    async fn cancel_plan(&self, plan_id: Uuid, cancelled_by: Uuid) -> LedgerResult<Self::Plan>;

    /// Transition an active plan to completed once its due date has passed.
    async fn mature_plan(&self, plan_id: Uuid, matured_by: Uuid) -> LedgerResult<Self::Plan>;
}
