use uuid::Uuid;

use savings_core_api::{LedgerError, LedgerResult};
use savings_core_db::models::savings::savings_transaction::SavingsTransactionModel;
use savings_core_db::repository::update_batch::UpdateBatch;

use super::ledger_impl::SavingsLedger;

impl SavingsLedger {
    /// Payment failure callback: the transaction is closed, the plan is untouched.
    pub(super) async fn fail_transaction_impl(
        &self,
        transaction_id: Uuid,
    ) -> LedgerResult<SavingsTransactionModel> {
        let mut transaction = self.load_transaction(transaction_id).await?;
        transaction.fail()?;

        let audit_log = self.begin_audit(transaction.person_id).await?;
        let updated = self
            .savings_transaction_repository
            .update_batch(vec![transaction], Some(audit_log.id))
            .await?;

        let transaction = updated.into_iter().next().ok_or_else(|| {
            LedgerError::Database("transaction settlement returned no entity".to_string())
        })?;

        tracing::info!(
            transaction_id = %transaction.id,
            plan_id = %transaction.plan_id,
            "failed savings transaction"
        );

        Ok(transaction)
    }
}
