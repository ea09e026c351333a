use uuid::Uuid;

use savings_core_api::{LedgerError, LedgerResult};
use savings_core_db::models::savings::savings_plan::SavingsPlanModel;
use savings_core_db::repository::update_batch::UpdateBatch;

use super::ledger_impl::SavingsLedger;

impl SavingsLedger {
    /// Cancel an active plan. Any remaining balance stays on the plan for
    /// the refund process that sits outside this crate.
    pub(super) async fn cancel_plan_impl(
        &self,
        plan_id: Uuid,
        cancelled_by: Uuid,
    ) -> LedgerResult<SavingsPlanModel> {
        let mut plan = self.load_plan(plan_id).await?;
        plan.cancel()?;

        let audit_log = self.begin_audit(cancelled_by).await?;
        let updated = self
            .savings_plan_repository
            .update_batch(vec![plan], Some(audit_log.id))
            .await?;

        let plan = updated.into_iter().next().ok_or_else(|| {
            LedgerError::Database("plan cancellation returned no entity".to_string())
        })?;

        tracing::info!(
            plan_id = %plan.id,
            remaining_amount = %plan.current_amount,
            "cancelled savings plan"
        );

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{create_plan_command, setup_test_context};
    use rust_decimal::Decimal;
    use savings_core_api::{LedgerError, SavingsLedgerService};
    use savings_core_db::models::savings::savings_plan::PlanStatus;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_cancel_plan() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let ledger = ctx.ledger();

        let owner = Uuid::new_v4();
        let plan = ledger
            .create_plan(create_plan_command(owner, Decimal::new(100_000, 0)))
            .await?;

        let cancelled = ledger.cancel_plan(plan.id, owner).await?;
        assert_eq!(cancelled.status, PlanStatus::Cancelled);

        // Cancellation is terminal.
        let result = ledger.cancel_plan(plan.id, owner).await;
        assert!(matches!(result, Err(LedgerError::PlanNotActive(_))));

        Ok(())
    }
}
