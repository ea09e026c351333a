use chrono::Utc;
use uuid::Uuid;

use savings_core_api::{LedgerError, LedgerResult};
use savings_core_db::models::savings::savings_plan::SavingsPlanModel;
use savings_core_db::repository::update_batch::UpdateBatch;

use super::ledger_impl::SavingsLedger;

impl SavingsLedger {
    /// Transition an active plan to completed once its due date has passed,
    /// making the balance eligible for penalty-free payout.
    pub(super) async fn mature_plan_impl(
        &self,
        plan_id: Uuid,
        matured_by: Uuid,
    ) -> LedgerResult<SavingsPlanModel> {
        let mut plan = self.load_plan(plan_id).await?;
        plan.mature(Utc::now().date_naive())?;

        let audit_log = self.begin_audit(matured_by).await?;
        let updated = self
            .savings_plan_repository
            .update_batch(vec![plan], Some(audit_log.id))
            .await?;

        let plan = updated.into_iter().next().ok_or_else(|| {
            LedgerError::Database("plan maturity returned no entity".to_string())
        })?;

        tracing::info!(
            plan_id = %plan.id,
            current_amount = %plan.current_amount,
            "matured savings plan"
        );

        Ok(plan)
    }
}
