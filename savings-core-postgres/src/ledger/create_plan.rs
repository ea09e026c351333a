use chrono::Utc;
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use savings_core_api::{CreatePlanCommand, LedgerError, LedgerResult};
use savings_core_db::models::savings::savings_plan::{PlanStatus, SavingsPlanModel};
use savings_core_db::repository::create_batch::CreateBatch;

use super::ledger_impl::SavingsLedger;

impl SavingsLedger {
    pub(super) async fn create_plan_impl(
        &self,
        command: CreatePlanCommand,
    ) -> LedgerResult<SavingsPlanModel> {
        command
            .validate()
            .map_err(|e| LedgerError::InvalidPlan(e.to_string()))?;

        let today = Utc::now().date_naive();
        if command.due_date <= today {
            return Err(LedgerError::InvalidPlan(format!(
                "due date {} is not in the future",
                command.due_date
            )));
        }

        let external_property_details = command
            .external_property_details
            .as_deref()
            .map(HeaplessString::try_from)
            .transpose()
            .map_err(|_| {
                LedgerError::InvalidPlan("external property details exceed 200 characters".to_string())
            })?;

        let plan = SavingsPlanModel {
            id: Uuid::new_v4(),
            owner_person_id: command.owner_person_id,
            property_id: command.property_id,
            external_property: command.external_property,
            external_property_details,
            target_amount: command.target_amount,
            current_amount: Decimal::ZERO,
            due_date: command.due_date,
            status: PlanStatus::Active,
            penalty_rate: command.penalty_rate,
            charge_rate: command.charge_rate,
            created_at: Utc::now(),
            antecedent_hash: 0,
            antecedent_audit_log_id: Uuid::nil(),
            hash: 0,
            audit_log_id: None,
        };

        let audit_log = self.begin_audit(command.owner_person_id).await?;
        let saved = self
            .savings_plan_repository
            .create_batch(vec![plan], Some(audit_log.id))
            .await?;
        let plan = saved
            .into_iter()
            .next()
            .ok_or_else(|| LedgerError::Database("plan creation returned no entity".to_string()))?;

        tracing::info!(
            plan_id = %plan.id,
            owner_person_id = %plan.owner_person_id,
            target_amount = %plan.target_amount,
            due_date = %plan.due_date,
            "opened savings plan"
        );

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{create_plan_command, setup_test_context};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use savings_core_api::{LedgerError, SavingsLedgerService};
    use savings_core_db::models::savings::savings_plan::PlanStatus;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_create_plan() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let ledger = ctx.ledger();

        let command = create_plan_command(Uuid::new_v4(), Decimal::new(100_000, 0));
        let plan = ledger.create_plan(command.clone()).await?;

        assert_eq!(plan.owner_person_id, command.owner_person_id);
        assert_eq!(plan.target_amount, Decimal::new(100_000, 0));
        assert_eq!(plan.current_amount, Decimal::ZERO);
        assert_eq!(plan.status, PlanStatus::Active);
        assert_eq!(plan.penalty_rate, Decimal::new(5, 0));
        assert_eq!(plan.charge_rate, Decimal::new(2, 0));
        assert!(plan.audit_log_id.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_plan_rejects_past_due_date(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let ledger = ctx.ledger();

        let mut command = create_plan_command(Uuid::new_v4(), Decimal::new(100_000, 0));
        command.due_date = (Utc::now() - Duration::days(1)).date_naive();

        let result = ledger.create_plan(command).await;
        assert!(matches!(result, Err(LedgerError::InvalidPlan(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_plan_rejects_non_positive_target(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let ledger = ctx.ledger();

        let command = create_plan_command(Uuid::new_v4(), Decimal::ZERO);

        let result = ledger.create_plan(command).await;
        assert!(matches!(result, Err(LedgerError::InvalidPlan(_))));

        Ok(())
    }
}
