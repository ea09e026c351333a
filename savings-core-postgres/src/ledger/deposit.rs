use chrono::Utc;
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use uuid::Uuid;

use savings_core_api::{DepositCommand, LedgerError, LedgerResult};
use savings_core_db::models::savings::breakdown::DepositBreakdown;
use savings_core_db::models::savings::savings_transaction::{
    SavingsTransactionModel, TransactionStatus, TransactionType,
};
use savings_core_db::repository::create_batch::CreateBatch;

use super::ledger_impl::SavingsLedger;

impl SavingsLedger {
    pub(super) async fn deposit_impl(
        &self,
        command: DepositCommand,
    ) -> LedgerResult<SavingsTransactionModel> {
        let plan = self.load_plan(command.plan_id).await?;
        if !plan.is_active() {
            return Err(LedgerError::PlanNotActive(plan.status.as_str().to_string()));
        }

        // Rejects non-positive amounts with InvalidAmount.
        let breakdown = DepositBreakdown::compute(command.amount, plan.charge_rate)?;

        let payment_reference = command
            .payment_reference
            .as_deref()
            .map(HeaplessString::try_from)
            .transpose()
            .map_err(|_| {
                LedgerError::InvalidPlan("payment reference exceeds 100 characters".to_string())
            })?;

        let transaction = SavingsTransactionModel {
            id: Uuid::new_v4(),
            plan_id: plan.id,
            person_id: command.person_id,
            transaction_type: TransactionType::Deposit,
            gross_amount: breakdown.gross,
            charge_amount: breakdown.charge,
            penalty_amount: Decimal::ZERO,
            net_amount: breakdown.net,
            early_withdrawal: false,
            payment_reference,
            status: TransactionStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            antecedent_hash: 0,
            antecedent_audit_log_id: Uuid::nil(),
            hash: 0,
            audit_log_id: None,
        };

        let audit_log = self.begin_audit(command.person_id).await?;
        let saved = self
            .savings_transaction_repository
            .create_batch(vec![transaction], Some(audit_log.id))
            .await?;
        let transaction = saved.into_iter().next().ok_or_else(|| {
            LedgerError::Database("deposit creation returned no entity".to_string())
        })?;

        tracing::info!(
            transaction_id = %transaction.id,
            plan_id = %plan.id,
            gross_amount = %transaction.gross_amount,
            charge_amount = %transaction.charge_amount,
            "recorded pending deposit"
        );

        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{create_plan_command, setup_test_context};
    use rust_decimal::Decimal;
    use savings_core_api::{DepositCommand, LedgerError, SavingsLedgerService};
    use savings_core_db::models::savings::savings_transaction::{
        TransactionStatus, TransactionType,
    };
    use uuid::Uuid;

    #[tokio::test]
    async fn test_deposit_computes_charge() -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    {
        let ctx = setup_test_context().await?;
        let ledger = ctx.ledger();

        let owner = Uuid::new_v4();
        let plan = ledger
            .create_plan(create_plan_command(owner, Decimal::new(100_000, 0)))
            .await?;

        let transaction = ledger
            .deposit(DepositCommand {
                plan_id: plan.id,
                person_id: owner,
                amount: Decimal::new(10_000, 0),
                payment_reference: Some("PAY-001".to_string()),
            })
            .await?;

        assert_eq!(transaction.transaction_type, TransactionType::Deposit);
        assert_eq!(transaction.status, TransactionStatus::Pending);
        assert_eq!(transaction.gross_amount, Decimal::new(10_000, 0));
        assert_eq!(transaction.charge_amount, Decimal::new(200, 0));
        assert_eq!(transaction.net_amount, Decimal::new(9_800, 0));
        assert_eq!(
            transaction.net_amount + transaction.charge_amount,
            transaction.gross_amount
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_deposit_rejects_non_positive_amount(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let ledger = ctx.ledger();

        let owner = Uuid::new_v4();
        let plan = ledger
            .create_plan(create_plan_command(owner, Decimal::new(100_000, 0)))
            .await?;

        let result = ledger
            .deposit(DepositCommand {
                plan_id: plan.id,
                person_id: owner,
                amount: Decimal::ZERO,
                payment_reference: None,
            })
            .await;

        assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_deposit_rejects_inactive_plan(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let ledger = ctx.ledger();

        let owner = Uuid::new_v4();
        let plan = ledger
            .create_plan(create_plan_command(owner, Decimal::new(100_000, 0)))
            .await?;
        ledger.cancel_plan(plan.id, owner).await?;

        let result = ledger
            .deposit(DepositCommand {
                plan_id: plan.id,
                person_id: owner,
                amount: Decimal::new(1_000, 0),
                payment_reference: None,
            })
            .await;

        assert!(matches!(result, Err(LedgerError::PlanNotActive(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_deposit_unknown_plan() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let ledger = ctx.ledger();

        let result = ledger
            .deposit(DepositCommand {
                plan_id: Uuid::new_v4(),
                person_id: Uuid::new_v4(),
                amount: Decimal::new(1_000, 0),
                payment_reference: None,
            })
            .await;

        assert!(matches!(result, Err(LedgerError::NotFound(_))));

        Ok(())
    }
}
