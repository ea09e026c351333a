use chrono::Utc;
use uuid::Uuid;

use savings_core_api::{LedgerError, LedgerResult};
use savings_core_db::models::savings::savings_transaction::{
    SavingsTransactionModel, TransactionType,
};
use savings_core_db::repository::update_batch::UpdateBatch;

use super::ledger_impl::SavingsLedger;

impl SavingsLedger {
    /// Payment confirmation callback: settle the pending transaction and
    /// apply its effect to the plan balance.
    ///
    /// All state checks run on in-memory copies before anything is written,
    /// and both rows land in the shared database transaction, so a failure
    /// at any point leaves ledger and transaction record consistent.
    pub(super) async fn confirm_transaction_impl(
        &self,
        transaction_id: Uuid,
    ) -> LedgerResult<SavingsTransactionModel> {
        let mut transaction = self.load_transaction(transaction_id).await?;
        let mut plan = self.load_plan(transaction.plan_id).await?;

        transaction.complete(Utc::now())?;

        match transaction.transaction_type {
            TransactionType::Deposit => {
                let completed = plan.apply_deposit(transaction.net_amount)?;
                if completed {
                    tracing::info!(plan_id = %plan.id, "savings plan reached its target");
                }
            }
            TransactionType::Withdrawal => {
                // Re-checks funds against the current balance; a shortfall
                // fails the confirmation without partial application.
                plan.apply_withdrawal(transaction.gross_amount)?;
            }
        }

        let audit_log = self.begin_audit(transaction.person_id).await?;
        let updated_transactions = self
            .savings_transaction_repository
            .update_batch(vec![transaction], Some(audit_log.id))
            .await?;
        self.savings_plan_repository
            .update_batch(vec![plan], Some(audit_log.id))
            .await?;

        let transaction = updated_transactions.into_iter().next().ok_or_else(|| {
            LedgerError::Database("transaction settlement returned no entity".to_string())
        })?;

        tracing::info!(
            transaction_id = %transaction.id,
            plan_id = %transaction.plan_id,
            net_amount = %transaction.net_amount,
            "confirmed savings transaction"
        );

        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{create_plan_command, fund_plan, setup_test_context};
    use rust_decimal::Decimal;
    use savings_core_api::{DepositCommand, LedgerError, SavingsLedgerService, WithdrawCommand};
    use savings_core_db::models::savings::savings_plan::PlanStatus;
    use savings_core_db::models::savings::savings_transaction::TransactionStatus;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_confirm_deposit_updates_balance(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
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
                payment_reference: None,
            })
            .await?;

        let confirmed = ledger.confirm_transaction(transaction.id).await?;
        assert_eq!(confirmed.status, TransactionStatus::Completed);
        assert!(confirmed.completed_at.is_some());

        let plan = ctx.load_plan(plan.id).await?;
        assert_eq!(plan.current_amount, Decimal::new(9_800, 0));
        assert_eq!(plan.status, PlanStatus::Active);

        Ok(())
    }

    #[tokio::test]
    async fn test_confirm_is_not_idempotent(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
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
                payment_reference: None,
            })
            .await?;
        ledger.confirm_transaction(transaction.id).await?;

        // A duplicate gateway callback must not double-apply.
        let result = ledger.confirm_transaction(transaction.id).await;
        assert!(matches!(result, Err(LedgerError::TransactionNotPending(_))));

        let plan = ctx.load_plan(plan.id).await?;
        assert_eq!(plan.current_amount, Decimal::new(9_800, 0));

        Ok(())
    }

    #[tokio::test]
    async fn test_deposit_to_target_completes_plan_exactly_once(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let ledger = ctx.ledger();

        let owner = Uuid::new_v4();
        let plan = ledger
            .create_plan(create_plan_command(owner, Decimal::new(9_800, 0)))
            .await?;

        // 10000 gross nets exactly the 9800 target after the 2% charge.
        fund_plan(ledger, &plan, owner, Decimal::new(10_000, 0)).await?;

        let plan = ctx.load_plan(plan.id).await?;
        assert_eq!(plan.status, PlanStatus::Completed);
        assert_eq!(plan.current_amount, Decimal::new(9_800, 0));

        // Further deposits are refused rather than re-completing the plan.
        let result = ledger
            .deposit(DepositCommand {
                plan_id: plan.id,
                person_id: owner,
                amount: Decimal::new(100, 0),
                payment_reference: None,
            })
            .await;
        assert!(matches!(result, Err(LedgerError::PlanNotActive(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_confirm_withdrawal_debits_balance(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let ledger = ctx.ledger();

        let owner = Uuid::new_v4();
        let plan = ledger
            .create_plan(create_plan_command(owner, Decimal::new(100_000, 0)))
            .await?;
        fund_plan(ledger, &plan, owner, Decimal::new(10_000, 0)).await?;

        let withdrawal = ledger
            .withdraw(WithdrawCommand {
                plan_id: plan.id,
                person_id: owner,
                amount: Decimal::new(4_000, 0),
                payment_reference: None,
            })
            .await?;
        ledger.confirm_transaction(withdrawal.id).await?;

        // The full requested amount leaves the plan; the penalty is retained
        // by the platform, not credited back.
        let plan = ctx.load_plan(plan.id).await?;
        assert_eq!(plan.current_amount, Decimal::new(5_800, 0));

        Ok(())
    }

    #[tokio::test]
    async fn test_confirm_withdrawal_rechecks_funds(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let ledger = ctx.ledger();

        let owner = Uuid::new_v4();
        let plan = ledger
            .create_plan(create_plan_command(owner, Decimal::new(100_000, 0)))
            .await?;
        fund_plan(ledger, &plan, owner, Decimal::new(10_000, 0)).await?;

        // Two pending withdrawals that only one balance can honour.
        let first = ledger
            .withdraw(WithdrawCommand {
                plan_id: plan.id,
                person_id: owner,
                amount: Decimal::new(9_000, 0),
                payment_reference: None,
            })
            .await?;
        let second = ledger
            .withdraw(WithdrawCommand {
                plan_id: plan.id,
                person_id: owner,
                amount: Decimal::new(9_000, 0),
                payment_reference: None,
            })
            .await?;

        ledger.confirm_transaction(first.id).await?;
        let result = ledger.confirm_transaction(second.id).await;
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds { .. })
        ));

        // The failed confirmation left the balance untouched.
        let plan = ctx.load_plan(plan.id).await?;
        assert_eq!(plan.current_amount, Decimal::new(800, 0));

        Ok(())
    }
}
