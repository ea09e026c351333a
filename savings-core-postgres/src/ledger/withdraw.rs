use chrono::Utc;
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use uuid::Uuid;

use savings_core_api::{LedgerError, LedgerResult, WithdrawCommand};
use savings_core_db::models::savings::breakdown::WithdrawalBreakdown;
use savings_core_db::models::savings::savings_plan::PlanStatus;
use savings_core_db::models::savings::savings_transaction::{
    SavingsTransactionModel, TransactionStatus, TransactionType,
};
use savings_core_db::repository::create_batch::CreateBatch;

use super::ledger_impl::SavingsLedger;

impl SavingsLedger {
    pub(super) async fn withdraw_impl(
        &self,
        command: WithdrawCommand,
    ) -> LedgerResult<SavingsTransactionModel> {
        let plan = self.load_plan(command.plan_id).await?;
        if plan.status == PlanStatus::Cancelled {
            return Err(LedgerError::PlanNotActive(plan.status.as_str().to_string()));
        }

        // Before the due date the withdrawal is early and carries the plan's
        // penalty rate; the penalty is retained by the platform.
        let today = Utc::now().date_naive();
        let early = !plan.is_matured(today);
        let breakdown = WithdrawalBreakdown::compute(command.amount, plan.penalty_rate, early)?;

        if breakdown.requested > plan.current_amount {
            return Err(LedgerError::InsufficientFunds {
                requested: breakdown.requested,
                available: plan.current_amount,
            });
        }

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
            transaction_type: TransactionType::Withdrawal,
            gross_amount: breakdown.requested,
            charge_amount: Decimal::ZERO,
            penalty_amount: breakdown.penalty,
            net_amount: breakdown.net,
            early_withdrawal: breakdown.early,
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
            LedgerError::Database("withdrawal creation returned no entity".to_string())
        })?;

        tracing::info!(
            transaction_id = %transaction.id,
            plan_id = %plan.id,
            requested_amount = %transaction.gross_amount,
            penalty_amount = %transaction.penalty_amount,
            early_withdrawal = transaction.early_withdrawal,
            "recorded pending withdrawal"
        );

        Ok(transaction)
    }
}
