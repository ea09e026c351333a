use std::error::Error;

use savings_core_db::models::savings::savings_transaction::SavingsTransactionIdxModel;

use super::repo_impl::SavingsTransactionRepositoryImpl;

impl SavingsTransactionRepositoryImpl {
    /// Lookup used by the payment-confirmation callback, which only knows
    /// the gateway reference it handed out at initiation time.
    pub async fn find_by_payment_reference_hash(
        &self,
        payment_reference_hash: i64,
    ) -> Result<Vec<SavingsTransactionIdxModel>, Box<dyn Error + Send + Sync>> {
        let cache = self.savings_transaction_idx_cache.read().await;
        let items = cache.get_by_i64_index("payment_reference_hash", &payment_reference_hash);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::savings::savings_plan_repository::test_utils::create_test_savings_plan;
    use crate::repository::savings::savings_transaction_repository::test_utils::create_test_deposit_transaction_with_reference;
    use crate::test_helper::{create_test_audit_log, setup_test_context};
    use savings_core_db::models::savings::savings_transaction::hash_payment_reference;
    use savings_core_db::repository::create_batch::CreateBatch;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_find_by_payment_reference_hash(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let audit_log_repo = &ctx.audit_repos().audit_log_repository;
        let plan_repo = &ctx.savings_repos().savings_plan_repository;
        let transaction_repo = &ctx.savings_repos().savings_transaction_repository;

        let audit_log = create_test_audit_log();
        audit_log_repo.create(&audit_log).await?;

        let owner = Uuid::new_v4();
        let plan = create_test_savings_plan(owner, None);
        let saved_plans = plan_repo.create_batch(vec![plan], Some(audit_log.id)).await?;

        let reference = "PAY-REF-0042";
        let transactions = vec![
            create_test_deposit_transaction_with_reference(saved_plans[0].id, owner, reference),
            create_test_deposit_transaction_with_reference(saved_plans[0].id, owner, "PAY-REF-0043"),
        ];
        let saved = transaction_repo
            .create_batch(transactions, Some(audit_log.id))
            .await?;

        let found = transaction_repo
            .find_by_payment_reference_hash(hash_payment_reference(reference))
            .await?;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, saved[0].id);

        Ok(())
    }
}
