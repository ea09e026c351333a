use async_trait::async_trait;
use savings_core_db::models::savings::savings_transaction::SavingsTransactionModel;
use savings_core_db::repository::load_batch::LoadBatch;
use std::error::Error;
use uuid::Uuid;

use crate::utils::TryFromRow;

use super::repo_impl::SavingsTransactionRepositoryImpl;

#[async_trait]
impl LoadBatch<sqlx::Postgres, SavingsTransactionModel> for SavingsTransactionRepositoryImpl {
    async fn load_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<SavingsTransactionModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids).await
    }
}

impl SavingsTransactionRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &SavingsTransactionRepositoryImpl,
        ids: &[Uuid],
    ) -> Result<Vec<Option<SavingsTransactionModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = r#"SELECT * FROM savings_transaction WHERE id = ANY($1)"#;
        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(query)
                .bind(ids)
                .fetch_all(&mut **transaction)
                .await?
        };

        let mut loaded_map = std::collections::HashMap::new();
        for row in rows {
            let item = SavingsTransactionModel::try_from_row(&row)?;
            loaded_map.insert(item.id, item);
        }

        // Return results in the same order as input ids
        let result = ids.iter().map(|id| loaded_map.remove(id)).collect();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::savings::savings_plan_repository::test_utils::create_test_savings_plan;
    use crate::repository::savings::savings_transaction_repository::test_utils::create_test_deposit_transaction;
    use crate::test_helper::{create_test_audit_log, setup_test_context};
    use savings_core_db::repository::create_batch::CreateBatch;
    use savings_core_db::repository::load_batch::LoadBatch;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_load_batch() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let audit_log_repo = &ctx.audit_repos().audit_log_repository;
        let plan_repo = &ctx.savings_repos().savings_plan_repository;
        let transaction_repo = &ctx.savings_repos().savings_transaction_repository;

        let audit_log = create_test_audit_log();
        audit_log_repo.create(&audit_log).await?;

        let owner = Uuid::new_v4();
        let plan = create_test_savings_plan(owner, None);
        let saved_plans = plan_repo.create_batch(vec![plan], Some(audit_log.id)).await?;

        let saved = transaction_repo
            .create_batch(
                vec![create_test_deposit_transaction(saved_plans[0].id, owner)],
                Some(audit_log.id),
            )
            .await?;

        let loaded = transaction_repo
            .load_batch(&[saved[0].id, Uuid::new_v4()])
            .await?;

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].as_ref().map(|t| t.id), Some(saved[0].id));
        assert!(loaded[1].is_none());

        Ok(())
    }
}
