use async_trait::async_trait;
use savings_core_db::models::savings::savings_plan::SavingsPlanIdxModel;
use savings_core_db::repository::find_by_id::FindById;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SavingsPlanRepositoryImpl;

#[async_trait]
impl FindById<sqlx::Postgres, SavingsPlanIdxModel> for SavingsPlanRepositoryImpl {
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<SavingsPlanIdxModel>, Box<dyn Error + Send + Sync>> {
        let cache = self.savings_plan_idx_cache.read().await;
        Ok(cache.get_by_primary(&id))
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::savings::savings_plan_repository::test_utils::create_test_savings_plan;
    use crate::test_helper::{create_test_audit_log, setup_test_context};
    use savings_core_db::repository::create_batch::CreateBatch;
    use savings_core_db::repository::find_by_id::FindById;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_find_by_id() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let audit_log_repo = &ctx.audit_repos().audit_log_repository;
        let plan_repo = &ctx.savings_repos().savings_plan_repository;

        let audit_log = create_test_audit_log();
        audit_log_repo.create(&audit_log).await?;

        let plans = vec![create_test_savings_plan(Uuid::new_v4(), None)];
        let saved = plan_repo.create_batch(plans, Some(audit_log.id)).await?;

        let found = plan_repo.find_by_id(saved[0].id).await?;
        assert!(found.is_some());
        assert_eq!(found.unwrap().owner_person_id, saved[0].owner_person_id);

        let missing = plan_repo.find_by_id(Uuid::new_v4()).await?;
        assert!(missing.is_none());

        Ok(())
    }
}
