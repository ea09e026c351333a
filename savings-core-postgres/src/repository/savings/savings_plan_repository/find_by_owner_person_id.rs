use std::error::Error;

use savings_core_db::models::savings::savings_plan::SavingsPlanIdxModel;
use uuid::Uuid;

use super::repo_impl::SavingsPlanRepositoryImpl;

impl SavingsPlanRepositoryImpl {
    pub async fn find_by_owner_person_id(
        &self,
        owner_person_id: Uuid,
    ) -> Result<Vec<SavingsPlanIdxModel>, Box<dyn Error + Send + Sync>> {
        let cache = self.savings_plan_idx_cache.read().await;
        let items = cache.get_by_uuid_index("owner_person_id", &owner_person_id);
        Ok(items)
    }
}
