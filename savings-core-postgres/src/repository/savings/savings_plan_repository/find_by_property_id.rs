use std::error::Error;

use savings_core_db::models::savings::savings_plan::SavingsPlanIdxModel;
use uuid::Uuid;

use super::repo_impl::SavingsPlanRepositoryImpl;

impl SavingsPlanRepositoryImpl {
    pub async fn find_by_property_id(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<SavingsPlanIdxModel>, Box<dyn Error + Send + Sync>> {
        let cache = self.savings_plan_idx_cache.read().await;
        let items = cache.get_by_uuid_index("property_id", &property_id);
        Ok(items)
    }
}
