use std::error::Error;

use savings_core_db::models::savings::savings_transaction::SavingsTransactionIdxModel;
use uuid::Uuid;

use super::repo_impl::SavingsTransactionRepositoryImpl;

impl SavingsTransactionRepositoryImpl {
    pub async fn find_by_plan_id(
        &self,
        plan_id: Uuid,
    ) -> Result<Vec<SavingsTransactionIdxModel>, Box<dyn Error + Send + Sync>> {
        let cache = self.savings_transaction_idx_cache.read().await;
        let items = cache.get_by_uuid_index("plan_id", &plan_id);
        Ok(items)
    }
}
