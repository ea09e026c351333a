use async_trait::async_trait;
use savings_core_db::models::savings::savings_plan::SavingsPlanModel;
use savings_core_db::repository::load_batch::LoadBatch;
use std::error::Error;
use uuid::Uuid;

use crate::utils::TryFromRow;

use super::repo_impl::SavingsPlanRepositoryImpl;

#[async_trait]
impl LoadBatch<sqlx::Postgres, SavingsPlanModel> for SavingsPlanRepositoryImpl {
    async fn load_batch(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<Option<SavingsPlanModel>>, Box<dyn Error + Send + Sync>> {
        Self::load_batch_impl(self, ids).await
    }
}

impl SavingsPlanRepositoryImpl {
    pub(super) async fn load_batch_impl(
        repo: &SavingsPlanRepositoryImpl,
        ids: &[Uuid],
    ) -> Result<Vec<Option<SavingsPlanModel>>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = r#"SELECT * FROM savings_plan WHERE id = ANY($1)"#;
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
            let item = SavingsPlanModel::try_from_row(&row)?;
            loaded_map.insert(item.id, item);
        }

        // Return results in the same order as input ids
        let result = ids.iter().map(|id| loaded_map.remove(id)).collect();

        Ok(result)
    }
}
