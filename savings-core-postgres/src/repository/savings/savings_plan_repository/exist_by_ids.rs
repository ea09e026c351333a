use async_trait::async_trait;
use savings_core_db::repository::exist_by_ids::ExistByIds;
use sqlx::Row;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SavingsPlanRepositoryImpl;

#[async_trait]
impl ExistByIds<sqlx::Postgres> for SavingsPlanRepositoryImpl {
    async fn exist_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<(Uuid, bool)>, Box<dyn Error + Send + Sync>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;
            sqlx::query(r#"SELECT id FROM savings_plan WHERE id = ANY($1)"#)
                .bind(ids)
                .fetch_all(&mut **transaction)
                .await?
        };

        let existing: std::collections::HashSet<Uuid> =
            rows.iter().map(|row| row.get("id")).collect();

        Ok(ids.iter().map(|id| (*id, existing.contains(id))).collect())
    }
}
