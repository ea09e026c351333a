use async_trait::async_trait;
use savings_core_db::models::savings::savings_plan::SavingsPlanModel;
use savings_core_db::repository::load_audits::LoadAudits;
use savings_core_db::repository::pagination::{Page, PageRequest};
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use crate::utils::TryFromRow;

use super::repo_impl::SavingsPlanRepositoryImpl;

impl SavingsPlanRepositoryImpl {
    pub(super) async fn load_audits_impl(
        repo: &SavingsPlanRepositoryImpl,
        id: Uuid,
        page: PageRequest,
    ) -> Result<Page<SavingsPlanModel>, Box<dyn Error + Send + Sync>> {
        // First, get the total count of audit records for this entity
        let count_query = r#"SELECT COUNT(*) as count FROM savings_plan_audit WHERE id = $1"#;
        let total: i64 = {
            let mut tx = repo.executor.tx.lock().await;
            if let Some(transaction) = tx.as_mut() {
                sqlx::query_scalar(count_query)
                    .bind(id)
                    .fetch_one(&mut **transaction)
                    .await?
            } else {
                return Err("Transaction has been consumed".into());
            }
        };

        // Then fetch the paginated audit records, ordered by audit_log_id (most recent first)
        let query = r#"
            SELECT * FROM savings_plan_audit
            WHERE id = $1
            ORDER BY audit_log_id DESC
            LIMIT $2 OFFSET $3
        "#;

        let rows = {
            let mut tx = repo.executor.tx.lock().await;
            if let Some(transaction) = tx.as_mut() {
                sqlx::query(query)
                    .bind(id)
                    .bind(page.limit as i64)
                    .bind(page.offset as i64)
                    .fetch_all(&mut **transaction)
                    .await?
            } else {
                return Err("Transaction has been consumed".into());
            }
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let item = SavingsPlanModel::try_from_row(&row)?;
            items.push(item);
        }

        Ok(Page::new(items, total as usize, page.limit, page.offset))
    }
}

#[async_trait]
impl LoadAudits<Postgres, SavingsPlanModel> for SavingsPlanRepositoryImpl {
    async fn load_audits(
        &self,
        id: Uuid,
        page: PageRequest,
    ) -> Result<Page<SavingsPlanModel>, Box<dyn Error + Send + Sync>> {
        Self::load_audits_impl(self, id, page).await
    }
}
