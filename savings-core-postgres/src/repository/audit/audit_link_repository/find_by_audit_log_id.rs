use savings_core_db::models::audit::AuditLinkModel;
use uuid::Uuid;

use super::repo_impl::AuditLinkRepositoryImpl;

impl AuditLinkRepositoryImpl {
    pub async fn find_by_audit_log_id(
        &self,
        audit_log_id: Uuid,
    ) -> Result<Vec<AuditLinkModel>, Box<dyn std::error::Error + Send + Sync>> {
        let query = sqlx::query_as::<_, AuditLinkModel>(
            r#"
            SELECT audit_log_id, entity_id, entity_type
            FROM audit_link
            WHERE audit_log_id = $1
            "#,
        )
        .bind(audit_log_id);

        let mut tx = self.executor.tx.lock().await;
        let links = if let Some(transaction) = tx.as_mut() {
            query.fetch_all(&mut **transaction).await?
        } else {
            return Err("Transaction has been consumed".into());
        };

        Ok(links)
    }
}
