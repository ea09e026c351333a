use async_trait::async_trait;
use savings_core_db::models::{
    audit::{AuditLinkModel, EntityType},
    index_aware::IndexAware,
    savings::savings_plan::SavingsPlanModel,
};
use savings_core_db::repository::create_batch::CreateBatch;
use savings_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SavingsPlanRepositoryImpl;

impl SavingsPlanRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &SavingsPlanRepositoryImpl,
        items: Vec<SavingsPlanModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<SavingsPlanModel>, Box<dyn Error + Send + Sync>> {
        let audit_log_id = audit_log_id.ok_or("audit_log_id is required for SavingsPlanModel")?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut saved_items = Vec::new();
        let mut indices = Vec::new();

        // Acquire lock once and do all database operations
        {
            let mut tx = repo.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            for mut item in items {
                // 1. Create a copy of entity for hashing
                let mut entity_for_hashing = item.clone();
                entity_for_hashing.hash = 0; // Must be 0 before hashing
                entity_for_hashing.audit_log_id = Some(audit_log_id); // Set ID before hashing

                // 2. Compute hash
                let computed_hash = hash_as_i64(&entity_for_hashing)?;

                // 3. Update original entity with computed hash and new audit_log_id
                item.hash = computed_hash;
                item.audit_log_id = Some(audit_log_id);

                // Execute audit insert
                sqlx::query(
                    r#"
                    INSERT INTO savings_plan_audit
                    (id, owner_person_id, property_id, external_property, external_property_details, target_amount, current_amount, due_date, status, penalty_rate, charge_rate, created_at, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                    "#,
                )
                .bind(item.id)
                .bind(item.owner_person_id)
                .bind(item.property_id)
                .bind(item.external_property)
                .bind(item.external_property_details.as_deref())
                .bind(item.target_amount)
                .bind(item.current_amount)
                .bind(item.due_date)
                .bind(item.status)
                .bind(item.penalty_rate)
                .bind(item.charge_rate)
                .bind(item.created_at)
                .bind(item.antecedent_hash)
                .bind(item.antecedent_audit_log_id)
                .bind(item.hash)
                .bind(item.audit_log_id)
                .execute(&mut **transaction)
                .await?;

                // Execute main insert
                sqlx::query(
                    r#"
                    INSERT INTO savings_plan
                    (id, owner_person_id, property_id, external_property, external_property_details, target_amount, current_amount, due_date, status, penalty_rate, charge_rate, created_at, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                    "#,
                )
                .bind(item.id)
                .bind(item.owner_person_id)
                .bind(item.property_id)
                .bind(item.external_property)
                .bind(item.external_property_details.as_deref())
                .bind(item.target_amount)
                .bind(item.current_amount)
                .bind(item.due_date)
                .bind(item.status)
                .bind(item.penalty_rate)
                .bind(item.charge_rate)
                .bind(item.created_at)
                .bind(item.antecedent_hash)
                .bind(item.antecedent_audit_log_id)
                .bind(item.hash)
                .bind(item.audit_log_id)
                .execute(&mut **transaction)
                .await?;

                // Insert into index table
                let idx = item.to_index();
                sqlx::query(
                    r#"
                    INSERT INTO savings_plan_idx (id, owner_person_id, property_id)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(idx.id)
                .bind(idx.owner_person_id)
                .bind(idx.property_id)
                .execute(&mut **transaction)
                .await?;

                // Create audit link
                let audit_link = AuditLinkModel {
                    audit_log_id,
                    entity_id: item.id,
                    entity_type: EntityType::SavingsPlan,
                };
                sqlx::query(
                    r#"
                    INSERT INTO audit_link (audit_log_id, entity_id, entity_type)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(audit_link.audit_log_id)
                .bind(audit_link.entity_id)
                .bind(audit_link.entity_type)
                .execute(&mut **transaction)
                .await?;

                indices.push(idx);
                saved_items.push(item);
            }
        } // Transaction lock released here

        // Update cache after releasing transaction lock
        {
            let cache = repo.savings_plan_idx_cache.write().await;
            for idx in indices {
                cache.add(idx);
            }
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<Postgres, SavingsPlanModel> for SavingsPlanRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<SavingsPlanModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<SavingsPlanModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}
