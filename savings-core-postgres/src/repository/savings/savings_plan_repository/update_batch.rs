use async_trait::async_trait;
use savings_core_db::models::{
    audit::{AuditLinkModel, EntityType},
    index_aware::IndexAware,
    savings::savings_plan::SavingsPlanModel,
};
use savings_core_db::repository::update_batch::UpdateBatch;
use savings_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SavingsPlanRepositoryImpl;

impl SavingsPlanRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<SavingsPlanModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<SavingsPlanModel>, Box<dyn Error + Send + Sync>> {
        let audit_log_id = audit_log_id.ok_or("audit_log_id is required for SavingsPlanModel")?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut updated_items = Vec::new();
        let mut indices_to_update = Vec::new();

        {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or("Transaction has been consumed")?;

            for mut item in items {
                let previous_hash = item.hash;
                let previous_audit_log_id = item
                    .audit_log_id
                    .ok_or("Entity must have audit_log_id for update")?;

                let mut entity_for_hashing = item.clone();
                entity_for_hashing.hash = 0;
                let computed_hash = hash_as_i64(&entity_for_hashing)?;

                if computed_hash == previous_hash {
                    updated_items.push(item);
                    continue;
                }

                item.antecedent_hash = previous_hash;
                item.antecedent_audit_log_id = previous_audit_log_id;
                item.audit_log_id = Some(audit_log_id);
                item.hash = 0;

                let new_computed_hash = hash_as_i64(&item)?;
                item.hash = new_computed_hash;

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

                let rows_affected = sqlx::query(
                    r#"
                    UPDATE savings_plan SET
                    owner_person_id = $2, property_id = $3, external_property = $4,
                    external_property_details = $5, target_amount = $6, current_amount = $7,
                    due_date = $8, status = $9, penalty_rate = $10, charge_rate = $11,
                    created_at = $12, antecedent_hash = $13, antecedent_audit_log_id = $14,
                    hash = $15, audit_log_id = $16
                    WHERE id = $1 AND hash = $17 AND audit_log_id = $18
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
                .bind(previous_hash)
                .bind(previous_audit_log_id)
                .execute(&mut **transaction)
                .await?
                .rows_affected();

                if rows_affected == 0 {
                    return Err("Concurrent update detected".into());
                }

                let idx = item.to_index();
                sqlx::query(
                    r#"
                    UPDATE savings_plan_idx SET
                    owner_person_id = $2,
                    property_id = $3
                    WHERE id = $1
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

                indices_to_update.push((item.id, idx));
                updated_items.push(item);
            }
        }

        {
            let cache = self.savings_plan_idx_cache.read().await;
            for (id, idx) in indices_to_update {
                cache.remove(&id);
                cache.add(idx);
            }
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<Postgres, SavingsPlanModel> for SavingsPlanRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<SavingsPlanModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<SavingsPlanModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::savings::savings_plan_repository::test_utils::create_test_savings_plan;
    use crate::test_helper::{create_test_audit_log, setup_test_context};
    use rust_decimal::Decimal;
    use savings_core_db::models::savings::savings_plan::PlanStatus;
    use savings_core_db::repository::create_batch::CreateBatch;
    use savings_core_db::repository::update_batch::UpdateBatch;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_update_batch() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let audit_log_repo = &ctx.audit_repos().audit_log_repository;
        let plan_repo = &ctx.savings_repos().savings_plan_repository;

        let audit_log = create_test_audit_log();
        audit_log_repo.create(&audit_log).await?;

        let plans = vec![create_test_savings_plan(Uuid::new_v4(), None)];
        let mut saved = plan_repo.create_batch(plans, Some(audit_log.id)).await?;

        // A second audit log for the update, as each unit of work carries its own.
        let update_audit_log = create_test_audit_log();
        audit_log_repo.create(&update_audit_log).await?;

        saved[0].current_amount = Decimal::new(2_500, 0);
        let updated = plan_repo.update_batch(saved, Some(update_audit_log.id)).await?;

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].current_amount, Decimal::new(2_500, 0));
        assert_eq!(updated[0].audit_log_id, Some(update_audit_log.id));
        assert_eq!(updated[0].antecedent_audit_log_id, audit_log.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_batch_detects_concurrent_update(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let audit_log_repo = &ctx.audit_repos().audit_log_repository;
        let plan_repo = &ctx.savings_repos().savings_plan_repository;

        let audit_log = create_test_audit_log();
        audit_log_repo.create(&audit_log).await?;

        let plans = vec![create_test_savings_plan(Uuid::new_v4(), None)];
        let saved = plan_repo.create_batch(plans, Some(audit_log.id)).await?;

        let update_audit_log = create_test_audit_log();
        audit_log_repo.create(&update_audit_log).await?;

        // A stale copy carrying an outdated hash must not win.
        let mut stale = saved[0].clone();
        stale.hash = stale.hash.wrapping_add(1);
        stale.status = PlanStatus::Cancelled;

        let result = plan_repo.update_batch(vec![stale], Some(update_audit_log.id)).await;
        assert!(result.is_err());

        Ok(())
    }
}
