use async_trait::async_trait;
use savings_core_db::models::{
    audit::{AuditLinkModel, EntityType},
    index_aware::IndexAware,
    savings::savings_transaction::SavingsTransactionModel,
};
use savings_core_db::repository::update_batch::UpdateBatch;
use savings_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SavingsTransactionRepositoryImpl;

impl SavingsTransactionRepositoryImpl {
    pub(super) async fn update_batch_impl(
        &self,
        items: Vec<SavingsTransactionModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<SavingsTransactionModel>, Box<dyn Error + Send + Sync>> {
        let audit_log_id =
            audit_log_id.ok_or("audit_log_id is required for SavingsTransactionModel")?;
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
                    INSERT INTO savings_transaction_audit
                    (id, plan_id, person_id, transaction_type, gross_amount, charge_amount, penalty_amount, net_amount, early_withdrawal, payment_reference, status, created_at, completed_at, antecedent_hash, antecedent_audit_log_id, hash, audit_log_id)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
                    "#,
                )
                .bind(item.id)
                .bind(item.plan_id)
                .bind(item.person_id)
                .bind(item.transaction_type)
                .bind(item.gross_amount)
                .bind(item.charge_amount)
                .bind(item.penalty_amount)
                .bind(item.net_amount)
                .bind(item.early_withdrawal)
                .bind(item.payment_reference.as_deref())
                .bind(item.status)
                .bind(item.created_at)
                .bind(item.completed_at)
                .bind(item.antecedent_hash)
                .bind(item.antecedent_audit_log_id)
                .bind(item.hash)
                .bind(item.audit_log_id)
                .execute(&mut **transaction)
                .await?;

                let rows_affected = sqlx::query(
                    r#"
                    UPDATE savings_transaction SET
                    plan_id = $2, person_id = $3, transaction_type = $4,
                    gross_amount = $5, charge_amount = $6, penalty_amount = $7,
                    net_amount = $8, early_withdrawal = $9, payment_reference = $10,
                    status = $11, created_at = $12, completed_at = $13,
                    antecedent_hash = $14, antecedent_audit_log_id = $15,
                    hash = $16, audit_log_id = $17
                    WHERE id = $1 AND hash = $18 AND audit_log_id = $19
                    "#,
                )
                .bind(item.id)
                .bind(item.plan_id)
                .bind(item.person_id)
                .bind(item.transaction_type)
                .bind(item.gross_amount)
                .bind(item.charge_amount)
                .bind(item.penalty_amount)
                .bind(item.net_amount)
                .bind(item.early_withdrawal)
                .bind(item.payment_reference.as_deref())
                .bind(item.status)
                .bind(item.created_at)
                .bind(item.completed_at)
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
                    UPDATE savings_transaction_idx SET
                    plan_id = $2,
                    person_id = $3,
                    payment_reference_hash = $4
                    WHERE id = $1
                    "#,
                )
                .bind(idx.id)
                .bind(idx.plan_id)
                .bind(idx.person_id)
                .bind(idx.payment_reference_hash)
                .execute(&mut **transaction)
                .await?;

                // Create audit link
                let audit_link = AuditLinkModel {
                    audit_log_id,
                    entity_id: item.id,
                    entity_type: EntityType::SavingsTransaction,
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
            let cache = self.savings_transaction_idx_cache.read().await;
            for (id, idx) in indices_to_update {
                cache.remove(&id);
                cache.add(idx);
            }
        }

        Ok(updated_items)
    }
}

#[async_trait]
impl UpdateBatch<Postgres, SavingsTransactionModel> for SavingsTransactionRepositoryImpl {
    async fn update_batch(
        &self,
        items: Vec<SavingsTransactionModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<SavingsTransactionModel>, Box<dyn Error + Send + Sync>> {
        Self::update_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::savings::savings_plan_repository::test_utils::create_test_savings_plan;
    use crate::repository::savings::savings_transaction_repository::test_utils::create_test_deposit_transaction;
    use crate::test_helper::{create_test_audit_log, setup_test_context};
    use chrono::Utc;
    use savings_core_db::models::savings::savings_transaction::TransactionStatus;
    use savings_core_db::repository::create_batch::CreateBatch;
    use savings_core_db::repository::update_batch::UpdateBatch;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_update_batch_settles_transaction(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let audit_log_repo = &ctx.audit_repos().audit_log_repository;
        let plan_repo = &ctx.savings_repos().savings_plan_repository;
        let transaction_repo = &ctx.savings_repos().savings_transaction_repository;

        let audit_log = create_test_audit_log();
        audit_log_repo.create(&audit_log).await?;

        let owner = Uuid::new_v4();
        let plan = create_test_savings_plan(owner, None);
        let saved_plans = plan_repo.create_batch(vec![plan], Some(audit_log.id)).await?;

        let saved = transaction_repo
            .create_batch(
                vec![create_test_deposit_transaction(saved_plans[0].id, owner)],
                Some(audit_log.id),
            )
            .await?;

        let settle_audit_log = create_test_audit_log();
        audit_log_repo.create(&settle_audit_log).await?;

        let mut settled = saved[0].clone();
        settled.complete(Utc::now())?;
        let updated = transaction_repo
            .update_batch(vec![settled], Some(settle_audit_log.id))
            .await?;

        assert_eq!(updated[0].status, TransactionStatus::Completed);
        assert!(updated[0].completed_at.is_some());
        assert_eq!(updated[0].antecedent_audit_log_id, audit_log.id);

        Ok(())
    }
}
