use async_trait::async_trait;
use savings_core_db::models::{
    audit::{AuditLinkModel, EntityType},
    index_aware::IndexAware,
    savings::savings_transaction::SavingsTransactionModel,
};
use savings_core_db::repository::create_batch::CreateBatch;
use savings_core_db::utils::hash_as_i64;
use sqlx::Postgres;
use std::error::Error;
use uuid::Uuid;

use super::repo_impl::SavingsTransactionRepositoryImpl;

impl SavingsTransactionRepositoryImpl {
    pub(super) async fn create_batch_impl(
        repo: &SavingsTransactionRepositoryImpl,
        items: Vec<SavingsTransactionModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<SavingsTransactionModel>, Box<dyn Error + Send + Sync>> {
        let audit_log_id =
            audit_log_id.ok_or("audit_log_id is required for SavingsTransactionModel")?;
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

                // Execute main insert
                sqlx::query(
                    r#"
                    INSERT INTO savings_transaction
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

                // Insert into index table
                let idx = item.to_index();
                sqlx::query(
                    r#"
                    INSERT INTO savings_transaction_idx (id, plan_id, person_id, payment_reference_hash)
                    VALUES ($1, $2, $3, $4)
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

                indices.push(idx);
                saved_items.push(item);
            }
        } // Transaction lock released here

        // Update cache after releasing transaction lock
        {
            let cache = repo.savings_transaction_idx_cache.write().await;
            for idx in indices {
                cache.add(idx);
            }
        }

        Ok(saved_items)
    }
}

#[async_trait]
impl CreateBatch<Postgres, SavingsTransactionModel> for SavingsTransactionRepositoryImpl {
    async fn create_batch(
        &self,
        items: Vec<SavingsTransactionModel>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<SavingsTransactionModel>, Box<dyn Error + Send + Sync>> {
        Self::create_batch_impl(self, items, audit_log_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::savings::savings_plan_repository::test_utils::create_test_savings_plan;
    use crate::repository::savings::savings_transaction_repository::test_utils::create_test_deposit_transaction;
    use crate::test_helper::{create_test_audit_log, setup_test_context};
    use savings_core_db::repository::create_batch::CreateBatch;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_create_batch() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let audit_log_repo = &ctx.audit_repos().audit_log_repository;
        let plan_repo = &ctx.savings_repos().savings_plan_repository;
        let transaction_repo = &ctx.savings_repos().savings_transaction_repository;

        let audit_log = create_test_audit_log();
        audit_log_repo.create(&audit_log).await?;

        let owner = Uuid::new_v4();
        let plan = create_test_savings_plan(owner, None);
        let saved_plans = plan_repo
            .create_batch(vec![plan], Some(audit_log.id))
            .await?;

        let transactions = vec![
            create_test_deposit_transaction(saved_plans[0].id, owner),
            create_test_deposit_transaction(saved_plans[0].id, owner),
        ];
        let saved = transaction_repo
            .create_batch(transactions, Some(audit_log.id))
            .await?;

        assert_eq!(saved.len(), 2);
        for transaction in saved.iter() {
            assert_eq!(transaction.audit_log_id, Some(audit_log.id));
            assert_ne!(transaction.hash, 0);
        }

        Ok(())
    }
}
