use postgres_index_cache::{CacheNotificationListener, IndexCacheHandler};
use postgres_unit_of_work::Executor;
use sqlx::PgPool;
use std::sync::Arc;

use crate::ledger::SavingsLedger;
use crate::repository::audit::{AuditLinkRepositoryImpl, AuditLogRepositoryImpl};
use crate::repository::savings::{SavingsPlanRepositoryImpl, SavingsTransactionRepositoryImpl};

pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create all repositories sharing a single transaction
    pub async fn create_all_repositories(
        &self,
        listener: Option<&mut CacheNotificationListener>,
    ) -> (AuditRepositories, SavingsRepositories) {
        let tx = self
            .pool
            .begin()
            .await
            .expect("Failed to begin transaction");
        let executor = Executor::new(tx);

        // Create audit repositories with shared executor
        let audit_log_repository = Arc::new(AuditLogRepositoryImpl::new(executor.clone()));
        let audit_link_repository = Arc::new(AuditLinkRepositoryImpl::new(executor.clone()));
        let audit_repos = AuditRepositories {
            audit_log_repository,
            audit_link_repository,
        };

        // Create savings repositories with shared executor
        let savings_plan_idx_cache = Arc::new(parking_lot::RwLock::new(
            savings_core_db::IdxModelCache::new(vec![]).unwrap(),
        ));

        let savings_transaction_idx_cache = Arc::new(parking_lot::RwLock::new(
            savings_core_db::IdxModelCache::new(vec![]).unwrap(),
        ));

        // Register handlers with listener if provided
        if let Some(listener) = listener {
            let plan_handler = Arc::new(IndexCacheHandler::new(
                "savings_plan_idx".to_string(),
                savings_plan_idx_cache.clone(),
            ));
            listener.register_handler(plan_handler);

            let transaction_handler = Arc::new(IndexCacheHandler::new(
                "savings_transaction_idx".to_string(),
                savings_transaction_idx_cache.clone(),
            ));
            listener.register_handler(transaction_handler);
        }

        let savings_plan_repository = Arc::new(SavingsPlanRepositoryImpl::new(
            executor.clone(),
            savings_plan_idx_cache,
        ));

        let savings_transaction_repository = Arc::new(SavingsTransactionRepositoryImpl::new(
            executor.clone(),
            savings_transaction_idx_cache,
        ));

        let savings_repos = SavingsRepositories {
            savings_plan_repository,
            savings_transaction_repository,
        };

        (audit_repos, savings_repos)
    }

    /// Create the savings ledger together with the repositories it runs on,
    /// all sharing a single transaction.
    pub async fn create_ledger(
        &self,
        listener: Option<&mut CacheNotificationListener>,
    ) -> (SavingsLedger, AuditRepositories, SavingsRepositories) {
        let (audit_repos, savings_repos) = self.create_all_repositories(listener).await;
        let ledger = SavingsLedger::new(
            audit_repos.audit_log_repository.clone(),
            savings_repos.savings_plan_repository.clone(),
            savings_repos.savings_transaction_repository.clone(),
        );
        (ledger, audit_repos, savings_repos)
    }
}

pub struct AuditRepositories {
    pub audit_log_repository: Arc<AuditLogRepositoryImpl>,
    pub audit_link_repository: Arc<AuditLinkRepositoryImpl>,
}

pub struct SavingsRepositories {
    pub savings_plan_repository: Arc<SavingsPlanRepositoryImpl>,
    pub savings_transaction_repository: Arc<SavingsTransactionRepositoryImpl>,
}
