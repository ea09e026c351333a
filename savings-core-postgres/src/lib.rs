pub mod ledger;
pub mod postgres_repositories;
pub mod repository;
pub mod utils;

pub use ledger::SavingsLedger;
pub use postgres_repositories::PostgresRepositories;
pub use repository::audit::audit_log_repository::AuditLogRepositoryImpl;

#[cfg(test)]
pub mod test_helper;
