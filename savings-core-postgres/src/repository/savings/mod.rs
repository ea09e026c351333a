pub mod savings_plan_repository;
pub mod savings_transaction_repository;

pub use savings_plan_repository::SavingsPlanRepositoryImpl;
pub use savings_transaction_repository::SavingsTransactionRepositoryImpl;
