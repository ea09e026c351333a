pub mod create_batch;
pub mod find_by_payment_reference_hash;
pub mod find_by_plan_id;
pub mod load_batch;
pub mod repo_impl;
pub mod update_batch;

#[cfg(test)]
pub mod test_utils;

pub use repo_impl::SavingsTransactionRepositoryImpl;
