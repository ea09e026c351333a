pub mod cancel_plan;
pub mod confirm_transaction;
pub mod create_plan;
pub mod deposit;
pub mod fail_transaction;
pub mod ledger_impl;
pub mod mature_plan;
pub mod withdraw;

pub use ledger_impl::SavingsLedger;
