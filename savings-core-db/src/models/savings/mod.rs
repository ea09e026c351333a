pub mod breakdown;
pub mod savings_plan;
pub mod savings_transaction;

pub use breakdown::*;
pub use savings_plan::*;
pub use savings_transaction::*;
