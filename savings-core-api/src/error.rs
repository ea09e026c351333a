use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Plan is not active: {0}")]
    PlanNotActive(String),

    #[error("Transaction is not pending: {0}")]
    TransactionNotPending(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for LedgerError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        LedgerError::Database(err.to_string())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
