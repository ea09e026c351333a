use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "entity_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    SavingsPlan,
    SavingsTransaction,
}

impl From<EntityType> for &str {
    fn from(val: EntityType) -> Self {
        match val {
            EntityType::SavingsPlan => "SAVINGS_PLAN",
            EntityType::SavingsTransaction => "SAVINGS_TRANSACTION",
        }
    }
}
