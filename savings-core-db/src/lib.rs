pub mod models;
pub mod repository;
pub mod utils;

pub use models::*;
pub use postgres_index_cache::{HasPrimaryKey, IdxModelCache, Indexable};
