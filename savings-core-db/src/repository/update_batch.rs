use async_trait::async_trait;
use sqlx::Database;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Generic repository trait for updating multiple entities in a batch
///
/// Updates are performed within a single transaction and guarded by the
/// entity's current hash and audit log reference; a concurrent modification
/// of any entity fails the whole batch instead of silently losing updates.
///
/// # Type Parameters
/// * `DB` - The database type (must implement sqlx::Database)
/// * `T` - The entity type that must implement Identifiable trait
#[async_trait]
pub trait UpdateBatch<DB: Database, T: Identifiable>: Send + Sync {
    /// Update multiple items in a single transaction
    ///
    /// # Arguments
    /// * `items` - A vector of entities to update
    /// * `audit_log_id` - The optional UUID of the audit log for tracking this operation
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - A vector of updated entities carrying their new hash chain fields
    /// * `Err` - An error if the transaction could not be executed
    async fn update_batch(
        &self,
        items: Vec<T>,
        audit_log_id: Option<Uuid>,
    ) -> Result<Vec<T>, Box<dyn std::error::Error + Send + Sync>>;
}
