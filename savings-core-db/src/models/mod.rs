pub mod auditable;
pub mod identifiable;
pub mod index;
pub mod index_aware;
pub mod audit;
pub mod savings;

// Re-exports
pub use auditable::*;
pub use identifiable::*;
pub use index::*;
pub use index_aware::*;
pub use audit::*;
pub use savings::*;
