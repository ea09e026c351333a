pub mod audit_log;
pub mod audit_link;
pub mod entity_type;

pub use audit_log::*;
pub use audit_link::*;
pub use entity_type::*;
