pub mod namespace;
pub mod timestamp;

// Re-export types for convenience.
pub use crate::types::namespace::Namespace;
