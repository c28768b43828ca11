//! Error types for the urlfilter crate.
//!
//! Filtering and URL synchronization never fail; malformed input is
//! normalized away. The only fallible step is assembling a [`Schema`],
//! which is configuration.
//!
//! [`Schema`]: crate::Schema

use thiserror::Error;

/// Errors that can occur when building a criterion schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two criteria share a URL parameter name.
    #[error("duplicate criterion key '{0}'")]
    DuplicateKey(String),

    /// A criterion has an empty URL parameter name.
    #[error("criterion for field '{field}' has an empty key")]
    EmptyKey { field: String },
}

/// Result type for schema construction.
pub type Result<T> = std::result::Result<T, SchemaError>;
