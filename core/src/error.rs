//! Common error types for Weft.

use thiserror::Error;

/// Errors raised by core value types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A dotted name did not have the `Module.Element` shape.
    #[error("invalid qualified name: {0}")]
    InvalidQualifiedName(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
