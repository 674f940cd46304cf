//! Layout errors.

use thiserror::Error;

/// Layout errors. Every failure is recoverable: a rejected set leaves
/// the stored value untouched, a failed solve leaves the scene and
/// viewport untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("unknown layout algorithm: {0}")]
    UnknownLayout(String),

    #[error("layout {layout} has no parameter named {name}")]
    UnknownParameter { layout: String, name: String },

    #[error("invalid value for parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The external layout solver failed or timed out.
    #[error("layout solver failed: {0}")]
    Solver(String),
}

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
