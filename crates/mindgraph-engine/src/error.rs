//! Engine errors.
//!
//! Hit-testing misses and degenerate geometry are not errors: the first
//! is an ordinary `None`, the second a logged no-op. Only genuinely
//! invalid states surface here, and none of them are fatal to the host.

use crate::gesture::PointerId;
use thiserror::Error;

/// Engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A second drag was started for a pointer that already owns an open
    /// session. Integration defect: duplicate event delivery.
    #[error("drag session already open for pointer {pointer:?}")]
    ReentrantDrag { pointer: PointerId },

    /// An external collaborator (layout, search) failed or timed out.
    #[error("collaborator failure: {0}")]
    Collaborator(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
