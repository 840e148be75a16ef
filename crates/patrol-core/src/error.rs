//! Error taxonomy for planning and estate lookups.

use thiserror::Error;

/// Errors raised by the patrol core.
#[derive(Debug, Error)]
pub enum PatrolError {
    /// No estate or tree data was supplied. Always a caller bug.
    #[error("invalid input: nothing to calculate patrol distance")]
    InvalidInput,

    /// A tree coordinate falls outside the estate grid.
    #[error("tree at ({x}, {y}) lies outside the {length}x{width} estate")]
    TreeOutOfBounds { x: u32, y: u32, length: u32, width: u32 },

    #[error("estate {estate_id} not found")]
    NotFound { estate_id: String },

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PatrolError {
    pub fn not_found(estate_id: impl Into<String>) -> Self {
        Self::NotFound {
            estate_id: estate_id.into(),
        }
    }

    /// True for errors caused by the caller rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput | Self::TreeOutOfBounds { .. })
    }
}
