//! Error types for the analytics and selection engine.
//!
//! Invalid inputs are rejected synchronously, before any store access.
//! Store failures propagate unchanged; the engine never retries. An empty
//! pool or an exhausted candidate list is a `None` result, not an error.

use thiserror::Error;

use crate::db::DbError;

/// Errors surfaced by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The timezone string is not a known IANA identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Trend window of {weeks} weeks is outside the supported range {min}..={max}")]
    WindowOutOfRange { weeks: u32, min: u32, max: u32 },

    #[error("Rating {rating} is outside the accepted range {min}..={max}")]
    RatingOutOfRange { rating: i32, min: i32, max: i32 },

    /// Allocation was requested over zero arms.
    #[error("Allocation requires at least one arm")]
    EmptyArmSet,

    #[error("Store error: {0}")]
    Store(#[from] DbError),
}
