use thiserror::Error;

use crate::journey::gate::DayStatus;

/// Errors raised by the pure journey engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JourneyError {
    /// The target day is not `available` right now; state is left untouched.
    #[error("Day {day} cannot be completed (status: {status})")]
    Precondition { day: u32, status: DayStatus },

    #[error("Day {0} is not part of the journey")]
    NotFound(u32),

    /// Loaded progress that no valid sequence of completions could have produced.
    #[error("Invalid progress record: {0}")]
    InvalidRecord(String),

    #[error("Invalid journey catalog: {0}")]
    InvalidCatalog(String),
}
