use thiserror::Error;

/// Failures of the schedule resolver, the state evaluator and the
/// collaborators they call into.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("invalid time of day {0:?}: expected HH:MM:SS or \"sunset\"")]
    InvalidTimeFormat(String),

    #[error("invalid duration {0:?}: expected a combination of <N>h, <N>m and <N>s")]
    InvalidDurationFormat(String),

    #[error("no data available: {0}")]
    NoDataAvailable(&'static str),

    #[error("sunset lookup failed: {0}")]
    UpstreamLookupFailure(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type ControlResult<T> = Result<T, ControlError>;
