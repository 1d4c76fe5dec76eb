use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RrgError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Insufficient overlapping data: {found} common timestamps, need {required}")]
    InsufficientOverlap { found: usize, required: usize },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Could not fetch benchmark data ({symbol}). {reason}")]
    BenchmarkUnavailable { symbol: String, reason: String },

    #[error("No sector data could be retrieved for period: {period}.")]
    EmptyResultSet { period: String },
}

impl RrgError {
    /// Whether this error aborts a whole rotation computation rather than
    /// just the instrument it happened on.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RrgError::BenchmarkUnavailable { .. } | RrgError::EmptyResultSet { .. }
        )
    }
}
