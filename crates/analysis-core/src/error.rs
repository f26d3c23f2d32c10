use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// No usable price rows, either in the raw table or after cleaning.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// No recognizable closing-price column.
    #[error("Data format error: no close-price column found (available columns: [{}])", available.join(", "))]
    DataFormat { available: Vec<String> },

    #[error("Fundamentals unavailable: {0}")]
    FundamentalsUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data source error: {0}")]
    Source(String),
}

impl AnalysisError {
    /// Whether the coordinator may recover from this error instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AnalysisError::FundamentalsUnavailable(_))
    }
}
