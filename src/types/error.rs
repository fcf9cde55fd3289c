use thiserror::Error;

/// Failure of any remote read in a fetch cycle.
///
/// Network, authorization, and malformed-response failures all collapse into
/// this one kind; `read` names the read that failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("data fetch failed ({read}): {message}")]
pub struct DataFetchFailure {
    pub read: &'static str,
    pub message: String,
}

impl DataFetchFailure {
    pub fn new(read: &'static str, message: impl Into<String>) -> Self {
        Self {
            read,
            message: message.into(),
        }
    }
}

/// acctdash error types
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A remote read failed
    #[error("fetch error: {0}")]
    Fetch(#[from] DataFetchFailure),

    /// Missing or invalid configuration
    #[error("config error: {0}")]
    Config(String),

    /// Fixture file could not be parsed
    #[error("fixture error: {0}")]
    Fixture(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for acctdash
pub type Result<T> = std::result::Result<T, DashboardError>;
