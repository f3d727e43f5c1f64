use thiserror::Error;

/// foodtrack error types
#[derive(Error, Debug)]
pub enum FoodtrackError {
    /// Upstream page request returned a non-success status
    #[error("HTTP error! status: {status}")]
    Fetch { status: u16 },

    /// Transport failure before a status was received
    #[error("network error: {0}")]
    Http(String),

    /// Failed to parse a response body or user input
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisting or reading the order store failed
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Host session never became ready or rejected every delivery
    #[error("host error: {0}")]
    Host(String),
}

impl From<reqwest::Error> for FoodtrackError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Fetch {
                status: status.as_u16(),
            },
            None => Self::Http(err.to_string()),
        }
    }
}

/// Result type alias for foodtrack
pub type Result<T> = std::result::Result<T, FoodtrackError>;
