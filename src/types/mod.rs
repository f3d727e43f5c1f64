//! Type definitions for foodtrack

mod error;
mod metrics;
mod order;

pub use error::*;
pub use metrics::*;
pub use order::*;

/// Order store loading warning types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWarning {
    /// Failed to open or read the store file
    LoadFailed(String),
    /// Store file was corrupted (invalid JSON)
    Corrupted(String),
}

impl std::fmt::Display for StoreWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadFailed(msg) | Self::Corrupted(msg) => f.write_str(msg),
        }
    }
}
