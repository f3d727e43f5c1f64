//! Progress events published while a sync runs

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SyncEvent {
    /// Human-readable progress line
    StatusUpdate { message: String },
    /// Orders were collected and persisted
    SyncComplete { count: usize },
    /// The run aborted; stored data is unchanged
    SyncFailed { message: String },
}

impl SyncEvent {
    pub fn status(message: impl Into<String>) -> Self {
        Self::StatusUpdate {
            message: message.into(),
        }
    }

    /// Text for a one-line status display
    pub fn message(&self) -> String {
        match self {
            Self::StatusUpdate { message } | Self::SyncFailed { message } => message.clone(),
            Self::SyncComplete { count } => success_message(*count),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::StatusUpdate { .. })
    }
}

pub(crate) const STARTING_MESSAGE: &str = "Fetching your order history... Please wait.";
pub(crate) const STORAGE_FAILED_MESSAGE: &str =
    "Storage save failed. Please refresh and try again.";

pub(crate) fn page_message(page: u32) -> String {
    format!("Fetching page {}...", page)
}

pub(crate) fn success_message(count: usize) -> String {
    format!("Success! Fetched {} orders.", count)
}

pub(crate) fn failure_message(reason: &str) -> String {
    format!("Error: {}. Make sure you are logged in.", reason)
}
