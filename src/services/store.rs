//! Order store service
//!
//! Persists the complete order collection from the last successful sync.
//! Every save replaces the previous content wholesale; there is no merging.

use crate::types::{FoodtrackError, RawOrder, Result, StoreWarning};
use chrono::{DateTime, Utc};
use directories::BaseDirs;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

const STORE_FILE: &str = "orders.json";

/// On-disk layout of the order store
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredOrders {
    pub last_synced: DateTime<Utc>,
    pub orders: Vec<RawOrder>,
}

#[derive(Debug, Clone)]
pub struct OrderStore {
    data_dir: PathBuf,
}

impl OrderStore {
    /// Store rooted at `~/.foodtrack/`
    pub fn new() -> Result<Self> {
        Ok(Self {
            data_dir: default_data_dir()?,
        })
    }

    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }

    /// Load the persisted collection.
    /// Missing file → `(None, None)`; unreadable or corrupt file → `(None, Some(warning))`.
    /// Uses a shared file lock for concurrent read safety.
    pub fn load(&self) -> (Option<StoredOrders>, Option<StoreWarning>) {
        let path = self.store_path();
        if !path.exists() {
            return (None, None);
        }

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                return (
                    None,
                    Some(StoreWarning::LoadFailed(format!(
                        "Failed to open order store: {}",
                        e
                    ))),
                );
            }
        };

        if let Err(e) = file.lock_shared() {
            return (
                None,
                Some(StoreWarning::LoadFailed(format!(
                    "Failed to acquire read lock: {}",
                    e
                ))),
            );
        }

        let mut content = Vec::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_end(&mut content) {
            let _ = file.unlock();
            return (
                None,
                Some(StoreWarning::LoadFailed(format!(
                    "Failed to read order store: {}",
                    e
                ))),
            );
        }
        let _ = file.unlock();

        match simd_json::serde::from_slice::<StoredOrders>(&mut content) {
            Ok(stored) => {
                debug!(orders = stored.orders.len(), "loaded order store");
                (Some(stored), None)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "order store is corrupted");
                (
                    None,
                    Some(StoreWarning::Corrupted(format!(
                        "Corrupted order store: {}",
                        e
                    ))),
                )
            }
        }
    }

    /// Replace the stored collection. Atomic write (temp file + rename) under
    /// an exclusive lock; any failure leaves the previous file untouched.
    pub fn save(&self, orders: &[RawOrder]) -> Result<DateTime<Utc>> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| FoodtrackError::Storage(format!("Failed to create data dir: {}", e)))?;

        let last_synced = Utc::now();
        let stored = StoredOrders {
            last_synced,
            orders: orders.to_vec(),
        };

        let content = serde_json::to_vec(&stored)
            .map_err(|e| FoodtrackError::Storage(format!("Serialization failed: {}", e)))?;

        let path = self.store_path();
        let temp_path = path.with_extension("json.tmp");

        {
            let mut file = File::create(&temp_path)
                .map_err(|e| FoodtrackError::Storage(format!("Failed to create temp file: {}", e)))?;
            file.write_all(&content)
                .map_err(|e| FoodtrackError::Storage(format!("Failed to write temp file: {}", e)))?;
            file.sync_all()
                .map_err(|e| FoodtrackError::Storage(format!("Failed to sync temp file: {}", e)))?;
        }

        let target = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| FoodtrackError::Storage(format!("Failed to open order store: {}", e)))?;

        target
            .lock_exclusive()
            .map_err(|e| FoodtrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        fs::rename(&temp_path, &path)
            .map_err(|e| FoodtrackError::Storage(format!("Failed to rename temp file: {}", e)))?;

        let _ = target.unlock();
        debug!(orders = orders.len(), path = %path.display(), "saved order store");
        Ok(last_synced)
    }
}

/// `~/.foodtrack`
pub fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| FoodtrackError::Config("Cannot determine home directory".into()))?;
    Ok(base_dirs.home_dir().join(".foodtrack"))
}
