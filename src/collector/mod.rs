//! Order collector
//!
//! Drives the paginated order-history fetch: one request per page, a fixed
//! delay between pages, stop at the first page that yields no orders. A
//! collector runs at most one collection at a time.

pub mod events;
pub mod host;
pub mod http;
pub mod shapes;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::services::OrderStore;
use crate::types::{FoodtrackError, RawOrder, Result};

pub use events::SyncEvent;
use events::{
    failure_message, page_message, success_message, STARTING_MESSAGE, STORAGE_FAILED_MESSAGE,
};
pub use host::{CommandAck, HostChannel, HostCommand, LaunchOptions, RetryPolicy, SessionHost};
pub use http::HttpPageSource;
pub use shapes::{default_resolvers, resolve_orders, ShapeResolver};

/// Default wait between page requests
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(1000);

const EVENT_CAPACITY: usize = 64;

/// One page of the upstream order history
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch page `page` (1-based) and return its parsed body.
    /// A non-success HTTP status is `FoodtrackError::Fetch`.
    async fn fetch_page(&self, page: u32) -> Result<Value>;
}

/// Result of a collection request
#[derive(Debug, PartialEq)]
pub enum CollectOutcome {
    Collected(Vec<RawOrder>),
    /// Another collection was in flight; nothing was fetched
    AlreadyRunning,
}

/// Result of a sync request (collect + persist)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Completed { count: usize },
    AlreadyRunning,
}

pub struct OrderCollector<S> {
    source: S,
    resolvers: Vec<Box<dyn ShapeResolver>>,
    page_delay: Duration,
    in_progress: Arc<AtomicBool>,
    events: broadcast::Sender<SyncEvent>,
}

impl<S: PageSource> OrderCollector<S> {
    pub fn new(source: S) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            source,
            resolvers: default_resolvers(),
            page_delay: DEFAULT_PAGE_DELAY,
            in_progress: Arc::new(AtomicBool::new(false)),
            events,
        }
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    /// Replace the shape resolver chain (first match wins)
    pub fn with_resolvers(mut self, resolvers: Vec<Box<dyn ShapeResolver>>) -> Self {
        self.resolvers = resolvers;
        self
    }

    /// Receive progress events from subsequent collections
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Fetch every page until the first empty one.
    ///
    /// Rejected with `AlreadyRunning` while another collection (or sync) on
    /// this collector is in flight. Any fetch failure aborts the whole
    /// collection; no partial result is returned.
    pub async fn collect_all_orders(&self) -> Result<CollectOutcome> {
        let Some(_permit) = self.try_reserve() else {
            debug!("collection rejected, already running");
            return Ok(CollectOutcome::AlreadyRunning);
        };
        self.fetch_all().await.map(CollectOutcome::Collected)
    }

    /// Collect every order and replace the stored collection.
    ///
    /// Emits `SyncComplete` or `SyncFailed` as the final event. On any
    /// failure the previously stored collection is left untouched.
    pub async fn sync(&self, store: &OrderStore) -> Result<SyncStatus> {
        let Some(permit) = self.try_reserve() else {
            debug!("sync rejected, already running");
            return Ok(SyncStatus::AlreadyRunning);
        };
        self.sync_reserved(permit, store).await
    }

    /// Claim the in-progress flag without starting anything.
    ///
    /// The flag stays held until the returned permit is dropped, so a caller
    /// can accept a request now and run it later on another task.
    pub fn try_reserve(&self) -> Option<SyncPermit> {
        SyncPermit::acquire(&self.in_progress)
    }

    /// Run a sync under a permit already taken with [`try_reserve`](Self::try_reserve)
    pub async fn sync_reserved(&self, permit: SyncPermit, store: &OrderStore) -> Result<SyncStatus> {
        let _permit = permit;

        self.notify(SyncEvent::status(STARTING_MESSAGE));

        let orders = match self.fetch_all().await {
            Ok(orders) => orders,
            Err(e) => {
                warn!(error = %e, "sync failed");
                self.notify(SyncEvent::SyncFailed {
                    message: failure_message(&e.to_string()),
                });
                return Err(e);
            }
        };

        let count = match persist(store.clone(), orders).await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "failed to persist orders");
                self.notify(SyncEvent::SyncFailed {
                    message: STORAGE_FAILED_MESSAGE.to_string(),
                });
                return Err(e);
            }
        };

        info!(count, "sync complete");
        self.notify(SyncEvent::status(success_message(count)));
        self.notify(SyncEvent::SyncComplete { count });
        Ok(SyncStatus::Completed { count })
    }

    async fn fetch_all(&self) -> Result<Vec<RawOrder>> {
        let mut all_orders = Vec::new();
        let mut page: u32 = 1;

        loop {
            self.notify(SyncEvent::status(page_message(page)));

            let body = self.source.fetch_page(page).await?;
            let orders = resolve_orders(&self.resolvers, &body);

            if orders.is_empty() {
                if page == 1 {
                    warn!("no orders found on the first page");
                } else {
                    debug!(page, "reached end of order history");
                }
                break;
            }

            debug!(page, count = orders.len(), "fetched page");
            all_orders.extend(orders);
            page = page
                .checked_add(1)
                .ok_or_else(|| FoodtrackError::Parse("page counter overflow".into()))?;

            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        Ok(all_orders)
    }

    fn notify(&self, event: SyncEvent) {
        if let SyncEvent::StatusUpdate { message } = &event {
            info!("{}", message);
        }
        // No subscribers is not an error
        let _ = self.events.send(event);
    }
}

/// Write the collection off the async workers (file lock + fsync)
async fn persist(store: OrderStore, orders: Vec<RawOrder>) -> Result<usize> {
    tokio::task::spawn_blocking(move || store.save(&orders).map(|_| orders.len()))
        .await
        .map_err(|e| FoodtrackError::Storage(format!("save task failed: {}", e)))?
}

/// Holds a collector's in-progress flag; released on drop
#[derive(Debug)]
pub struct SyncPermit {
    flag: Arc<AtomicBool>,
}

impl SyncPermit {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for SyncPermit {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
