//! Host session discovery and sync launch
//!
//! A sync is started by delivering a command to a host that owns an
//! authenticated session on the target site. The host is located (or opened),
//! polled until ready, and the command is delivered under bounded retries.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{HttpPageSource, OrderCollector, SyncEvent, SyncStatus};
use crate::services::{Config, OrderStore};
use crate::types::{FoodtrackError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    StartSync,
}

/// Host reply to a delivered command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAck {
    Started,
    AlreadyRunning,
}

/// Capability to locate, open and drive a host session
#[async_trait]
pub trait HostChannel: Send + Sync {
    type Tab: Send + Sync;

    /// An already open session, if any
    async fn find_tab(&self) -> Option<Self::Tab>;

    async fn open_tab(&self) -> Result<Self::Tab>;

    /// Whether the session finished loading and can take commands
    async fn is_ready(&self, tab: &Self::Tab) -> bool;

    async fn send_command(&self, tab: &Self::Tab, command: HostCommand) -> Result<CommandAck>;
}

/// Fixed-interval retry with a bounded number of attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Run `op` (given the 1-based attempt number) until it yields `Some`.
    /// Returns `None` once `max_attempts` attempts have failed.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Option<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        for attempt in 1..=self.max_attempts {
            if let Some(value) = op(attempt).await {
                return Some(value);
            }
            if attempt < self.max_attempts && !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOptions {
    pub readiness: RetryPolicy,
    /// Wait after a newly opened host reports ready
    pub settle_delay: Duration,
    pub delivery: RetryPolicy,
}

impl LaunchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            readiness: RetryPolicy::new(
                config.ready_attempts,
                Duration::from_millis(config.ready_interval_ms),
            ),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            delivery: RetryPolicy::new(
                config.delivery_attempts,
                Duration::from_millis(config.delivery_interval_ms),
            ),
        }
    }
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Locate or open a host, wait until it is ready and deliver `StartSync`
pub async fn launch_sync<H: HostChannel>(host: &H, options: &LaunchOptions) -> Result<CommandAck> {
    let (tab, opened) = match host.find_tab().await {
        Some(tab) => {
            debug!("reusing existing host session");
            (tab, false)
        }
        None => {
            info!("opening new host session");
            (host.open_tab().await?, true)
        }
    };
    let tab = &tab;

    let ready = options
        .readiness
        .run(move |attempt| async move {
            let ready = host.is_ready(tab).await;
            if !ready {
                debug!(attempt, "host not ready yet");
            }
            ready.then_some(())
        })
        .await;
    if ready.is_none() {
        return Err(FoodtrackError::Host(format!(
            "host not ready after {} attempts",
            options.readiness.max_attempts
        )));
    }

    if opened && !options.settle_delay.is_zero() {
        tokio::time::sleep(options.settle_delay).await;
    }

    options
        .delivery
        .run(move |attempt| async move {
            match host.send_command(tab, HostCommand::StartSync).await {
                Ok(ack) => Some(ack),
                Err(e) => {
                    warn!(attempt, error = %e, "command delivery failed");
                    None
                }
            }
        })
        .await
        .ok_or_else(|| {
            FoodtrackError::Host(format!(
                "command not delivered after {} attempts",
                options.delivery.max_attempts
            ))
        })
}

/// Session handle produced by [`SessionHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTab {
    /// Whether a session cookie is attached
    pub authenticated: bool,
}

/// In-process host: an HTTP session against the configured site that runs
/// syncs on a background task.
pub struct SessionHost {
    collector: Arc<OrderCollector<HttpPageSource>>,
    store: Arc<OrderStore>,
    probe: Client,
    base_url: String,
    authenticated: bool,
    task: Mutex<Option<JoinHandle<Result<SyncStatus>>>>,
}

impl SessionHost {
    pub fn new(config: &Config, store: OrderStore) -> Result<Self> {
        let source = HttpPageSource::new(config)?;
        let probe = source.client().clone();
        let collector = OrderCollector::new(source).with_page_delay(config.page_delay());
        Ok(Self {
            collector: Arc::new(collector),
            store: Arc::new(store),
            probe,
            base_url: config.base_url.clone(),
            authenticated: config.cookie.is_some(),
            task: Mutex::new(None),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.collector.subscribe()
    }

    /// Wait for the sync started by the last delivered command.
    /// `None` when no sync was started.
    pub async fn finish(&self) -> Result<Option<SyncStatus>> {
        let handle = self
            .task
            .lock()
            .map_err(|_| FoodtrackError::Host("sync task lock poisoned".into()))?
            .take();
        match handle {
            Some(handle) => handle
                .await
                .map_err(|e| FoodtrackError::Host(format!("sync task failed: {}", e)))?
                .map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl HostChannel for SessionHost {
    type Tab = SessionTab;

    async fn find_tab(&self) -> Option<SessionTab> {
        self.authenticated.then_some(SessionTab {
            authenticated: true,
        })
    }

    async fn open_tab(&self) -> Result<SessionTab> {
        warn!("no session cookie configured, requests will be anonymous");
        Ok(SessionTab {
            authenticated: false,
        })
    }

    async fn is_ready(&self, _tab: &SessionTab) -> bool {
        match self.probe.get(&self.base_url).send().await {
            Ok(response) => {
                debug!(status = response.status().as_u16(), "host probe");
                true
            }
            Err(e) => {
                debug!(error = %e, "host probe failed");
                false
            }
        }
    }

    async fn send_command(&self, _tab: &SessionTab, command: HostCommand) -> Result<CommandAck> {
        match command {
            HostCommand::StartSync => {
                let Some(permit) = self.collector.try_reserve() else {
                    return Ok(CommandAck::AlreadyRunning);
                };
                let collector = Arc::clone(&self.collector);
                let store = Arc::clone(&self.store);
                let handle =
                    tokio::spawn(async move { collector.sync_reserved(permit, &store).await });
                *self
                    .task
                    .lock()
                    .map_err(|_| FoodtrackError::Host("sync task lock poisoned".into()))? =
                    Some(handle);
                Ok(CommandAck::Started)
            }
        }
    }
}
