//! End-to-end sync: launch the host session, forward progress, wait for the
//! collected orders to be persisted.

use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use super::{Config, OrderStore};
use crate::collector::host::launch_sync;
use crate::collector::{CommandAck, LaunchOptions, SessionHost, SyncEvent, SyncStatus};
use crate::types::Result;

/// Run one full sync and report every progress event to `on_event`.
///
/// Events are delivered on a background task in emission order. Returns once
/// the orders are persisted, or with the error that stopped the sync.
pub async fn run_sync<F>(config: &Config, store: OrderStore, mut on_event: F) -> Result<SyncStatus>
where
    F: FnMut(&SyncEvent) + Send + 'static,
{
    let host = SessionHost::new(config, store)?;
    let mut events = host.subscribe();

    let forwarder = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    on_event(&event);
                    if event.is_terminal() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "progress listener fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let result = match launch_sync(&host, &LaunchOptions::from_config(config)).await {
        Ok(CommandAck::Started) => host
            .finish()
            .await
            .map(|status| status.unwrap_or(SyncStatus::AlreadyRunning)),
        Ok(CommandAck::AlreadyRunning) => Ok(SyncStatus::AlreadyRunning),
        Err(e) => Err(e),
    };

    // Dropping the host closes the event channel so the forwarder drains and exits
    drop(host);
    if let Err(e) = forwarder.await {
        warn!(error = %e, "progress forwarder failed");
    }

    result
}
