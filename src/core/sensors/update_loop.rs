//! Periodic metrics-update task.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::time::{interval, Duration, MissedTickBehavior};

use super::hub::{Readings, SensorHub};

/// Task that samples every mapped sensor at the configured refresh interval.
///
/// Reads go through the hub, so a concurrent reload only delays a tick by the
/// close+reopen window.
pub async fn sensor_update_task(
    hub: Arc<SensorHub>,
    refresh: Duration,
    readings_tx: watch::Sender<Arc<Readings>>,
    mut shutdown: broadcast::Receiver<()>,
) {
    log::debug!("[sensors] update loop started ({:?})", refresh);

    let mut ticker = interval(refresh);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let readings = hub.sample();

                // Only fails once every receiver is gone
                if readings_tx.send(Arc::new(readings)).is_err() {
                    break;
                }
            }
            _ = shutdown.recv() => {
                log::debug!("[sensors] update loop shutting down");
                break;
            }
        }
    }
}
