//! Tokio runtime hosting the update loop and the per-session driver check.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::config::Config;
use super::driver::{
    ElevatedLauncher, MirrorTransport, ProvisioningOrchestrator, ProvisioningOutcome,
};
use super::sensors::{sensor_update_task, Readings, SensorHub};

/// Background work of one monitoring session.
///
/// The update loop runs until shutdown; the driver check runs once.
pub struct MonitorRuntime {
    /// Latest readings published by the update loop
    pub readings_rx: watch::Receiver<Arc<Readings>>,

    hub: Arc<SensorHub>,
    provisioning: Option<JoinHandle<ProvisioningOutcome>>,
    shutdown_tx: broadcast::Sender<()>,
    runtime: tokio::runtime::Runtime,
}

impl MonitorRuntime {
    pub fn start<T, L>(
        config: &Config,
        hub: Arc<SensorHub>,
        orchestrator: Option<ProvisioningOrchestrator<T, L>>,
    ) -> anyhow::Result<Self>
    where
        T: MirrorTransport + 'static,
        L: ElevatedLauncher,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("litemon-worker")
            .build()?;

        let (readings_tx, readings_rx) = watch::channel(Arc::new(Readings::default()));
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        runtime.spawn(sensor_update_task(
            Arc::clone(&hub),
            config.refresh_interval(),
            readings_tx,
            shutdown_tx.subscribe(),
        ));

        let provisioning = orchestrator.map(|orchestrator| {
            runtime.spawn(async move { orchestrator.smart_check_driver().await })
        });

        log::info!("Monitor runtime started");

        Ok(Self {
            readings_rx,
            hub,
            provisioning,
            shutdown_tx,
            runtime,
        })
    }

    pub fn hub(&self) -> &Arc<SensorHub> {
        &self.hub
    }

    /// True once the driver check has completed (or none was scheduled)
    pub fn provisioning_finished(&self) -> bool {
        self.provisioning
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    /// Wait for the session's driver check result
    pub fn wait_provisioning(&mut self) -> Option<ProvisioningOutcome> {
        let handle = self.provisioning.take()?;
        match self.runtime.block_on(handle) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log::error!("[driver] provisioning task failed: {}", e);
                None
            }
        }
    }

    /// Stop the update loop and drop the runtime
    pub fn shutdown(self) {
        log::info!("Shutting down monitor runtime");
        let _ = self.shutdown_tx.send(());
        self.runtime
            .shutdown_timeout(std::time::Duration::from_secs(1));
    }
}
