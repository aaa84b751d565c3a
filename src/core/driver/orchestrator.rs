//! Decides whether the accessor driver needs provisioning and runs
//! download → install → reload.

use std::path::PathBuf;
use std::sync::Arc;

use super::download::{AllMirrorsExhausted, MirrorDownloadRace, MirrorTransport};
use super::installer::{ElevatedInstaller, ElevatedLauncher, InstallResult};
use super::notify::{FailureReason, Notifier};
use super::presence::PresenceChecker;
use crate::core::config::{Config, DriverConfig};
use crate::core::sensors::{ReloadOutcome, SafeReloader, SensorHub};
use crate::error::LiteMonError;

/// Recomputed on every check, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisioningState {
    pub driver_installed: bool,
    pub cpu_sensors_valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// This platform exposes CPU sensors without the accessor driver
    NotRequired,
    /// No CPU metric is enabled, so the driver would be unused
    CpuMetricsDisabled,
    /// The session ended before the check could finish
    Cancelled,
}

#[derive(Debug)]
pub enum ProvisioningOutcome {
    Skipped(SkipReason),
    /// Nothing to do. CPU sensors may still be missing; that case is only logged.
    AlreadyInstalled(ProvisioningState),
    DownloadFailed(AllMirrorsExhausted),
    InstallFailed(InstallResult),
    Installed(ReloadOutcome),
}

pub struct ProvisioningOrchestrator<T, L> {
    driver: DriverConfig,
    cpu_metrics_enabled: bool,
    presence: Arc<PresenceChecker>,
    download: MirrorDownloadRace<T>,
    installer: ElevatedInstaller<L>,
    hub: Arc<SensorHub>,
    reloader: SafeReloader,
    notifier: Arc<dyn Notifier>,
}

impl<T: MirrorTransport, L: ElevatedLauncher> ProvisioningOrchestrator<T, L> {
    pub fn new(
        config: &Config,
        presence: PresenceChecker,
        transport: T,
        launcher: L,
        hub: Arc<SensorHub>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            driver: config.driver.clone(),
            cpu_metrics_enabled: config.is_any_enabled("CPU"),
            presence: Arc::new(presence),
            download: MirrorDownloadRace::new(transport, config.driver.artifact_path()),
            installer: ElevatedInstaller::new(launcher),
            reloader: SafeReloader::new(Arc::clone(&hub)),
            hub,
            notifier,
        }
    }

    /// Store the downloaded installer somewhere other than the temp directory
    pub fn with_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.download = self.download.with_artifact_path(path);
        self
    }

    pub fn provisioning_state(&self) -> ProvisioningState {
        state_of(&self.presence, &self.hub)
    }

    /// One provisioning pass. Terminal failures notify the user exactly once;
    /// there are no retries within a call.
    pub async fn smart_check_driver(&self) -> ProvisioningOutcome {
        if !self.driver.required {
            log::debug!("[driver] accessor driver not required on this platform");
            return ProvisioningOutcome::Skipped(SkipReason::NotRequired);
        }
        if !self.cpu_metrics_enabled {
            return ProvisioningOutcome::Skipped(SkipReason::CpuMetricsDisabled);
        }

        // Registry reads and the provider lock block, keep them off the workers
        let presence = Arc::clone(&self.presence);
        let hub = Arc::clone(&self.hub);
        let Some(state) = run_blocking(move || state_of(&presence, &hub)).await else {
            return ProvisioningOutcome::Skipped(SkipReason::Cancelled);
        };
        if state.driver_installed {
            if !state.cpu_sensors_valid {
                log::warn!("[driver] driver is registered but no CPU sensors are visible");
            }
            return ProvisioningOutcome::AlreadyInstalled(state);
        }

        log::info!("[driver] driver missing, attempting silent install");

        let download = match self
            .download
            .fetch(
                &self.driver.mirrors,
                self.driver.attempt_timeout(),
                self.driver.min_valid_size,
            )
            .await
        {
            Ok(download) => download,
            Err(exhausted) => {
                log::error!(
                    "[driver] all {} mirror attempts failed",
                    exhausted.attempts.len()
                );
                self.notifier.notify(FailureReason::NetworkFailure);
                return ProvisioningOutcome::DownloadFailed(exhausted);
            }
        };

        let result = self
            .installer
            .install(&download.path, &self.driver.installer_args)
            .await;
        if !result.is_success() {
            log::error!("[driver] installation failed: {:?}", result);
            self.notifier.notify(FailureReason::InstallBlocked);
            return ProvisioningOutcome::InstallFailed(result);
        }

        log::info!("[driver] installed, reloading sensors");
        let reloader = self.reloader.clone();
        let reload = run_blocking(move || reloader.reload())
            .await
            .unwrap_or_else(|| {
                ReloadOutcome::Failed(LiteMonError::reload_failed("reload cancelled"))
            });
        ProvisioningOutcome::Installed(reload)
    }
}

fn state_of(presence: &PresenceChecker, hub: &SensorHub) -> ProvisioningState {
    ProvisioningState {
        driver_installed: presence.check_installed(),
        cpu_sensors_valid: hub.cpu_sensor_count() > 0,
    }
}

/// Run a blocking step on the blocking pool. Panics are propagated; `None`
/// means the runtime shut down before the step ran.
async fn run_blocking<R, F>(f: F) -> Option<R>
where
    R: Send + 'static,
    F: FnOnce() -> R + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(value) => Some(value),
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            log::warn!("[driver] blocking step cancelled: {}", e);
            None
        }
    }
}
