//! Sensor accessor driver provisioning.
//!
//! Detects whether the kernel-mode accessor driver is registered, downloads
//! its installer from an ordered mirror list, runs it elevated and reloads the
//! sensor provider so the newly exposed sensors show up.

mod download;
mod installer;
mod notify;
mod orchestrator;
mod presence;

pub use download::{
    AllMirrorsExhausted, AttemptOutcome, Download, DownloadAttempt, HttpTransport,
    MirrorDownloadRace, MirrorTransport, TransportError,
};
pub use installer::{ElevatedInstaller, ElevatedLauncher, InstallResult};
pub use notify::{
    FailureReason, NotificationPresenter, Notifier, PromptDialog, UiExecutor, UiJob, UrlOpener,
    DIALOG_TITLE,
};
pub use orchestrator::{ProvisioningOrchestrator, ProvisioningOutcome, ProvisioningState, SkipReason};
pub use presence::{PresenceChecker, ProbeOutcome, RegistryProbe, RegistryView};
