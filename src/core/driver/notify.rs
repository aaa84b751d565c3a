//! User notification for terminal provisioning failures.

use std::sync::Arc;

pub const DIALOG_TITLE: &str = "LiteMon";

/// Terminal failures the user is told about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Every mirror timed out, errored or returned an undersized payload
    NetworkFailure,
    /// Elevation refused, installer could not start, or it exited nonzero
    InstallBlocked,
}

impl FailureReason {
    pub fn detail(&self) -> &'static str {
        match self {
            FailureReason::NetworkFailure => {
                "The download timed out or the connection failed. Please check your network."
            }
            FailureReason::InstallBlocked => {
                "The automatic installation was cancelled or blocked."
            }
        }
    }

    pub fn message(&self) -> String {
        format!(
            "The CPU sensor driver (PawnIO) is missing!\n\n\
             LiteMon could not set up the CPU driver automatically.\n{}\n\n\
             Choose OK to download and install it manually.",
            self.detail()
        )
    }
}

/// Unit of work that must run on the UI-owning thread
pub type UiJob = Box<dyn FnOnce() + Send + 'static>;

/// Scheduler of the UI-owning thread
pub trait UiExecutor: Send + Sync {
    /// True while a UI thread is around to run submitted jobs
    fn is_live(&self) -> bool;
    /// Queue a job. Hands the job back if the UI thread went away.
    fn submit(&self, job: UiJob) -> Result<(), UiJob>;
}

/// Acknowledge/cancel dialog
pub trait PromptDialog: Send + Sync {
    /// True when the user acknowledged
    fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Opens a URL with the platform's default handler
pub trait UrlOpener: Send + Sync {
    fn open_url(&self, url: &str) -> std::io::Result<()>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, reason: FailureReason);
}

pub struct NotificationPresenter {
    executor: Arc<dyn UiExecutor>,
    prompt: Arc<dyn PromptDialog>,
    opener: Arc<dyn UrlOpener>,
    manual_download_url: String,
}

impl NotificationPresenter {
    pub fn new(
        executor: Arc<dyn UiExecutor>,
        prompt: Arc<dyn PromptDialog>,
        opener: Arc<dyn UrlOpener>,
        manual_download_url: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            prompt,
            opener,
            manual_download_url: manual_download_url.into(),
        }
    }

    fn dialog_job(&self, reason: FailureReason) -> UiJob {
        let prompt = Arc::clone(&self.prompt);
        let opener = Arc::clone(&self.opener);
        let url = self.manual_download_url.clone();

        Box::new(move || {
            if !prompt.confirm(DIALOG_TITLE, &reason.message()) {
                return;
            }
            if let Err(e) = opener.open_url(&url) {
                log::warn!("[driver] could not open {}: {}", url, e);
            }
        })
    }
}

impl Notifier for NotificationPresenter {
    fn notify(&self, reason: FailureReason) {
        log::warn!("[driver] notifying user: {:?}", reason);
        let job = self.dialog_job(reason);

        if !self.executor.is_live() {
            job();
            return;
        }

        if let Err(job) = self.executor.submit(job) {
            log::debug!("[driver] UI thread gone, showing dialog inline");
            job();
        }
    }
}
