//! Elevated, silent execution of the downloaded driver installer.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

/// Outcome of one installer run.
///
/// `cancelled` means no installer process ever ran (elevation refused or the
/// spawn failed), which is reported differently from a nonzero exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstallResult {
    pub exit_code: Option<i32>,
    pub cancelled: bool,
}

impl InstallResult {
    pub fn completed(exit_code: Option<i32>) -> Self {
        Self {
            exit_code,
            cancelled: false,
        }
    }

    pub fn cancelled() -> Self {
        Self {
            exit_code: None,
            cancelled: true,
        }
    }

    pub fn is_success(&self) -> bool {
        !self.cancelled && self.exit_code == Some(0)
    }
}

/// Runs a program with administrative rights and waits for it to exit.
///
/// Returns the exit code (`None` if the platform could not report one).
/// Errors mean the process never started.
pub trait ElevatedLauncher: Send + Sync + 'static {
    fn run_elevated(&self, program: &Path, args: &[String]) -> Result<Option<i32>>;
}

pub struct ElevatedInstaller<L> {
    launcher: Arc<L>,
}

impl<L: ElevatedLauncher> ElevatedInstaller<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher: Arc::new(launcher),
        }
    }

    /// Run the installer and remove it afterwards, whatever happened.
    ///
    /// The wait is unbounded (the elevation prompt is user paced), so it runs
    /// on the blocking pool.
    pub async fn install(&self, artifact: &Path, silent_args: &[String]) -> InstallResult {
        let launcher = Arc::clone(&self.launcher);
        let program = artifact.to_path_buf();
        let args = silent_args.to_vec();

        let joined =
            tokio::task::spawn_blocking(move || launcher.run_elevated(&program, &args)).await;

        let result = match joined {
            Ok(Ok(exit_code)) => {
                log::info!("[driver] installer exited with {:?}", exit_code);
                InstallResult::completed(exit_code)
            }
            Ok(Err(e)) => {
                log::warn!("[driver] installer did not run: {}", e);
                InstallResult::cancelled()
            }
            Err(e) => {
                log::error!("[driver] installer task aborted: {}", e);
                InstallResult::cancelled()
            }
        };

        remove_artifact(artifact);
        result
    }
}

fn remove_artifact(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        log::debug!("[driver] could not remove {}: {}", path.display(), e);
    }
}
