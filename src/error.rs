use std::io;
use thiserror::Error;

/// Custom error type for LiteMon
#[derive(Error, Debug)]
pub enum LiteMonError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Hardware provider error: {0}")]
    Provider(String),

    #[error("All {attempts} driver mirrors failed")]
    AllMirrorsExhausted { attempts: usize },

    #[error("Elevation denied: {0}")]
    ElevationDenied(String),

    #[error("Installer could not be started: {0}")]
    InstallCancelled(String),

    #[error("Sensor reload failed: {0}")]
    ReloadFailed(String),
}

/// Result type alias for LiteMon
pub type Result<T> = std::result::Result<T, LiteMonError>;

impl LiteMonError {
    /// Create a hardware provider error
    pub fn provider<S: Into<String>>(msg: S) -> Self {
        LiteMonError::Provider(msg.into())
    }

    pub fn elevation_denied<S: Into<String>>(msg: S) -> Self {
        LiteMonError::ElevationDenied(msg.into())
    }

    pub fn install_cancelled<S: Into<String>>(msg: S) -> Self {
        LiteMonError::InstallCancelled(msg.into())
    }

    pub fn reload_failed<S: Into<String>>(msg: S) -> Self {
        LiteMonError::ReloadFailed(msg.into())
    }
}
