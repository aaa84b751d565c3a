//! Sequential mirror download with an independent deadline per attempt.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{LiteMonError, Result};

/// Transport-level failure of a single GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with a non-success status
    Status(u16),
    /// Connect, TLS or body read failed
    Network(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Status(code) => write!(f, "HTTP {}", code),
            TransportError::Network(msg) => write!(f, "{}", msg),
        }
    }
}

/// Fetches a whole response body. The returned future covers headers and body,
/// so wrapping it in a timeout bounds both.
pub trait MirrorTransport: Send + Sync {
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<Vec<u8>, TransportError>> + Send;
}

/// `reqwest` backed transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (proxy, TLS or timeout settings)
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl MirrorTransport for HttpTransport {
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<Vec<u8>, TransportError>> + Send {
        let request = self.client.get(url);

        async move {
            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status(status.as_u16()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            Ok(body.to_vec())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Accepted { bytes: usize },
    Timeout,
    HttpError(String),
    TooSmall { bytes: usize },
    /// Payload was fine but could not be written to the artifact path
    StorageError(String),
}

/// One mirror contacted during a race
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAttempt {
    pub url: String,
    pub deadline: Duration,
    pub outcome: AttemptOutcome,
}

/// Accepted payload, already persisted at `path`
#[derive(Debug)]
pub struct Download {
    pub url: String,
    pub path: PathBuf,
    pub payload: Vec<u8>,
    pub attempts: Vec<DownloadAttempt>,
}

/// No mirror produced an acceptable payload
#[derive(Debug)]
pub struct AllMirrorsExhausted {
    pub attempts: Vec<DownloadAttempt>,
}

impl From<AllMirrorsExhausted> for LiteMonError {
    fn from(e: AllMirrorsExhausted) -> Self {
        LiteMonError::AllMirrorsExhausted {
            attempts: e.attempts.len(),
        }
    }
}

/// Returns the mirror if it is a usable http(s) URL
fn usable_mirror(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(trimmed),
        Ok(parsed) => {
            log::warn!("[driver] skipping mirror with scheme {}: {}", parsed.scheme(), trimmed);
            None
        }
        Err(e) => {
            log::warn!("[driver] skipping malformed mirror {}: {}", trimmed, e);
            None
        }
    }
}

/// Tries mirrors one after another; the first acceptable payload wins
pub struct MirrorDownloadRace<T> {
    transport: T,
    artifact_path: PathBuf,
}

impl<T: MirrorTransport> MirrorDownloadRace<T> {
    pub fn new(transport: T, artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            artifact_path: artifact_path.into(),
        }
    }

    pub fn with_artifact_path(self, artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            ..self
        }
    }

    /// Single ordered pass over `mirrors`.
    ///
    /// Each attempt gets its own `per_attempt_timeout`. A payload is accepted
    /// only when the status was successful and it is larger than
    /// `min_valid_size`. Mirrors after the accepted one are never contacted.
    pub async fn fetch(
        &self,
        mirrors: &[String],
        per_attempt_timeout: Duration,
        min_valid_size: u64,
    ) -> std::result::Result<Download, AllMirrorsExhausted> {
        let mut attempts = Vec::new();

        for url in mirrors.iter().filter_map(|m| usable_mirror(m)) {
            log::info!("[driver] trying mirror {}", url);

            let outcome = match tokio::time::timeout(per_attempt_timeout, self.transport.get(url)).await {
                Err(_) => AttemptOutcome::Timeout,
                Ok(Err(e)) => AttemptOutcome::HttpError(e.to_string()),
                Ok(Ok(payload)) if payload.len() as u64 <= min_valid_size => {
                    AttemptOutcome::TooSmall {
                        bytes: payload.len(),
                    }
                }
                Ok(Ok(payload)) => match tokio::fs::write(&self.artifact_path, &payload).await {
                    Ok(()) => {
                        log::info!("[driver] downloaded {} bytes from {}", payload.len(), url);
                        attempts.push(DownloadAttempt {
                            url: url.to_string(),
                            deadline: per_attempt_timeout,
                            outcome: AttemptOutcome::Accepted {
                                bytes: payload.len(),
                            },
                        });
                        return Ok(Download {
                            url: url.to_string(),
                            path: self.artifact_path.clone(),
                            payload,
                            attempts,
                        });
                    }
                    Err(e) => AttemptOutcome::StorageError(e.to_string()),
                },
            };

            log::warn!("[driver] mirror {} failed: {:?}", url, outcome);
            attempts.push(DownloadAttempt {
                url: url.to_string(),
                deadline: per_attempt_timeout,
                outcome,
            });
        }

        Err(AllMirrorsExhausted { attempts })
    }
}
