use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Refresh interval used when the configured one is missing or too small.
pub const DEFAULT_REFRESH_MS: u64 = 1000;
const MIN_REFRESH_MS: u64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Update loop interval in milliseconds
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    /// Metric keys shown by the overlay (e.g. "CPU.Load", "MEM.Load")
    #[serde(default = "default_enabled_items")]
    pub enabled_items: Vec<String>,
    #[serde(default)]
    pub driver: DriverConfig,
}

/// Settings for the sensor accessor driver provisioning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Whether this platform needs the accessor driver at all
    pub required: bool,
    /// Uninstall record looked up under HKLM in both registry views
    pub registry_key: String,
    /// Download sources, tried in order
    pub mirrors: Vec<String>,
    pub attempt_timeout_secs: u64,
    /// Payloads of this size or smaller are rejected
    pub min_valid_size: u64,
    pub user_agent: String,
    pub installer_args: Vec<String>,
    /// File name of the downloaded installer inside the temp directory
    pub artifact_name: String,
    pub manual_download_url: String,
}

fn default_refresh_ms() -> u64 {
    DEFAULT_REFRESH_MS
}

fn default_enabled_items() -> Vec<String> {
    ["CPU.Load", "CPU.Temp", "CPU.Clock", "MEM.Load"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_ms: default_refresh_ms(),
            enabled_items: default_enabled_items(),
            driver: DriverConfig::default(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            required: cfg!(windows),
            registry_key: r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall\PawnIO"
                .to_string(),
            // Regional mirror first, canonical release last
            mirrors: vec![
                "https://gitee.com/Diorser/LiteMonitor/raw/master/resources/assets/PawnIO_setup.exe"
                    .to_string(),
                "https://litemonitor.cn/update/PawnIO_setup.exe".to_string(),
                "https://github.com/namazso/PawnIO.Setup/releases/latest/download/PawnIO_setup.exe"
                    .to_string(),
            ],
            attempt_timeout_secs: 10,
            min_valid_size: 1024,
            user_agent: "LiteMon-AutoUpdater".to_string(),
            installer_args: vec!["-install".to_string(), "-silent".to_string()],
            artifact_name: "LiteMon_Driver.exe".to_string(),
            manual_download_url:
                "https://github.com/namazso/PawnIO.Setup/releases/latest".to_string(),
        }
    }
}

impl Config {
    /// Load the config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load the config from an explicit path.
    ///
    /// A missing, empty or unreadable-as-JSON file yields the defaults.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        if data.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Config::default());
        }

        Ok(serde_json::from_slice(&data).unwrap_or_else(|e| {
            log::warn!(
                "Config file {:?} could not be parsed ({}), using defaults",
                config_path,
                e
            );
            Config::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data =
            serde_json::to_vec_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(config_path, data)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("litemon").join("config.json"))
    }

    /// Refresh interval actually used by the update loop
    pub fn refresh_interval(&self) -> Duration {
        let ms = if self.refresh_ms < MIN_REFRESH_MS {
            DEFAULT_REFRESH_MS
        } else {
            self.refresh_ms
        };
        Duration::from_millis(ms)
    }

    /// True if any enabled item belongs to the given category ("CPU" matches "CPU.Load")
    pub fn is_any_enabled(&self, category: &str) -> bool {
        self.enabled_items.iter().any(|item| {
            item.split('.')
                .next()
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(category))
        })
    }
}

impl DriverConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    /// Fixed location the downloaded installer is written to
    pub fn artifact_path(&self) -> PathBuf {
        std::env::temp_dir().join(&self.artifact_name)
    }
}
