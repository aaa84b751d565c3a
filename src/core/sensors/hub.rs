//! Shared sensor state and the in-place provider reload.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use super::provider::{HardwareProvider, SensorCategory};
use super::sensor_map::SensorMap;
use crate::error::{LiteMonError, Result};

/// One update tick worth of values, keyed by metric key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Readings {
    pub timestamp: i64,
    pub values: BTreeMap<String, f32>,
}

/// Owns the hardware provider handle and the current sensor map.
///
/// The provider mutex is held by the update loop while sampling and by the
/// reloader for close+reopen only. The map is swapped as a whole `Arc`.
pub struct SensorHub {
    provider: Mutex<Box<dyn HardwareProvider>>,
    map: RwLock<Arc<SensorMap>>,
}

impl SensorHub {
    /// Wrap a provider without opening it. The map starts empty.
    pub fn new(provider: Box<dyn HardwareProvider>) -> Self {
        Self {
            provider: Mutex::new(provider),
            map: RwLock::new(Arc::new(SensorMap::default())),
        }
    }

    /// Open the provider and build the initial map
    pub fn open(mut provider: Box<dyn HardwareProvider>) -> Result<Self> {
        provider.open()?;
        let map = SensorMap::build(&provider.sensors());
        log::info!("[sensors] provider opened with {} mapped keys", map.len());

        Ok(Self {
            provider: Mutex::new(provider),
            map: RwLock::new(Arc::new(map)),
        })
    }

    /// Consistent snapshot of the current map
    pub fn sensor_map(&self) -> Arc<SensorMap> {
        Arc::clone(&self.map.read())
    }

    fn publish(&self, map: SensorMap) {
        *self.map.write() = Arc::new(map);
    }

    /// Number of CPU sensors the live provider currently enumerates
    pub fn cpu_sensor_count(&self) -> usize {
        self.provider
            .lock()
            .sensors()
            .iter()
            .filter(|s| s.category == SensorCategory::Cpu)
            .count()
    }

    /// Refresh the provider and read every mapped key.
    ///
    /// A provider left closed by a failed reload yields no values.
    pub fn sample(&self) -> Readings {
        let map = self.sensor_map();
        let mut provider = self.provider.lock();
        if !provider.is_open() {
            return Readings {
                timestamp: chrono::Utc::now().timestamp(),
                values: BTreeMap::new(),
            };
        }
        provider.refresh();

        let values = map
            .iter()
            .filter_map(|(key, sensor)| {
                provider
                    .read(&sensor.sensor_id)
                    .map(|value| (key.clone(), value))
            })
            .collect();

        Readings {
            timestamp: chrono::Utc::now().timestamp(),
            values,
        }
    }
}

/// Result of a hot reload
#[derive(Debug)]
pub enum ReloadOutcome {
    Reloaded { mapped_keys: usize },
    /// The previous map is still published
    Failed(LiteMonError),
}

impl ReloadOutcome {
    pub fn is_reloaded(&self) -> bool {
        matches!(self, ReloadOutcome::Reloaded { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            ReloadOutcome::Reloaded { mapped_keys } => {
                format!("sensors reloaded, {} metric keys available", mapped_keys)
            }
            ReloadOutcome::Failed(e) => format!("sensor reload failed: {}", e),
        }
    }
}

/// Reinitializes the provider in place so newly available sensors show up
#[derive(Clone)]
pub struct SafeReloader {
    hub: Arc<SensorHub>,
}

impl SafeReloader {
    pub fn new(hub: Arc<SensorHub>) -> Self {
        Self { hub }
    }

    pub fn reload(&self) -> ReloadOutcome {
        match self.try_reload() {
            Ok(mapped_keys) => {
                log::info!("[sensors] provider reloaded, {} keys mapped", mapped_keys);
                ReloadOutcome::Reloaded { mapped_keys }
            }
            Err(e) => {
                log::error!("[sensors] reload failed: {}", e);
                ReloadOutcome::Failed(e)
            }
        }
    }

    fn try_reload(&self) -> Result<usize> {
        let sensors = {
            let mut provider = self.hub.provider.lock();
            provider.close();
            provider
                .open()
                .map_err(|e| LiteMonError::reload_failed(e.to_string()))?;
            provider.sensors()
        };

        // Built outside the provider lock; only the swap is exclusive
        let map = SensorMap::build(&sensors);
        let mapped_keys = map.len();
        self.hub.publish(map);
        Ok(mapped_keys)
    }
}
