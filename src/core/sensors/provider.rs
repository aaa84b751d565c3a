//! Hardware provider handle shared by the update loop and the reloader.

use serde::Serialize;
use sysinfo::{Components, CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use crate::error::{LiteMonError, Result};

/// Hardware group a sensor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SensorCategory {
    Cpu,
    Memory,
    Board,
}

impl SensorCategory {
    /// Prefix used for metric keys of this category
    pub fn key_prefix(&self) -> &'static str {
        match self {
            SensorCategory::Cpu => "CPU",
            SensorCategory::Memory => "MEM",
            SensorCategory::Board => "BOARD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SensorKind {
    Load,
    Clock,
    Temperature,
}

impl SensorKind {
    pub fn key_suffix(&self) -> &'static str {
        match self {
            SensorKind::Load => "Load",
            SensorKind::Clock => "Clock",
            SensorKind::Temperature => "Temp",
        }
    }
}

/// One entry of a provider's sensor enumeration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorDescriptor {
    /// Provider-side identifier, stable while the handle stays open
    pub id: String,
    pub category: SensorCategory,
    pub kind: SensorKind,
    /// Human readable label reported by the hardware
    pub name: String,
}

/// Live handle to the machine's hardware sensors.
///
/// The handle is closed and reopened in place when a driver install makes new
/// sensors available, so implementations must tolerate `open` after `close`.
pub trait HardwareProvider: Send {
    fn open(&mut self) -> Result<()>;
    fn close(&mut self);
    fn is_open(&self) -> bool;
    /// Refresh cached values before a round of `read` calls
    fn refresh(&mut self);
    /// Full sensor enumeration. Empty while closed.
    fn sensors(&self) -> Vec<SensorDescriptor>;
    fn read(&self, sensor_id: &str) -> Option<f32>;
}

const CPU_LOAD_ID: &str = "cpu/load";
const CPU_CLOCK_ID: &str = "cpu/clock";
const MEM_LOAD_ID: &str = "mem/load";
const COMPONENT_PREFIX: &str = "component/";

struct SysinfoState {
    system: System,
    components: Components,
}

/// Provider backed by `sysinfo`
#[derive(Default)]
pub struct SysinfoProvider {
    state: Option<SysinfoState>,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

fn refresh_kind() -> RefreshKind {
    RefreshKind::nothing()
        .with_cpu(CpuRefreshKind::everything())
        .with_memory(MemoryRefreshKind::everything())
}

/// Labels of CPU package/die temperature components across platforms
fn is_cpu_component(label: &str) -> bool {
    let label = label.to_lowercase();
    ["cpu", "package", "core", "tctl", "tdie", "k10temp", "coretemp"]
        .iter()
        .any(|needle| label.contains(needle))
}

impl HardwareProvider for SysinfoProvider {
    fn open(&mut self) -> Result<()> {
        let mut system = System::new_with_specifics(refresh_kind());
        system.refresh_cpu_all();
        system.refresh_memory();

        if system.cpus().is_empty() {
            return Err(LiteMonError::provider("no CPUs reported by the system"));
        }

        let components = Components::new_with_refreshed_list();
        self.state = Some(SysinfoState { system, components });
        Ok(())
    }

    fn close(&mut self) {
        self.state = None;
    }

    fn is_open(&self) -> bool {
        self.state.is_some()
    }

    fn refresh(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.system.refresh_cpu_all();
            state.system.refresh_memory();
            state.components.refresh(true);
        }
    }

    fn sensors(&self) -> Vec<SensorDescriptor> {
        let Some(state) = self.state.as_ref() else {
            return Vec::new();
        };

        let mut sensors = vec![
            SensorDescriptor {
                id: CPU_LOAD_ID.to_string(),
                category: SensorCategory::Cpu,
                kind: SensorKind::Load,
                name: "CPU Total".to_string(),
            },
            SensorDescriptor {
                id: CPU_CLOCK_ID.to_string(),
                category: SensorCategory::Cpu,
                kind: SensorKind::Clock,
                name: "CPU Clock".to_string(),
            },
            SensorDescriptor {
                id: MEM_LOAD_ID.to_string(),
                category: SensorCategory::Memory,
                kind: SensorKind::Load,
                name: "Memory".to_string(),
            },
        ];

        for component in state.components.iter() {
            let label = component.label();
            let category = if is_cpu_component(label) {
                SensorCategory::Cpu
            } else {
                SensorCategory::Board
            };
            sensors.push(SensorDescriptor {
                id: format!("{}{}", COMPONENT_PREFIX, label),
                category,
                kind: SensorKind::Temperature,
                name: label.to_string(),
            });
        }

        sensors
    }

    fn read(&self, sensor_id: &str) -> Option<f32> {
        let state = self.state.as_ref()?;

        match sensor_id {
            CPU_LOAD_ID => Some(state.system.global_cpu_usage()),
            CPU_CLOCK_ID => {
                let cpus = state.system.cpus();
                if cpus.is_empty() {
                    return None;
                }
                let total: u64 = cpus.iter().map(|cpu| cpu.frequency()).sum();
                Some(total as f32 / cpus.len() as f32)
            }
            MEM_LOAD_ID => {
                let total = state.system.total_memory();
                if total == 0 {
                    return None;
                }
                Some((state.system.used_memory() as f32 / total as f32) * 100.0)
            }
            id => {
                let label = id.strip_prefix(COMPONENT_PREFIX)?;
                state
                    .components
                    .iter()
                    .find(|c| c.label() == label)
                    .and_then(|c| c.temperature())
            }
        }
    }
}
