//! Hardware sensor backend: provider handle, sensor map and hot reload.

mod hub;
mod provider;
mod sensor_map;
mod update_loop;

pub use hub::{Readings, ReloadOutcome, SafeReloader, SensorHub};
pub use provider::{
    HardwareProvider, SensorCategory, SensorDescriptor, SensorKind, SysinfoProvider,
};
pub use sensor_map::{SensorMap, SensorRef};
pub use update_loop::sensor_update_task;
