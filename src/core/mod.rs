// Core business logic module

pub mod config;
pub mod driver;
pub mod runtime;
pub mod sensors;

// Re-export commonly used items
pub use config::{Config, DriverConfig};
pub use runtime::MonitorRuntime;
pub use sensors::{SafeReloader, SensorHub, SensorMap};
