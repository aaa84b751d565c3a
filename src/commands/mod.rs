// Command handlers module
pub mod config;
pub mod driver;
pub mod monitor;
pub mod sensors;
pub mod version;
