// Platform-specific code module

pub mod elevation;
pub mod registry;
pub mod shell;

// Re-exports for cleaner imports
pub use elevation::{is_elevated, SystemElevatedLauncher};
pub use registry::SystemRegistry;
pub use shell::DefaultBrowser;
