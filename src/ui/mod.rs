// UI and formatting module

pub mod dispatcher;
pub mod formatters;
pub mod prompts;

// Re-export commonly used items for cleaner imports
pub use dispatcher::{ui_channel, NoUiThread, UiDispatcher, UiLoop};
pub use formatters::{format_reading, format_readings_line, format_timestamp};
pub use prompts::{dimmed, error, info, success, warn, ConsolePrompt};
