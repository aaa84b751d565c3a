// UI prompts and user interaction module

use colored::Colorize;
use dialoguer::Confirm;

use crate::core::driver::PromptDialog;

/// Acknowledge/cancel dialog on the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

impl PromptDialog for ConsolePrompt {
    fn confirm(&self, title: &str, message: &str) -> bool {
        println!();
        println!("{}", format!("⚠️  {}", title).yellow().bold());
        for line in message.lines() {
            println!("  {}", line);
        }
        println!();

        // No terminal or broken input counts as cancel
        Confirm::new()
            .with_prompt("Open the manual download page?")
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Display a warning message
pub fn warn(message: &str) {
    println!("{}", format!("⚠️  Warning: {}", message).yellow().bold());
}

/// Display an info message
pub fn info(message: &str) {
    println!("{}", message.cyan());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{}", message.green().bold());
}

/// Display an error message
pub fn error(message: &str) {
    println!("{}", message.red().bold());
}

/// Display a dimmed/secondary message
pub fn dimmed(message: &str) {
    println!("{}", message.dimmed());
}
