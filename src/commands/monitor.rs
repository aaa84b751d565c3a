//! Overlay session: live readings plus the once-per-session driver check.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use super::driver::{print_outcome, system_orchestrator};
use crate::core::runtime::MonitorRuntime;
use crate::core::sensors::{SensorHub, SysinfoProvider};
use crate::core::Config;
use crate::ui::{format_readings_line, format_timestamp, ui_channel};

/// How often the UI thread drains queued jobs and checks for new readings
const UI_FRAME: Duration = Duration::from_millis(50);

/// Execute the monitor command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(interval) = matches.get_one::<u64>("interval") {
        config.refresh_ms = *interval;
    }
    let skip_driver_check = matches.get_flag("no-driver-check");
    let json_output = matches.get_flag("json");

    let hub = Arc::new(
        SensorHub::open(Box::new(SysinfoProvider::new()))
            .context("Failed to open hardware sensors")?,
    );

    // This thread owns the UI loop for the whole session
    let (dispatcher, mut ui_loop) = ui_channel();
    let orchestrator = if skip_driver_check {
        None
    } else {
        Some(system_orchestrator(
            &config,
            Arc::clone(&hub),
            Arc::new(dispatcher),
        )?)
    };

    let mut runtime = MonitorRuntime::start(&config, hub, orchestrator)
        .context("Failed to start monitor runtime")?;

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl+C handler")?;

    if !json_output {
        println!("{}", "LiteMon running, press Ctrl+C to stop".dimmed());
    }

    let mut readings_rx = runtime.readings_rx.clone();
    let mut outcome_reported = skip_driver_check;

    while running.load(Ordering::SeqCst) {
        ui_loop.run_pending();

        if readings_rx.has_changed().unwrap_or(false) {
            let readings = readings_rx.borrow_and_update().clone();
            if json_output {
                println!("{}", serde_json::to_string(&*readings)?);
            } else {
                print!(
                    "\r{} {}",
                    format_timestamp(readings.timestamp).dimmed(),
                    format_readings_line(&readings, &config.enabled_items)
                );
                io::stdout().flush()?;
            }
        }

        if !outcome_reported && runtime.provisioning_finished() {
            outcome_reported = true;
            if let Some(outcome) = runtime.wait_provisioning() {
                log::info!("[driver] session check finished: {:?}", outcome);
                if !json_output {
                    println!();
                    print_outcome(&outcome);
                }
            }
        }

        std::thread::sleep(UI_FRAME);
    }

    println!();
    runtime.shutdown();
    Ok(())
}
