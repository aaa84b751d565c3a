//! Driver status and one-shot provisioning.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::driver::{
    HttpTransport, NotificationPresenter, PresenceChecker, ProvisioningOrchestrator,
    ProvisioningOutcome, SkipReason, UiExecutor,
};
use crate::core::sensors::{SensorHub, SysinfoProvider};
use crate::core::Config;
use crate::platform::{is_elevated, DefaultBrowser, SystemElevatedLauncher, SystemRegistry};
use crate::ui::{self, ConsolePrompt, NoUiThread};

/// Orchestrator wired to the real registry, network, elevation and console
pub fn system_orchestrator(
    config: &Config,
    hub: Arc<SensorHub>,
    executor: Arc<dyn UiExecutor>,
) -> Result<ProvisioningOrchestrator<HttpTransport, SystemElevatedLauncher>> {
    let presence = PresenceChecker::new(
        Box::new(SystemRegistry),
        config.driver.registry_key.clone(),
    );
    let transport = HttpTransport::new(&config.driver.user_agent)
        .context("Failed to build HTTP client")?;
    let notifier = Arc::new(NotificationPresenter::new(
        executor,
        Arc::new(ConsolePrompt),
        Arc::new(DefaultBrowser),
        config.driver.manual_download_url.clone(),
    ));

    Ok(ProvisioningOrchestrator::new(
        config,
        presence,
        transport,
        SystemElevatedLauncher,
        hub,
        notifier,
    ))
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("status", _)) => status(),
        Some(("install", _)) => install(),
        _ => status(),
    }
}

fn open_hub() -> Result<Arc<SensorHub>> {
    let hub = SensorHub::open(Box::new(SysinfoProvider::new()))
        .context("Failed to open hardware sensors")?;
    Ok(Arc::new(hub))
}

fn yes_no(value: bool) -> colored::ColoredString {
    if value {
        "yes".green().bold()
    } else {
        "no".red().bold()
    }
}

fn status() -> Result<()> {
    let config = Config::load()?;
    let hub = open_hub()?;
    let orchestrator = system_orchestrator(&config, hub, Arc::new(NoUiThread))?;
    let state = orchestrator.provisioning_state();

    println!();
    println!("{}", "Sensor driver status".bold().cyan());
    println!("{}", "─".repeat(40).dimmed());
    println!("  {:<22} {}", "Driver required:", yes_no(config.driver.required));
    println!("  {:<22} {}", "Driver installed:", yes_no(state.driver_installed));
    println!("  {:<22} {}", "CPU sensors visible:", yes_no(state.cpu_sensors_valid));
    println!(
        "  {:<22} {}",
        "CPU metrics enabled:",
        yes_no(config.is_any_enabled("CPU"))
    );
    println!("  {:<22} {}", "Running elevated:", yes_no(is_elevated()));
    println!();

    Ok(())
}

fn install() -> Result<()> {
    let config = Config::load()?;
    let hub = open_hub()?;
    let orchestrator = system_orchestrator(&config, hub, Arc::new(NoUiThread))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    ui::info("Checking sensor driver...");
    let outcome = runtime.block_on(orchestrator.smart_check_driver());
    print_outcome(&outcome);

    Ok(())
}

pub fn print_outcome(outcome: &ProvisioningOutcome) {
    match outcome {
        ProvisioningOutcome::Skipped(SkipReason::NotRequired) => {
            ui::dimmed("No sensor driver is needed on this platform.");
        }
        ProvisioningOutcome::Skipped(SkipReason::CpuMetricsDisabled) => {
            ui::dimmed("CPU metrics are disabled; driver check skipped.");
        }
        ProvisioningOutcome::Skipped(SkipReason::Cancelled) => {
            ui::dimmed("Driver check did not finish before exit.");
        }
        ProvisioningOutcome::AlreadyInstalled(state) => {
            ui::success("✓ Sensor driver already installed");
            if !state.cpu_sensors_valid {
                ui::warn("no CPU sensors are visible yet. Try restarting LiteMon.");
            }
        }
        ProvisioningOutcome::DownloadFailed(exhausted) => {
            ui::error("✗ Driver download failed");
            for attempt in &exhausted.attempts {
                println!("  {} {:?}", attempt.url.dimmed(), attempt.outcome);
            }
        }
        ProvisioningOutcome::InstallFailed(result) => {
            if result.cancelled {
                ui::error("✗ Driver installation was cancelled");
            } else {
                ui::error(&format!(
                    "✗ Driver installer failed with exit code {:?}",
                    result.exit_code
                ));
            }
        }
        ProvisioningOutcome::Installed(reload) => {
            ui::success("✓ Sensor driver installed");
            ui::dimmed(&format!("  {}", reload.describe()));
        }
    }
}
