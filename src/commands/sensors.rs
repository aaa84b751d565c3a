//! Lists the metric keys the current provider exposes.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::sensors::{SensorHub, SysinfoProvider};
use crate::ui::format_reading;

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let json_output = matches.get_flag("json");

    let hub = SensorHub::open(Box::new(SysinfoProvider::new()))
        .context("Failed to open hardware sensors")?;

    // CPU usage needs two samples
    hub.sample();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    let readings = hub.sample();
    let map = hub.sensor_map();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&*map)?);
        return Ok(());
    }

    println!();
    println!("{}", "Available metric keys".bold().cyan());
    println!("{}", "─".repeat(50).dimmed());
    for (key, sensor) in map.iter() {
        let value = readings
            .values
            .get(key)
            .map(|v| format_reading(key, *v))
            .unwrap_or_else(|| format!("{} --", key));
        println!("  {:<36} {}", value, sensor.name.dimmed());
    }
    println!();

    Ok(())
}
