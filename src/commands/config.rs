use crate::core::Config;
use anyhow::{Context, Result};
use colored::Colorize;

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(),
        Some(("path", _)) => path(),
        Some(("refresh", sub_matches)) => set_refresh(sub_matches),
        _ => {
            println!("Use 'litemon config --help' for more information.");
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let config = Config::load()?;
    let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{}", json);
    Ok(())
}

fn path() -> Result<()> {
    let path = Config::get_config_path()?;
    println!("{}", path.display());
    Ok(())
}

fn set_refresh(matches: &clap::ArgMatches) -> Result<()> {
    let ms = *matches
        .get_one::<u64>("ms")
        .context("Refresh interval is required")?;

    let mut config = Config::load()?;
    config.refresh_ms = ms;
    config.save()?;

    let effective = config.refresh_interval().as_millis();
    if effective as u64 != ms {
        println!(
            "{} {} ms is too fast, {} ms will be used",
            "⚠".yellow(),
            ms,
            effective
        );
    } else {
        println!("{} {} ms", "✓ Refresh interval set to".green(), ms);
    }

    Ok(())
}
