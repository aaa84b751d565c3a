use anyhow::Result;
use clap::{Arg, Command};

use litemon::commands;

fn main() -> Result<()> {
    litemon::init_logging();

    let matches = Command::new("litemon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lightweight hardware metrics monitor")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(clap::ArgAction::SetTrue)
        )
        .subcommand(
            Command::new("version")
                .about("Shows version information")
        )
        .subcommand(
            Command::new("monitor")
                .about("Show live hardware readings")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("MS")
                        .help("Refresh interval in milliseconds (overrides config)")
                        .value_parser(clap::value_parser!(u64))
                )
                .arg(
                    Arg::new("no-driver-check")
                        .long("no-driver-check")
                        .help("Skip the sensor driver check for this session")
                        .action(clap::ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print one JSON object per refresh")
                        .action(clap::ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("driver")
                .about("Sensor driver management (use 'litemon driver --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("status")
                        .about("Show whether the sensor driver is installed")
                )
                .subcommand(
                    Command::new("install")
                        .about("Download and install the sensor driver if it is missing")
                )
        )
        .subcommand(
            Command::new("sensors")
                .about("List the metric keys available on this machine")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the sensor map as JSON")
                        .action(clap::ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("config")
                .about("Inspect or change configuration (use 'litemon config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("show")
                        .about("Print the effective configuration")
                )
                .subcommand(
                    Command::new("path")
                        .about("Print the configuration file location")
                )
                .subcommand(
                    Command::new("refresh")
                        .about("Set the refresh interval")
                        .arg(
                            Arg::new("ms")
                                .help("Interval in milliseconds")
                                .required(true)
                                .index(1)
                                .value_parser(clap::value_parser!(u64))
                        )
                )
        )
        .get_matches();

    if matches.get_flag("version") {
        return commands::version::execute();
    }

    match matches.subcommand() {
        Some(("version", _)) => {
            commands::version::execute()?;
        }
        Some(("monitor", sub_matches)) => {
            commands::monitor::execute(sub_matches)?;
        }
        Some(("driver", sub_matches)) => {
            commands::driver::execute(sub_matches)?;
        }
        Some(("sensors", sub_matches)) => {
            commands::sensors::execute(sub_matches)?;
        }
        Some(("config", sub_matches)) => {
            commands::config::execute(sub_matches)?;
        }
        _ => {
            println!("Welcome to LiteMon!");
            println!("Use 'litemon --help' for more information.");
        }
    }

    Ok(())
}
