mod backend;
mod cli_messages;
mod commands;
mod config;
mod consts;
mod controller;
mod device;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod session;
mod ui;

use crate::config::{Config, Overrides, get_config_path};
use crate::environment::Environment;
use crate::session::{run_headless_mode, run_tui_mode, setup_session};
use clap::{ArgAction, Parser, Subcommand};
use std::error::Error;

fn parse_environment(value: &str) -> Result<Environment, String> {
    value
        .parse::<Environment>()
        .map_err(|_| format!("unknown environment '{}' (expected production or local)", value))
}

#[derive(Parser)]
#[command(author, version, about = "SecureWipe operator console", long_about = None)]
/// Command-line arguments
struct Args {
    /// Backend environment: production or local
    #[arg(long = "env", global = true, value_name = "ENV", value_parser = parse_environment)]
    environment: Option<Environment>,

    /// Backend base URL. Overrides --env and the saved server URL.
    #[arg(long, global = true, value_name = "URL")]
    server_url: Option<String>,

    /// Interval between device list fetches, in milliseconds
    #[arg(long, global = true, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval_ms: Option<u64>,

    /// Consecutive fetch failures that end a session (1 = first failure)
    #[arg(long, global = true, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    failure_tolerance: Option<u32>,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive dashboard
    Dashboard {
        /// Enable background colors
        #[arg(long = "with-background", action = ArgAction::SetTrue)]
        with_background: bool,
    },
    /// Poll the backend and print device updates until Ctrl+C
    Watch,
    /// Fetch the device list once and print it
    Devices,
    /// Issue a wipe command to one machine
    Wipe {
        /// Machine ID of the target device
        #[arg(value_name = "MACHINE_ID")]
        machine_id: String,

        /// Skip the confirmation prompt
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Save a backend URL to the config file
    SetServer {
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Delete the config file and return to defaults
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    log::set_max_level(logging::get_rust_log_level().into());

    let args = Args::parse();
    let config_path = get_config_path()?;
    let overrides = Overrides {
        environment: args.environment,
        server_url: args.server_url,
        poll_interval_ms: args.poll_interval_ms,
        failure_tolerance: args.failure_tolerance,
    };

    match args.command {
        Command::Dashboard { with_background } => {
            let config = Config::load_or_default(&config_path)?;
            let session = setup_session(&config, &overrides)?;
            run_tui_mode(session, with_background).await
        }
        Command::Watch => {
            let config = Config::load_or_default(&config_path)?;
            let session = setup_session(&config, &overrides)?;
            run_headless_mode(session).await
        }
        Command::Devices => {
            let config = Config::load_or_default(&config_path)?;
            let backend = session::setup::build_backend(config.resolve_environment(&overrides))?;
            commands::run_devices(backend).await
        }
        Command::Wipe { machine_id, yes } => {
            let config = Config::load_or_default(&config_path)?;
            let backend = session::setup::build_backend(config.resolve_environment(&overrides))?;
            let settings = config.resolve_poll_settings(&overrides);
            commands::run_wipe(backend, settings, &machine_id, yes).await
        }
        Command::SetServer { url } => {
            let mut config = Config::load_or_default(&config_path)?;
            config.server_url = Some(url.trim_end_matches('/').to_string());
            config
                .save(&config_path)
                .map_err(|e| format!("Failed to save config: {}", e))?;
            crate::print_cmd_success!("Server saved", "{}", config_path.display());
            Ok(())
        }
        Command::Reset => {
            crate::print_cmd_info!("Resetting", "Clearing {}", config_path.display());
            Config::clear(&config_path).map_err(Into::into)
        }
    }
}
