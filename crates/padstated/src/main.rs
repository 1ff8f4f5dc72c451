mod cli;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use padstate_profile::Profile;
use padstated::{app, logging, print_error, print_info};

use crate::cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::setup(cli.verbose, cli.no_color) {
        eprintln!("failed to set up logger: {e}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Command::Run { profile } => {
            Profile::load(profile.as_deref())
                .map_err(Into::into)
                .and_then(|profile| app::run(&profile))
        }
        Command::Devices => app::list_devices(),
        Command::Check { profile } => Profile::load(profile.as_deref())
            .map(|profile| {
                print_info!(
                    "profile is valid: tick {}ms, {} device override(s), {} event kind(s)",
                    profile.tick.as_millis(),
                    profile.devices.len(),
                    profile.events.len()
                );
            })
            .map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error!("{e}");
            ExitCode::FAILURE
        }
    }
}
