use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Debug, Subcommand, PartialEq)]
pub(crate) enum Command {
    /// Run the daemon in the foreground.
    Run {
        /// The profile to run
        #[clap(short, long)]
        profile: Option<PathBuf>,
    },
    /// List connected controllers.
    Devices,
    /// Validate a profile without running.
    Check {
        /// The profile to check
        #[clap(short, long)]
        profile: Option<PathBuf>,
    },
}

/// Prints debounced gamepad events.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Turn debugging information on
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// The command to run
    #[clap(subcommand)]
    pub command: Command,
}
