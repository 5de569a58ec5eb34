// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "tunnel-flyer")]
#[command(about = "Scroll-driven tunnel flythrough", long_about = None)]
pub struct Cli {
    /// Path to a JSON config file overriding the built-in defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for the box scatter, overrides the config value
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hide the flight info window (labels stay visible)
    #[arg(long = "no-hud", default_value = "false")]
    pub no_hud: bool,

    /// Print the effective config as JSON and exit
    #[arg(long = "dump-config", default_value = "false")]
    pub dump_config: bool,
}
