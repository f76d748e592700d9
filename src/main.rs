mod cli;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use config::Config;
use log::debug;

use crate::cli::Command;

/// Mints and tracks asset tags for an IT inventory.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Config file, defaults to $XDG_CONFIG_HOME/assettags/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let config = Config::load_from_file(args.config)?;
    debug!(
        "allowing {} allocation attempts, busy timeout {}ms",
        config.allocation_attempts(),
        config.busy_timeout_ms()
    );

    let rt = tokio::runtime::Builder::new_current_thread().build()?;
    rt.block_on(cli::run(args.command, &config))
}
