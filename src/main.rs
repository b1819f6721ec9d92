//! `siteops` binary entry point.
use std::io::Write as _;

use anyhow::Result;
use clap::Parser;

use siteops_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let command_name = match &args.command {
        cli::Command::Migrate(_) => "migrate",
        cli::Command::Sync(_) => "sync",
        cli::Command::Version => {
            let version = option_env!("SITEOPS_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            writeln!(std::io::stdout(), "siteops {version}")?;
            return Ok(());
        }
    };

    logging::init_subscriber(args.verbose, command_name);
    let log = logging::Logger::new(command_name);

    match args.command {
        cli::Command::Migrate(opts) => commands::migrate::run(&opts, &log),
        cli::Command::Sync(opts) => commands::sync::run(&opts, &log),
        cli::Command::Version => Ok(()),
    }
}
