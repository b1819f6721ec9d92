//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the site migration engine.
#[derive(Parser, Debug)]
#[command(
    name = "siteops",
    about = "Site migration and asset sync engine",
    version
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply pending migrations to a site
    Migrate(MigrateOpts),
    /// Synchronise binary assets into the site tree
    Sync(SyncOpts),
    /// Print version information
    Version,
}

/// Options for the `migrate` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct MigrateOpts {
    /// Path to the site installation
    pub site_root: PathBuf,
}

/// Options for the `sync` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SyncOpts {
    /// Path to the site installation
    pub site_root: PathBuf,

    /// Preview changes without copying anything
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Copy every asset even if the manifest says it is unchanged
    #[arg(short, long)]
    pub force: bool,
}
