//! tempus library root.
//! Exposes the legacy store conversion, the summary fold, the SQLite entry
//! store and the CLI dispatcher built on top of them.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod legacy;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::migration::MigrationState;
use crate::errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, state: &MigrationState) -> AppResult<()> {
    match &cli.command {
        Commands::Migrate => cli::commands::migrate::handle(&cli.command, cfg, state),
        Commands::Summary { .. } => cli::commands::summary::handle(&cli.command, cfg),
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg),
        Commands::Add { .. } => cli::commands::add::handle(&cli.command, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    utils::logging::enable_logging(cli.verbose);

    let mut cfg = Config::load()?;
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = dir.clone();
    }

    // the store must be converted before anything reads or writes it;
    // a failed conversion aborts startup
    let state = if matches!(cli.command, Commands::Config { .. }) {
        MigrationState::default()
    } else {
        cli::commands::migrate::startup(&cfg)?
    };

    dispatch(&cli, &cfg, &state)
}
