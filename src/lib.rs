//! exptracker library root.
//! Exposes the CLI parser, the high-level run() function and the session
//! measurement engine.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::{Config, Paths};
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, paths: &Paths, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(paths),
        Commands::Track { .. } => cli::commands::track::handle(&cli.command, paths, cfg),
        Commands::Report { .. } => cli::commands::report::handle(&cli.command, paths, cfg),
        Commands::Status => cli::commands::status::handle(paths, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let paths = Paths::new(utils::path::expand_tilde(&cli.root));
    let cfg = Config::load(&paths)?;
    dispatch(&cli, &paths, &cfg)
}
