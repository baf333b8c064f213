//! `brewops` command-line front end.
//!
//! Loads a JSON snapshot of the brewery state, runs one command against the
//! domain crates and writes the snapshot back when the command changed it.

use std::io::Write;

use anyhow::Result;

pub mod cli;
pub mod commands;
pub mod config;
pub mod state;

pub use cli::Cli;
pub use commands::{Outcome, dispatch};
pub use config::CliConfig;
pub use state::AppState;

/// Run one parsed command against the configured snapshot.
pub fn run(cli: &Cli, config: &CliConfig, out: &mut dyn Write) -> Result<()> {
    let mut state = AppState::load(&config.state_path)?;
    let outcome = dispatch(&mut state, &cli.command, cli.json, out)?;
    if outcome == Outcome::Changed {
        state.save(&config.state_path)?;
        tracing::debug!(path = %config.state_path.display(), "state saved");
    }
    Ok(())
}
