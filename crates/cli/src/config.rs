//! Runtime configuration: environment first, command-line flags on top.

use std::path::PathBuf;

use anyhow::{Context, Result};
use brewops_observability::LogFormat;

use crate::cli::Cli;

pub const STATE_ENV: &str = "BREWOPS_STATE";
pub const LOG_FORMAT_ENV: &str = "BREWOPS_LOG_FORMAT";
pub const DEFAULT_STATE_PATH: &str = "brewops.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub state_path: PathBuf,
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Read `BREWOPS_STATE` and `BREWOPS_LOG_FORMAT`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let state_path = std::env::var(STATE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH));
        let log_format = match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) => value
                .parse()
                .with_context(|| format!("invalid {LOG_FORMAT_ENV}"))?,
            Err(_) => LogFormat::default(),
        };
        Ok(Self {
            state_path,
            log_format,
        })
    }

    /// Apply `--state` / `--log-format` when given.
    pub fn with_overrides(mut self, cli: &Cli) -> Result<Self> {
        if let Some(path) = &cli.state {
            self.state_path = path.clone();
        }
        if let Some(format) = &cli.log_format {
            self.log_format = format.parse().context("invalid --log-format")?;
        }
        Ok(self)
    }
}
