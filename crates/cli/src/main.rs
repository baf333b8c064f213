use anyhow::Result;
use clap::Parser;

use brewops_cli::{Cli, CliConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_env()?.with_overrides(&cli)?;
    brewops_observability::init(config.log_format);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    brewops_cli::run(&cli, &config, &mut out)
}
