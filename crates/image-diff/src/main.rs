mod cli;
mod commands;
mod config;
mod input;
mod output;
mod report;

use clap::Parser;
use config::{CliOverrides, ResolvedRunConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("image_diff=info,image_diff_core=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Init { force } => {
            commands::init(force)?;
        }
        cli::Command::Compare {
            file1,
            file2,
            output,
            config,
            yes,
            json,
            search,
        } => {
            let overrides = CliOverrides {
                config,
                output,
                search,
            };
            let config = ResolvedRunConfig::new(overrides)?;
            let code = commands::compare(config, &file1, &file2, yes, json)?;
            std::process::exit(code);
        }
    }

    Ok(())
}
