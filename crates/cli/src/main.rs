use std::path::PathBuf;

use commands::{Command, Commands, Context};
use config::{Config, OutputFormat};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod scenario;

/// Offline tools for leaderboard payouts.
#[derive(Debug, clap::Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the config file.
    #[arg(long, short, env = "LEADERBOARD_CONFIG")]
    config: Option<PathBuf>,
    /// Output format, overriding the config file.
    #[arg(long, short, value_enum)]
    output: Option<OutputFormat>,
    /// Log at debug level when `RUST_LOG` is not set.
    #[arg(long, short)]
    verbose: bool,
    /// Commands.
    #[command(subcommand)]
    command: Commands,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = <Cli as clap::Parser>::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(output) = cli.output {
        config.set_output(output);
    }

    let default_filter = if cli.verbose {
        "debug"
    } else {
        config.log().unwrap_or("info")
    };
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli.command.execute(Context::new(&config))
}
