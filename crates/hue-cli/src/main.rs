//! # hue CLI entry point
//!
//! Parses command-line arguments, initialises tracing, and dispatches to
//! the subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hue_cli::check::{run_check, CheckArgs};
use hue_cli::config::{run_config, ConfigArgs};
use hue_cli::serve::{run_serve, ServeArgs};

/// hue registry toolkit
///
/// Serves the colour and word registries over HTTP and checks candidate
/// keys, names, and words offline.
#[derive(Parser, Debug)]
#[command(name = "hue", version, about, long_about = None)]
struct Cli {
    /// More log output. Repeat for more (-v, -vv). `RUST_LOG` wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the registry HTTP API.
    Serve(ServeArgs),

    /// Normalize and validate a key, display name, or word.
    Check(CheckArgs),

    /// Print the resolved configuration as YAML.
    Config(ConfigArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        })
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Serve(args) => run_serve(&args),
        Commands::Check(args) => run_check(&args),
        Commands::Config(args) => run_config(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
