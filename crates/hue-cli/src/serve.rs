//! # Serve Subcommand
//!
//! Builds both registries from the configuration file and serves the HTTP
//! API until the process is stopped.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hue_api::state::{AppConfig, AppState};

use crate::config::load_config;

/// Arguments for the `hue serve` subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Configuration file. Falls back to `HUE_CONFIG`, then to defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Port to bind. Falls back to `PORT`, then 8080.
    #[arg(long)]
    pub port: Option<u16>,
}

/// Environment-derived server config with the flags applied on top.
pub fn app_config(args: &ServeArgs) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(path) = &args.config {
        config.config_path = Some(path.clone());
    }
    config
}

/// Build the application state for `args`.
pub fn build_state(args: &ServeArgs) -> Result<AppState> {
    let app = app_config(args);
    let issuance = load_config(app.config_path.as_deref())?;
    tracing::info!(
        port = app.port,
        config = ?app.config_path,
        "building registries"
    );
    AppState::from_config(&issuance, app).context("failed to build registries")
}

/// Execute the serve subcommand. Blocks until the server stops.
pub fn run_serve(args: &ServeArgs) -> Result<u8> {
    let state = build_state(args)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    runtime
        .block_on(hue_api::serve(state))
        .context("HTTP server failed")?;
    Ok(0)
}
