//! # Config Subcommand
//!
//! Loads the registry configuration the way `hue serve` would and prints
//! it back as YAML with every default filled in.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use hue_issuance::IssuanceConfig;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "HUE_CONFIG";

/// Arguments for the `hue config` subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file. Falls back to `HUE_CONFIG`, then to defaults.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Load the file at `path`, or the defaults when there is none.
pub fn load_config(path: Option<&Path>) -> Result<IssuanceConfig> {
    match path {
        Some(path) => IssuanceConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => {
            tracing::info!("no configuration file given; using defaults");
            Ok(IssuanceConfig::default())
        }
    }
}

/// `--config` if given, else `HUE_CONFIG`.
pub fn resolve_config_path(flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
}

/// Render the resolved configuration as YAML.
pub fn render_config(path: Option<&Path>) -> Result<String> {
    let config = load_config(path)?;
    config
        .to_yaml()
        .context("failed to serialize configuration")
}

/// Execute the config subcommand.
pub fn run_config(args: &ConfigArgs) -> Result<u8> {
    let path = resolve_config_path(args.config.as_deref());
    print!("{}", render_config(path.as_deref())?);
    Ok(0)
}
