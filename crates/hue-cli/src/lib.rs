//! # hue-cli — The `hue` Command
//!
//! ## Subcommands
//!
//! - `hue serve` — build both registries and serve the HTTP API.
//! - `hue check` — normalize and validate a key, display name, or word.
//! - `hue config` — print the resolved configuration as YAML.
//!
//! ```bash
//! hue serve --config hue.yaml --port 8080 --json-logs
//! hue check key '#ff00aa'
//! hue config --config hue.yaml
//! ```
//!
//! Every subcommand returns its exit code; `main` only parses arguments,
//! sets up logging, and dispatches.

pub mod check;
pub mod config;
pub mod serve;
