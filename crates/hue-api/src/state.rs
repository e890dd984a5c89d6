//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Each registry service serialises its own
//! operations, so handlers never lock anything themselves.

use std::path::PathBuf;

use hue_core::RegistryError;
use hue_issuance::{IssuanceConfig, Registries};

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Registry configuration file. Defaults apply when `None`.
    pub config_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            config_path: None,
        }
    }
}

impl AppConfig {
    /// Read `PORT` and `HUE_CONFIG`. An unparsable port falls back to 8080.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let config_path = std::env::var_os("HUE_CONFIG").map(PathBuf::from);
        Self { port, config_path }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registries: Registries,
    pub config: AppConfig,
}

impl AppState {
    /// State around already-built registries.
    pub fn new(registries: Registries, config: AppConfig) -> Self {
        Self { registries, config }
    }

    /// Build both registries from an issuance config.
    pub fn from_config(
        issuance: &IssuanceConfig,
        config: AppConfig,
    ) -> Result<Self, RegistryError> {
        Ok(Self::new(Registries::from_config(issuance)?, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port() {
        assert_eq!(AppConfig::default().port, 8080);
        assert!(AppConfig::default().config_path.is_none());
    }

    #[test]
    fn state_from_default_config() {
        let state =
            AppState::from_config(&IssuanceConfig::default(), AppConfig::default()).unwrap();
        assert_eq!(state.registries.colors.issued_count(), 0);
        assert_eq!(state.registries.words.label(), "words");
    }
}
