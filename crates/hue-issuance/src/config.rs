//! # Issuance Configuration
//!
//! One YAML file configures both registries and the renderer:
//!
//! ```yaml
//! colors:
//!   owner: treasury
//!   unit_price: 100
//!   price_step: 100
//!   issuance_enabled: true
//! words:
//!   owner: treasury
//!   unit_price: 50
//! render:
//!   canvas_size: 500
//! ```
//!
//! Every field has a default, so an empty file is a valid config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hue_core::{AccountId, COLOR_SPACE_SIZE};
use hue_render::RenderConfig;

/// Errors loading or validating a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid YAML for [`IssuanceConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value is out of range or inconsistent with another.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for one registry instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Account allowed to run administrative operations.
    pub owner: String,
    /// Price of one identifier.
    pub unit_price: u64,
    /// Every price must be a multiple of this. Must be positive.
    pub price_step: u64,
    /// Whether minting is open.
    pub issuance_enabled: bool,
    /// Upper bound on identifiers issued. Colours are capped at 2^24
    /// whatever this says.
    pub max_supply: Option<u64>,
    /// Upper bound on identifiers minted to one recipient.
    pub max_per_holder: Option<u32>,
    /// Account whose holdings render as staked.
    pub staked_custody: Option<String>,
    /// Whether the owner may change the price.
    pub price_changes_allowed: bool,
    /// Whether the owner may override display names.
    pub name_overrides_allowed: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            owner: "owner".to_string(),
            unit_price: 0,
            price_step: 1,
            issuance_enabled: false,
            max_supply: None,
            max_per_holder: None,
            staked_custody: None,
            price_changes_allowed: true,
            name_overrides_allowed: false,
        }
    }
}

impl RegistrySettings {
    /// Check values that serde cannot.
    pub fn validate(&self, section: &str) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(format!("{section}: {msg}")));
        if AccountId::new(&self.owner).is_err() {
            return invalid(format!("owner {:?} is not a valid account", self.owner));
        }
        if let Some(custody) = &self.staked_custody {
            if AccountId::new(custody).is_err() {
                return invalid(format!("staked_custody {custody:?} is not a valid account"));
            }
        }
        if self.price_step == 0 {
            return invalid("price_step must be positive".to_string());
        }
        if self.unit_price % self.price_step != 0 {
            return invalid(format!(
                "unit_price {} is not a multiple of price_step {}",
                self.unit_price, self.price_step
            ));
        }
        Ok(())
    }
}

/// Whole-file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuanceConfig {
    /// Colour registry.
    pub colors: RegistrySettings,
    /// Word registry.
    pub words: RegistrySettings,
    /// Renderer inputs shared by both registries.
    pub render: RenderConfig,
}

impl IssuanceConfig {
    /// Parse and validate YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate both registry sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.colors.validate("colors")?;
        if self.colors.max_supply.is_some_and(|m| m > COLOR_SPACE_SIZE) {
            return Err(ConfigError::Invalid(format!(
                "colors: max_supply cannot exceed {COLOR_SPACE_SIZE}"
            )));
        }
        self.words.validate("words")?;
        if self.render.canvas_size == 0 {
            return Err(ConfigError::Invalid(
                "render: canvas_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
