//! Rendering configuration.

use serde::{Deserialize, Serialize};

/// Fixed inputs to the renderer. Two renderers with equal configs produce
/// equal bytes for equal registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Width and height of the square canvas, in SVG user units.
    pub canvas_size: u32,
    /// CSS font family for text lines.
    pub font_family: String,
    /// Font size for text lines.
    pub font_size: u32,
    /// Background for identifiers without a `Background` trait (words).
    pub default_background: String,
    /// Text colour for identifiers without a `Foreground` trait.
    pub default_foreground: String,
    /// Fill of the placeholder shown for suppressed identifiers.
    pub placeholder_background: String,
    /// `description` field of every document.
    pub description: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_size: 500,
            font_family: "monospace".to_string(),
            font_size: 40,
            default_background: "#FFFFFF".to_string(),
            default_foreground: "#000000".to_string(),
            placeholder_background: "#808080".to_string(),
            description: "A unique identifier in the hue registry.".to_string(),
        }
    }
}
