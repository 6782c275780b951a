//! Configuration types for the Atlas pipeline.
//!
//! All types implement [`serde::Deserialize`] for loading from external
//! sources such as the CLI's TOML configuration file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining style and ingestion settings.
//! - [`StyleConfig`] - Global colors for generated nodes and edges.
//! - [`IngestConfig`] - Ingestion behavior (draft marking, automatic layout).
//!
//! # Example
//!
//! ```
//! # use atlas::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().defaults().is_ok());
//! assert!(config.ingest().auto_layout());
//! ```

use serde::Deserialize;

use atlas_core::{color::Color, style::StyleDefaults};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Ingestion configuration section.
    #[serde(default)]
    ingest: IngestConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(style: StyleConfig, ingest: IngestConfig) -> Self {
        Self { style, ingest }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the ingestion configuration.
    pub fn ingest(&self) -> &IngestConfig {
        &self.ingest
    }
}

/// Global colors for generated content.
///
/// Fields that are not set fall back to the built-in defaults of
/// [`StyleDefaults`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    node_fill_color: Option<String>,

    #[serde(default)]
    node_stroke_color: Option<String>,

    #[serde(default)]
    node_font_color: Option<String>,

    #[serde(default)]
    edge_color: Option<String>,
}

impl StyleConfig {
    /// Returns the configured [`StyleDefaults`].
    ///
    /// # Errors
    ///
    /// Returns an error naming the first configured color string that cannot
    /// be parsed as a [`Color`].
    pub fn defaults(&self) -> Result<StyleDefaults, String> {
        let mut defaults = StyleDefaults::default();

        if let Some(color) = checked_color("node_fill_color", &self.node_fill_color)? {
            defaults = defaults.with_fill_color(color);
        }
        if let Some(color) = checked_color("node_stroke_color", &self.node_stroke_color)? {
            defaults = defaults.with_stroke_color(color);
        }
        if let Some(color) = checked_color("node_font_color", &self.node_font_color)? {
            defaults = defaults.with_font_color(color);
        }
        if let Some(color) = checked_color("edge_color", &self.edge_color)? {
            defaults = defaults.with_edge_color(color);
        }

        Ok(defaults)
    }
}

fn checked_color<'a>(key: &str, value: &'a Option<String>) -> Result<Option<&'a str>, String> {
    value
        .as_deref()
        .map(|color| {
            Color::new(color)
                .map(|_| color)
                .map_err(|err| format!("Invalid `{key}` in config: {err}"))
        })
        .transpose()
}

/// Ingestion behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Mark generated entities as drafts unless the caller says otherwise.
    #[serde(default)]
    draft: bool,

    /// Arrange generated entities with the layered layout engine.
    #[serde(default = "default_auto_layout")]
    auto_layout: bool,
}

fn default_auto_layout() -> bool {
    true
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            draft: false,
            auto_layout: default_auto_layout(),
        }
    }
}

impl IngestConfig {
    pub fn new(draft: bool, auto_layout: bool) -> Self {
        Self { draft, auto_layout }
    }

    pub fn draft(&self) -> bool {
        self.draft
    }

    pub fn auto_layout(&self) -> bool {
        self.auto_layout
    }
}

#[cfg(test)]
mod tests {
    use atlas_core::style::DEFAULT_FILL_COLOR;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        let defaults = config.style().defaults().unwrap();

        assert_eq!(defaults, StyleDefaults::default());
        assert_eq!(defaults.fill_color(), DEFAULT_FILL_COLOR);
        assert!(!config.ingest().draft());
        assert!(config.ingest().auto_layout());
    }

    #[test]
    fn test_style_overrides() {
        let style = StyleConfig {
            node_fill_color: Some("#fafafa".to_string()),
            edge_color: Some("teal".to_string()),
            ..StyleConfig::default()
        };
        let defaults = style.defaults().unwrap();

        assert_eq!(defaults.fill_color(), "#fafafa");
        assert_eq!(defaults.edge_color(), "teal");
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let style = StyleConfig {
            node_stroke_color: Some("definitely-not-a-color".to_string()),
            ..StyleConfig::default()
        };
        let err = style.defaults().unwrap_err();

        assert!(err.contains("node_stroke_color"));
    }

    #[test]
    fn test_ingest_config_new() {
        let ingest = IngestConfig::new(true, false);
        assert!(ingest.draft());
        assert!(!ingest.auto_layout());
    }
}
