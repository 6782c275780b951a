//! Atlas - Language-model context for nested diagrams.
//!
//! Atlas works in both directions between a diagramming application and a
//! language model:
//!
//! - **Summarization**: a forest of nested, cross-referencing diagrams is
//!   flattened into a bounded, deterministic text summary.
//! - **Ingestion**: a generated graph description is validated, defaulted,
//!   given unique ids and arranged with a layered layout, ready to be merged
//!   back into the document.

pub mod config;
pub mod ingest;
pub mod layout;
pub mod normalize;
pub mod summary;

mod error;

pub use atlas_core::{color, diagram, geometry, identifier, style, template};

pub use error::AtlasError;

use log::{debug, info};

use atlas_core::{diagram::Forest, template::Template};

use config::AppConfig;
use ingest::{Ingested, IngestionPipeline};
use normalize::Normalizer;

/// Entry point for summarizing forests and ingesting generated graphs.
///
/// # Examples
///
/// ```rust
/// use atlas::{Atlas, config::AppConfig, diagram::Forest};
///
/// let atlas = Atlas::new(AppConfig::default()).expect("Invalid config");
///
/// let raw = atlas
///     .parse(r#"{"nodes": [{"id": "a"}, {"id": "b"}], "edges": [{"source": "a", "target": "b"}]}"#)
///     .expect("Failed to parse");
/// let ingested = atlas.ingest(raw, &[]).expect("Failed to ingest");
/// assert_eq!(ingested.nodes.len(), 2);
///
/// let forest = Forest::new();
/// assert_eq!(atlas.summarize(&forest, None), "no context");
/// ```
pub struct Atlas {
    config: AppConfig,
    pipeline: IngestionPipeline,
}

impl Atlas {
    /// Create a new instance with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Config`] if a configured color is invalid.
    pub fn new(config: AppConfig) -> Result<Self, AtlasError> {
        let defaults = config.style().defaults().map_err(AtlasError::Config)?;

        let mut normalizer = Normalizer::new(defaults);
        if !config.ingest().auto_layout() {
            normalizer = normalizer.without_layout();
        }

        Ok(Self {
            config,
            pipeline: IngestionPipeline::new(normalizer),
        })
    }

    /// Create an instance around a custom normalizer, such as one with an
    /// injected id generator or layout engine.
    pub fn with_normalizer(config: AppConfig, normalizer: Normalizer) -> Self {
        Self {
            config,
            pipeline: IngestionPipeline::new(normalizer),
        }
    }

    /// Summarize `forest`, starting with `root_id` when given.
    pub fn summarize(&self, forest: &Forest, root_id: Option<&str>) -> String {
        info!(diagrams = forest.len(), root_id:?; "Summarizing forest");
        let summary = summary::summarize(forest, root_id);
        debug!(chars = summary.chars().count(); "Summary built");
        summary
    }

    /// Decode a generated graph description.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Json`] if `text` is not a valid graph description.
    pub fn parse(&self, text: &str) -> Result<normalize::RawGraph, AtlasError> {
        ingest::parse_raw_graph(text)
    }

    /// Ingest a generated graph, marking new ids as drafts when configured.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::TemplateNotFound`] if a node references a
    /// template missing from `templates`.
    pub fn ingest(
        &self,
        raw: normalize::RawGraph,
        templates: &[Template],
    ) -> Result<Ingested, AtlasError> {
        self.ingest_with_draft(raw, templates, self.config.ingest().draft())
    }

    /// Ingest a generated graph with an explicit draft flag.
    ///
    /// # Errors
    ///
    /// See [`Atlas::ingest`].
    pub fn ingest_with_draft(
        &self,
        raw: normalize::RawGraph,
        templates: &[Template],
        is_draft: bool,
    ) -> Result<Ingested, AtlasError> {
        self.pipeline.ingest(raw, templates, is_draft)
    }
}

impl Default for Atlas {
    fn default() -> Self {
        Self::with_normalizer(AppConfig::default(), Normalizer::default())
    }
}
