//! Ingestion of generated graphs.
//!
//! [`parse_raw_graph`] decodes a language model's response into a
//! [`RawGraph`]; [`IngestionPipeline::ingest`] normalizes and arranges it into
//! an [`Ingested`] batch ready to be merged into the document store.

use log::{debug, info, trace};
use serde::Serialize;

use atlas_core::{
    diagram::{Edge, Node},
    template::Template,
};

use crate::{
    error::AtlasError,
    layout::Arrangement,
    normalize::{Normalizer, RawGraph},
};

const CODE_FENCE: &str = "```";

/// Arranged entities together with the place they belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingested {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagram_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_node_id: Option<String>,

    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Runs generated graphs through normalization and layout.
#[derive(Default)]
pub struct IngestionPipeline {
    normalizer: Normalizer,
}

impl IngestionPipeline {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// Normalizes and arranges `raw`.
    ///
    /// # Errors
    ///
    /// Fails only when normalization fails; see [`Normalizer::normalize`].
    pub fn ingest(
        &self,
        raw: RawGraph,
        templates: &[Template],
        is_draft: bool,
    ) -> Result<Ingested, AtlasError> {
        info!(
            diagram_id:? = raw.diagram_id,
            nodes = raw.nodes.len(),
            edges = raw.edges.len(),
            is_draft;
            "Ingesting generated graph"
        );

        let Arrangement { nodes, edges } = self.normalizer.normalize(&raw, templates, is_draft)?;

        info!(nodes = nodes.len(), edges = edges.len(); "Generated graph ingested");

        Ok(Ingested {
            diagram_id: raw.diagram_id,
            anchor_node_id: raw.anchor_node_id,
            nodes,
            edges,
        })
    }
}

/// Decodes a generated graph description.
///
/// The JSON may be wrapped in a Markdown code fence, with or without a
/// language tag.
///
/// # Errors
///
/// Returns [`AtlasError::Json`] carrying the decoded text when it is not a
/// valid graph description.
pub fn parse_raw_graph(text: &str) -> Result<RawGraph, AtlasError> {
    let body = strip_code_fence(text);
    trace!(body; "Decoding generated graph");

    let graph: RawGraph =
        serde_json::from_str(body).map_err(|err| AtlasError::new_json_error(err, body))?;

    debug!(nodes = graph.nodes.len(), edges = graph.edges.len(); "Generated graph decoded");
    Ok(graph)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(fenced) = trimmed.strip_prefix(CODE_FENCE) else {
        return trimmed;
    };

    // Skip the language tag on the opening line
    let body = fenced.split_once('\n').map_or("", |(_, rest)| rest);
    body.strip_suffix(CODE_FENCE).unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::RawNode;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  {}  "), "{}");
        assert_eq!(strip_code_fence("```json\n{\"nodes\": []}\n```"), "{\"nodes\": []}");
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fence("```json\n{}"), "{}");
        assert_eq!(strip_code_fence("```"), "");
    }

    #[test]
    fn test_parse_fenced_graph() {
        let text = "```json\n{\"diagramId\": \"d1\", \"nodes\": [{\"id\": \"a\"}]}\n```";
        let graph = parse_raw_graph(text).unwrap();

        assert_eq!(graph.diagram_id.as_deref(), Some("d1"));
        assert_eq!(graph.nodes[0].id.as_deref(), Some("a"));
    }

    #[test]
    fn test_parse_error_keeps_source() {
        let err = parse_raw_graph("{\"nodes\": [}").unwrap_err();

        match err {
            AtlasError::Json { err, src } => {
                assert_eq!(src, "{\"nodes\": [}");
                assert_eq!(err.line(), 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ingest_keeps_anchor() {
        let raw = RawGraph {
            diagram_id: Some("d1".to_string()),
            anchor_node_id: Some("parent".to_string()),
            nodes: vec![RawNode::labelled("a", "A")],
            edges: Vec::new(),
        };
        let pipeline = IngestionPipeline::new(Normalizer::default().without_layout());

        let ingested = pipeline.ingest(raw, &[], false).unwrap();

        assert_eq!(ingested.diagram_id.as_deref(), Some("d1"));
        assert_eq!(ingested.anchor_node_id.as_deref(), Some("parent"));
        assert_eq!(ingested.nodes.len(), 1);
        assert!(ingested.edges.is_empty());
    }

    #[test]
    fn test_ingested_serialization() {
        let ingested = Ingested {
            diagram_id: Some("d1".to_string()),
            ..Ingested::default()
        };
        let value = serde_json::to_value(&ingested).unwrap();

        assert_eq!(value["diagramId"], "d1");
        assert!(value.get("anchorNodeId").is_none());
        assert_eq!(value["nodes"], serde_json::json!([]));
    }
}
