//! Schema of generated graph descriptions.
//!
//! Every field is optional: generated output is untrusted and routinely
//! omits, nulls or misspells fields. Field names follow the canonical wire
//! format, so an already canonical node or edge also decodes as a raw one.

use serde::{Deserialize, Serialize};

use atlas_core::{de::null_as_default, diagram::Marker, geometry::Point};

/// A generated graph, anchored to the diagram (and optionally the node) it
/// should be merged into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawGraph {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagram_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_node_id: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub nodes: Vec<RawNode>,

    #[serde(deserialize_with = "null_as_default")]
    pub edges: Vec<RawEdge>,
}

impl RawGraph {
    pub fn new(nodes: Vec<RawNode>, edges: Vec<RawEdge>) -> Self {
        Self {
            nodes,
            edges,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawNode {
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub node_type: Option<String>,

    pub virtual_of: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub data: RawNodeData,

    pub position: Option<Point>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl RawNode {
    /// A raw node with only an id and a label.
    pub fn labelled(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            data: RawNodeData {
                label: Some(label.into()),
                ..RawNodeData::default()
            },
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawNodeData {
    pub label: Option<String>,
    pub description: Option<String>,
    pub template_id: Option<String>,
    pub rotation: Option<f32>,
    pub stroke_width: Option<f32>,
    pub font_size: Option<f32>,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
    pub font_color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEdge {
    pub id: Option<String>,

    /// Id or label of the source node.
    pub source: Option<String>,

    /// Id or label of the target node.
    pub target: Option<String>,

    pub marker_start: Option<Marker>,
    pub marker_end: Option<Marker>,

    #[serde(deserialize_with = "null_as_default")]
    pub data: RawEdgeData,
}

impl RawEdge {
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEdgeData {
    pub label: Option<String>,

    /// Direction name, kept as text so unknown names do not fail decoding.
    pub direction: Option<String>,

    pub color: Option<String>,
    pub stroke_width: Option<f32>,
    pub font_size: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_decodes() {
        let graph: RawGraph = serde_json::from_str("{}").unwrap();
        assert_eq!(graph, RawGraph::default());

        let node: RawNode = serde_json::from_str("{}").unwrap();
        assert_eq!(node, RawNode::default());
    }

    #[test]
    fn test_nulls_decode_as_absent() {
        let graph: RawGraph = serde_json::from_str(
            r#"{"nodes": null, "edges": [{"source": "a", "target": null, "data": null}]}"#,
        )
        .unwrap();

        assert!(graph.nodes.is_empty());
        assert_eq!(graph.edges[0].source.as_deref(), Some("a"));
        assert_eq!(graph.edges[0].target, None);
        assert_eq!(graph.edges[0].data, RawEdgeData::default());
    }

    #[test]
    fn test_camel_case_fields() {
        let graph: RawGraph = serde_json::from_str(
            r#"{
                "diagramId": "d1",
                "anchorNodeId": "n0",
                "nodes": [{
                    "id": "n1",
                    "type": "virtual",
                    "virtualOf": "n0",
                    "data": {"label": "Billing", "templateId": "svc", "fillColor": "red"}
                }],
                "edges": [{"source": "n1", "target": "n0", "markerEnd": "arrow"}]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.diagram_id.as_deref(), Some("d1"));
        assert_eq!(graph.anchor_node_id.as_deref(), Some("n0"));
        let node = &graph.nodes[0];
        assert_eq!(node.node_type.as_deref(), Some("virtual"));
        assert_eq!(node.virtual_of.as_deref(), Some("n0"));
        assert_eq!(node.data.template_id.as_deref(), Some("svc"));
        assert_eq!(node.data.fill_color.as_deref(), Some("red"));
        assert_eq!(graph.edges[0].marker_end, Some(Marker::new("arrow")));
    }
}
