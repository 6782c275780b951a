//! Validation and defaulting of generated graphs.
//!
//! The [`Normalizer`] turns a [`RawGraph`] into canonical nodes and edges in
//! two passes:
//!
//! 1. **Nodes**: every node gets a unique id (supplied, or freshly minted),
//!    its template is looked up, and every missing field is filled from the
//!    raw value, the template, or the global default, in that order.
//! 2. **Edges**: endpoints are resolved against the new nodes by id, then by
//!    label. Edges with an unresolved endpoint are dropped.
//!
//! The result is then handed to the [`LayoutAdapter`].
//!
//! An unknown template reference is the only fatal problem: it means the
//! generated response is malformed, so no partial output is produced.

mod raw;

pub use raw::{RawEdge, RawEdgeData, RawGraph, RawNode, RawNodeData};

use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use atlas_core::{
    color::Color,
    diagram::{Direction, Edge, EdgeData, Marker, Node, NodeData, NodeKind, VIRTUAL_NODE_TYPE},
    geometry::Point,
    identifier::{IdGenerator, UuidGenerator},
    style::{self, StyleDefaults},
    template::{self, Template},
};

use crate::{
    error::AtlasError,
    layout::{Arrangement, LayoutAdapter},
};

/// Picks the raw value, else the template value, else the default.
pub fn resolve<T>(raw: Option<T>, template: Option<T>, default: T) -> T {
    raw.or(template).unwrap_or(default)
}

/// [`resolve`] for colors: values that are not valid CSS colors count as
/// absent.
pub fn resolve_color(raw: Option<&str>, template: Option<&str>, default: &str) -> String {
    fn valid(color: Option<&str>) -> Option<&str> {
        color.filter(|color| {
            let valid = Color::is_valid(color);
            if !valid {
                warn!(color; "Ignoring invalid color");
            }
            valid
        })
    }

    resolve(valid(raw), valid(template), default).to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

fn finite(value: Option<f32>) -> Option<f32> {
    value.filter(|value| value.is_finite())
}

fn positive(value: Option<f32>) -> Option<f32> {
    value.filter(|value| value.is_finite() && *value > 0.0)
}

/// Turns generated graphs into canonical, arranged entities.
pub struct Normalizer {
    ids: Box<dyn IdGenerator>,
    defaults: StyleDefaults,
    layout: Option<LayoutAdapter>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(StyleDefaults::default())
    }
}

impl Normalizer {
    /// Creates a normalizer minting UUIDs and arranging results with the
    /// default layout engine.
    pub fn new(defaults: StyleDefaults) -> Self {
        Self {
            ids: Box::new(UuidGenerator),
            defaults,
            layout: Some(LayoutAdapter::default()),
        }
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_layout(mut self, layout: LayoutAdapter) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Disables automatic layout; entities keep their normalized positions.
    pub fn without_layout(mut self) -> Self {
        self.layout = None;
        self
    }

    /// Normalizes `raw` and arranges the result.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::TemplateNotFound`] if a node references a
    /// template that is not in `templates`.
    pub fn normalize(
        &self,
        raw: &RawGraph,
        templates: &[Template],
        is_draft: bool,
    ) -> Result<Arrangement, AtlasError> {
        let nodes = self.nodes(&raw.nodes, templates, is_draft)?;
        let edges = self.edges(&raw.edges, &nodes, is_draft);

        info!(
            nodes = nodes.len(),
            edges = edges.len(),
            dropped_edges = raw.edges.len() - edges.len();
            "Normalized generated graph"
        );

        Ok(match &self.layout {
            Some(layout) => layout.arrange(nodes, edges),
            None => Arrangement { nodes, edges },
        })
    }

    fn nodes(
        &self,
        raw_nodes: &[RawNode],
        templates: &[Template],
        is_draft: bool,
    ) -> Result<Vec<Node>, AtlasError> {
        let mut taken: HashSet<String> = HashSet::new();
        let mut nodes = Vec::with_capacity(raw_nodes.len());

        for raw in raw_nodes {
            let id = match non_empty(raw.id.as_deref()) {
                Some(id) if !taken.contains(id) => id.to_string(),
                Some(id) => {
                    let fresh = self.ids.mint(is_draft);
                    warn!(id, fresh = fresh.as_str(); "Duplicate node id, minted a fresh one");
                    fresh
                }
                None => self.ids.mint(is_draft),
            };

            let template = match non_empty(raw.data.template_id.as_deref()) {
                Some(template_id) => Some(template::find(templates, template_id).ok_or_else(
                    || AtlasError::TemplateNotFound {
                        template_id: template_id.to_string(),
                        node_id: id.clone(),
                    },
                )?),
                None => None,
            };

            taken.insert(id.clone());
            nodes.push(self.node(id, raw, template));
        }

        Ok(nodes)
    }

    fn node(&self, id: String, raw: &RawNode, template: Option<&Template>) -> Node {
        let data = &raw.data;

        let kind = if raw.node_type.as_deref() == Some(VIRTUAL_NODE_TYPE) {
            NodeKind::Virtual {
                virtual_of: non_empty(raw.virtual_of.as_deref()).map(str::to_string),
            }
        } else {
            NodeKind::Concrete {
                type_name: raw.node_type.clone(),
                diagram: None,
            }
        };

        let label = resolve(non_empty(data.label.as_deref()), None, style::DEFAULT_NODE_LABEL);
        let description = resolve(data.description.as_deref(), None, "");

        Node {
            id,
            kind,
            data: NodeData {
                label: label.to_string(),
                description: description.to_string(),
                template_id: template.map(|t| t.id.clone()),
                rotation: resolve(finite(data.rotation), None, style::DEFAULT_ROTATION),
                stroke_width: resolve(positive(data.stroke_width), None, style::DEFAULT_STROKE_WIDTH),
                font_size: resolve(positive(data.font_size), None, style::DEFAULT_FONT_SIZE),
                fill_color: resolve_color(
                    data.fill_color.as_deref(),
                    template.and_then(|t| t.fill_color.as_deref()),
                    self.defaults.fill_color(),
                ),
                stroke_color: resolve_color(
                    data.stroke_color.as_deref(),
                    template.and_then(|t| t.stroke_color.as_deref()),
                    self.defaults.stroke_color(),
                ),
                font_color: resolve_color(
                    data.font_color.as_deref(),
                    template.and_then(|t| t.font_color.as_deref()),
                    self.defaults.font_color(),
                ),
                icon: non_empty(data.icon.as_deref())
                    .or(template.and_then(|t| t.icon.as_deref()))
                    .map(str::to_string),
            },
            position: Some(resolve(
                raw.position.filter(|position| position.is_finite()),
                None,
                Point::default(),
            )),
            width: Some(resolve(positive(raw.width), None, style::DEFAULT_NODE_WIDTH)),
            height: Some(resolve(positive(raw.height), None, style::DEFAULT_NODE_HEIGHT)),
            selected: false,
        }
    }

    fn edges(&self, raw_edges: &[RawEdge], nodes: &[Node], is_draft: bool) -> Vec<Edge> {
        let endpoints = Endpoints::new(nodes);
        let mut taken: HashSet<String> = HashSet::new();
        let mut edges = Vec::with_capacity(raw_edges.len());

        for raw in raw_edges {
            let (Some(source), Some(target)) = (
                endpoints.resolve(raw.source.as_deref()),
                endpoints.resolve(raw.target.as_deref()),
            ) else {
                debug!(
                    source = raw.source.as_deref().unwrap_or_default(),
                    target = raw.target.as_deref().unwrap_or_default();
                    "Dropping edge with unresolved endpoint"
                );
                continue;
            };

            let id = match non_empty(raw.id.as_deref()) {
                Some(id) if !taken.contains(id) => id.to_string(),
                _ => self.ids.mint(is_draft),
            };
            taken.insert(id.clone());

            edges.push(self.edge(id, source.to_string(), target.to_string(), raw));
        }

        edges
    }

    fn edge(&self, id: String, source: String, target: String, raw: &RawEdge) -> Edge {
        let data = &raw.data;
        let direction = data.direction.as_deref().and_then(Direction::parse);

        let (marker_start, marker_end, direction) =
            match (raw.marker_start.clone(), raw.marker_end.clone(), direction) {
                (None, None, Some(direction)) => {
                    let (start, end) = direction.markers();
                    (start.then(Marker::arrow), end.then(Marker::arrow), direction)
                }
                (start, end, None) => {
                    let direction = Direction::from_markers(start.is_some(), end.is_some());
                    (start, end, direction)
                }
                (start, end, Some(direction)) => (start, end, direction),
            };

        Edge {
            id,
            source,
            target,
            marker_start,
            marker_end,
            data: EdgeData {
                label: data.label.clone().unwrap_or_default(),
                direction,
                color: resolve_color(data.color.as_deref(), None, self.defaults.edge_color()),
                stroke_width: resolve(positive(data.stroke_width), None, style::DEFAULT_STROKE_WIDTH),
                font_size: resolve(positive(data.font_size), None, style::DEFAULT_FONT_SIZE),
            },
            selected: false,
        }
    }
}

/// Lookup of edge endpoints among freshly normalized nodes.
struct Endpoints<'a> {
    ids: HashSet<&'a str>,
    labels: HashMap<&'a str, &'a str>,
}

impl<'a> Endpoints<'a> {
    fn new(nodes: &'a [Node]) -> Self {
        let mut labels = HashMap::new();
        for node in nodes {
            // First node with a label wins
            labels.entry(node.label().trim()).or_insert(node.id.as_str());
        }

        Self {
            ids: nodes.iter().map(|node| node.id.as_str()).collect(),
            labels,
        }
    }

    /// Resolves a reference by node id, then by label.
    fn resolve(&self, reference: Option<&str>) -> Option<&'a str> {
        let reference = non_empty(reference)?;
        if let Some(&id) = self.ids.get(reference) {
            return Some(id);
        }
        self.labels.get(reference.trim()).copied()
    }
}

#[cfg(test)]
mod tests {
    use atlas_core::{
        identifier::{SequentialGenerator, is_draft},
        style::{DEFAULT_EDGE_COLOR, DEFAULT_FILL_COLOR},
    };

    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::default()
            .with_id_generator(SequentialGenerator::new("n"))
            .without_layout()
    }

    #[test]
    fn test_resolve_order() {
        assert_eq!(resolve(Some(1), Some(2), 3), 1);
        assert_eq!(resolve(None, Some(2), 3), 2);
        assert_eq!(resolve(None, None, 3), 3);
    }

    #[test]
    fn test_resolve_color_skips_invalid_values() {
        assert_eq!(resolve_color(Some("red"), Some("blue"), "black"), "red");
        assert_eq!(resolve_color(Some("nope"), Some("blue"), "black"), "blue");
        assert_eq!(resolve_color(Some("nope"), Some("nada"), "black"), "black");
        assert_eq!(resolve_color(None, None, "black"), "black");
    }

    #[test]
    fn test_empty_node_gets_defaults() {
        let raw = RawGraph::new(vec![RawNode::default()], Vec::new());
        let result = normalizer().normalize(&raw, &[], false).unwrap();

        let node = &result.nodes[0];
        assert_eq!(node.id, "n1");
        assert_eq!(node.label(), "Node");
        assert_eq!(node.data.description, "");
        assert_eq!(node.width, Some(90.0));
        assert_eq!(node.height, Some(40.0));
        assert_eq!(node.position, Some(Point::new(0.0, 0.0)));
        assert_eq!(node.data.rotation, 0.0);
        assert_eq!(node.data.stroke_width, 2.0);
        assert_eq!(node.data.font_size, 12.0);
        assert_eq!(node.data.fill_color, DEFAULT_FILL_COLOR);
        assert!(!node.is_virtual());
    }

    #[test]
    fn test_draft_ids() {
        let raw = RawGraph::new(
            vec![RawNode::default(), RawNode::labelled("kept", "Kept")],
            vec![RawEdge::between("Node", "kept")],
        );
        let result = normalizer().normalize(&raw, &[], true).unwrap();

        assert!(is_draft(&result.nodes[0].id));
        assert_eq!(result.nodes[1].id, "kept");
        assert!(is_draft(&result.edges[0].id));
    }

    #[test]
    fn test_unknown_template_fails() {
        let mut raw_node = RawNode::default();
        raw_node.data.template_id = Some("missing-template".to_string());
        let raw = RawGraph::new(vec![RawNode::labelled("a", "A"), raw_node], Vec::new());

        let err = normalizer()
            .normalize(&raw, &[Template::new("svc", "Service")], false)
            .unwrap_err();

        match err {
            AtlasError::TemplateNotFound { template_id, .. } => {
                assert_eq!(template_id, "missing-template")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_template_reference_is_ignored() {
        let mut raw_node = RawNode::labelled("a", "A");
        raw_node.data.template_id = Some(String::new());
        let raw = RawGraph::new(vec![raw_node], Vec::new());

        let result = normalizer().normalize(&raw, &[], false).unwrap();
        assert_eq!(result.nodes[0].data.template_id, None);
    }

    #[test]
    fn test_template_supplies_colors() {
        let template = Template::new("db", "Database")
            .with_fill_color("#eef")
            .with_stroke_color("not a color")
            .with_icon("database");
        let mut raw_node = RawNode::default();
        raw_node.data.template_id = Some("db".to_string());
        raw_node.data.font_color = Some("green".to_string());
        let raw = RawGraph::new(vec![raw_node], Vec::new());

        let result = normalizer().normalize(&raw, &[template], false).unwrap();
        let data = &result.nodes[0].data;

        assert_eq!(data.label, style::DEFAULT_NODE_LABEL);
        assert_eq!(data.template_id.as_deref(), Some("db"));
        assert_eq!(data.fill_color, "#eef");
        assert_eq!(data.stroke_color, style::DEFAULT_STROKE_COLOR);
        assert_eq!(data.font_color, "green");
        assert_eq!(data.icon.as_deref(), Some("database"));
    }

    #[test]
    fn test_template_does_not_supply_label() {
        let mut raw_node = RawNode::default();
        raw_node.data.template_id = Some("db".to_string());
        let raw = RawGraph::new(
            vec![raw_node, RawNode::labelled("b", "B")],
            vec![RawEdge::between("Node", "b")],
        );

        let result = normalizer()
            .normalize(&raw, &[Template::new("db", "Database")], false)
            .unwrap();

        assert_eq!(result.nodes[0].data.label, "Node");
        assert_eq!(result.nodes[0].data.description, "");
        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.edges[0].source, result.nodes[0].id);
        assert_eq!(result.edges[0].target, "b");
    }

    #[test]
    fn test_configured_defaults() {
        let defaults = StyleDefaults::default()
            .with_fill_color("#101010")
            .with_edge_color("orange");
        let normalizer = Normalizer::new(defaults)
            .with_id_generator(SequentialGenerator::new("n"))
            .without_layout();
        let raw = RawGraph::new(
            vec![RawNode::labelled("a", "A"), RawNode::labelled("b", "B")],
            vec![RawEdge::between("a", "b")],
        );

        let result = normalizer.normalize(&raw, &[], false).unwrap();
        assert_eq!(result.nodes[0].data.fill_color, "#101010");
        assert_eq!(result.edges[0].data.color, "orange");
    }

    #[test]
    fn test_invalid_numbers_are_absent() {
        let mut raw_node = RawNode::labelled("a", "A");
        raw_node.width = Some(-5.0);
        raw_node.height = Some(f32::NAN);
        raw_node.position = Some(Point::new(f32::INFINITY, 3.0));
        raw_node.data.font_size = Some(0.0);
        raw_node.data.rotation = Some(45.0);
        let raw = RawGraph::new(vec![raw_node], Vec::new());

        let node = &normalizer().normalize(&raw, &[], false).unwrap().nodes[0];
        assert_eq!(node.width, Some(90.0));
        assert_eq!(node.height, Some(40.0));
        assert_eq!(node.position, Some(Point::default()));
        assert_eq!(node.data.font_size, 12.0);
        assert_eq!(node.data.rotation, 45.0);
    }

    #[test]
    fn test_duplicate_node_ids_are_replaced() {
        let raw = RawGraph::new(
            vec![RawNode::labelled("a", "First"), RawNode::labelled("a", "Second")],
            Vec::new(),
        );
        let result = normalizer().normalize(&raw, &[], false).unwrap();

        assert_eq!(result.nodes[0].id, "a");
        assert_eq!(result.nodes[1].id, "n1");
    }

    #[test]
    fn test_virtual_raw_node() {
        let raw_node = RawNode {
            id: Some("v".to_string()),
            node_type: Some(VIRTUAL_NODE_TYPE.to_string()),
            virtual_of: Some("elsewhere".to_string()),
            ..RawNode::default()
        };
        let raw = RawGraph::new(vec![raw_node], Vec::new());

        let node = &normalizer().normalize(&raw, &[], false).unwrap().nodes[0];
        assert_eq!(node.virtual_of(), Some("elsewhere"));
    }

    #[test]
    fn test_unresolved_edges_are_dropped() {
        let raw = RawGraph::new(
            vec![RawNode::labelled("a", "A"), RawNode::labelled("b", "B")],
            vec![
                RawEdge::between("a", "b"),
                RawEdge::between("X", "A"),
                RawEdge::default(),
            ],
        );
        let result = normalizer().normalize(&raw, &[], false).unwrap();

        assert_eq!(result.edges.len(), raw.edges.len() - 2);
        assert_eq!(result.edges[0].source, "a");
        assert_eq!(result.edges[0].target, "b");
    }

    #[test]
    fn test_edges_resolve_by_label() {
        let raw = RawGraph::new(
            vec![
                RawNode::labelled("n-api", "API Gateway"),
                RawNode::labelled("n-db", "Orders DB"),
            ],
            vec![RawEdge::between("API Gateway", " Orders DB ")],
        );
        let result = normalizer().normalize(&raw, &[], false).unwrap();

        let edge = &result.edges[0];
        assert_eq!(edge.source, "n-api");
        assert_eq!(edge.target, "n-db");
        assert_eq!(edge.id, "n1");
    }

    #[test]
    fn test_id_match_wins_over_label() {
        let raw = RawGraph::new(
            vec![RawNode::labelled("a", "b"), RawNode::labelled("b", "a")],
            vec![RawEdge::between("a", "b")],
        );
        let result = normalizer().normalize(&raw, &[], false).unwrap();

        assert_eq!(result.edges[0].source, "a");
        assert_eq!(result.edges[0].target, "b");
    }

    #[test]
    fn test_edge_defaults() {
        let raw = RawGraph::new(
            vec![RawNode::labelled("a", "A"), RawNode::labelled("b", "B")],
            vec![RawEdge::between("a", "b")],
        );
        let edge = &normalizer().normalize(&raw, &[], false).unwrap().edges[0];

        assert_eq!(edge.label(), "");
        assert_eq!(edge.data.direction, Direction::None);
        assert_eq!(edge.data.color, DEFAULT_EDGE_COLOR);
        assert_eq!(edge.data.stroke_width, 2.0);
        assert_eq!(edge.data.font_size, 12.0);
        assert!(!edge.has_start_marker());
        assert!(!edge.has_end_marker());
    }

    #[test]
    fn test_direction_and_markers_derive_each_other() {
        let mut forward = RawEdge::between("a", "b");
        forward.data.direction = Some("forward".to_string());
        let mut marked = RawEdge::between("b", "a");
        marked.marker_start = Some(Marker::arrow());
        marked.marker_end = Some(Marker::new("arrow"));
        let mut unknown = RawEdge::between("a", "b");
        unknown.data.direction = Some("sideways".to_string());

        let raw = RawGraph::new(
            vec![RawNode::labelled("a", "A"), RawNode::labelled("b", "B")],
            vec![forward, marked, unknown],
        );
        let edges = normalizer().normalize(&raw, &[], false).unwrap().edges;

        assert!(!edges[0].has_start_marker());
        assert_eq!(edges[0].marker_end, Some(Marker::arrow()));
        assert_eq!(edges[1].data.direction, Direction::Both);
        assert_eq!(edges[1].marker_end, Some(Marker::new("arrow")));
        assert_eq!(edges[2].data.direction, Direction::None);
    }

    #[test]
    fn test_canonical_entities_are_unchanged() {
        let mut node = Node::concrete("a", "Alpha").with_description("first");
        node.position = Some(Point::new(10.0, 20.0));
        node.width = Some(120.0);
        node.height = Some(60.0);
        node.data.template_id = Some("svc".to_string());
        node.data.fill_color = "#abcdef".to_string();
        let mut other = Node::concrete("b", "Beta");
        other.position = Some(Point::new(0.0, 200.0));
        other.width = Some(90.0);
        other.height = Some(40.0);
        let edge = Edge::new("e1", "a", "b")
            .with_label("calls")
            .with_markers(false, true);

        let raw_nodes: Vec<RawNode> = [&node, &other]
            .into_iter()
            .map(|node| serde_json::from_value(serde_json::to_value(node).unwrap()).unwrap())
            .collect();
        let raw_edge: RawEdge =
            serde_json::from_value(serde_json::to_value(&edge).unwrap()).unwrap();
        let raw = RawGraph::new(raw_nodes, vec![raw_edge]);

        let result = normalizer()
            .normalize(&raw, &[Template::new("svc", "Service")], false)
            .unwrap();

        assert_eq!(result.nodes, vec![node, other]);
        assert_eq!(result.edges, vec![edge]);
    }

    #[test]
    fn test_normalize_runs_layout() {
        let raw = RawGraph::new(
            vec![RawNode::labelled("a", "A"), RawNode::labelled("b", "B")],
            vec![RawEdge::between("a", "b")],
        );
        let result = Normalizer::default().normalize(&raw, &[], false).unwrap();

        assert!(result.nodes.iter().all(|node| node.selected));
        assert!(result.edges.iter().all(|edge| edge.selected));
        let (a, b) = (result.nodes[0].position.unwrap(), result.nodes[1].position.unwrap());
        assert!(a.y() < b.y());
    }
}
