//! Diagram forest model.
//!
//! A [`Forest`] maps diagram identifiers to [`Diagram`]s. Diagrams hold
//! [`Node`]s and [`Edge`]s; a concrete node may nest a whole [`SubDiagram`],
//! and a virtual node mirrors another node somewhere in the forest.
//!
//! # Wire format
//!
//! Types serialize to the camelCase JSON used by the document store:
//!
//! ```json
//! {
//!   "id": "api",
//!   "type": "service",
//!   "data": { "label": "API", "description": "Public gateway", "templateId": "svc" },
//!   "position": { "x": 0, "y": 0 },
//!   "subDiagram": { "nodes": [], "edges": [] }
//! }
//! ```
//!
//! A node whose `type` is `"virtual"` decodes to [`NodeKind::Virtual`] and
//! reads its reference from `virtualOf`. Every field is optional on input.

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    de::{is_false, null_as, null_as_default},
    geometry::{Point, Size},
    style,
};

/// Node `type` value that marks a virtual node.
pub const VIRTUAL_NODE_TYPE: &str = "virtual";

/// Discriminator reported for concrete nodes that carry no type name.
pub const CONCRETE_NODE_TYPE: &str = "concrete";

/// All diagrams of a document, in document order.
pub type Forest = IndexMap<String, Diagram>;

/// A diagram: an ordered list of nodes and an ordered list of edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<Edge>,
}

impl Diagram {
    /// Creates an empty, unnamed diagram
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_edges(mut self, edges: Vec<Edge>) -> Self {
        self.edges = edges;
        self
    }
}

/// The diagram nested inside a concrete node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubDiagram {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<Edge>,
}

impl SubDiagram {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }
}

/// Concrete/virtual distinction of a node.
///
/// Only concrete nodes can nest a sub-diagram.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Concrete {
        /// Application-level node type, such as `"service"` or `"group"`.
        type_name: Option<String>,
        diagram: Option<SubDiagram>,
    },
    Virtual {
        /// Identifier of the node this placeholder mirrors.
        virtual_of: Option<String>,
    },
}

impl Default for NodeKind {
    fn default() -> Self {
        Self::Concrete {
            type_name: None,
            diagram: None,
        }
    }
}

impl NodeKind {
    /// Text naming the kind of node, as reported in summaries.
    pub fn discriminator(&self) -> &str {
        match self {
            Self::Concrete {
                type_name: Some(name),
                ..
            } if !name.is_empty() => name.as_str(),
            Self::Concrete { .. } => CONCRETE_NODE_TYPE,
            Self::Virtual { .. } => VIRTUAL_NODE_TYPE,
        }
    }
}

/// Label, description and style of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeData {
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,

    #[serde(deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,

    #[serde(deserialize_with = "null_as_rotation")]
    pub rotation: f32,

    #[serde(deserialize_with = "null_as_stroke_width")]
    pub stroke_width: f32,

    #[serde(deserialize_with = "null_as_font_size")]
    pub font_size: f32,

    #[serde(deserialize_with = "null_as_default")]
    pub fill_color: String,

    #[serde(deserialize_with = "null_as_default")]
    pub stroke_color: String,

    #[serde(deserialize_with = "null_as_default")]
    pub font_color: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Default for NodeData {
    fn default() -> Self {
        Self {
            label: String::new(),
            description: String::new(),
            template_id: None,
            rotation: style::DEFAULT_ROTATION,
            stroke_width: style::DEFAULT_STROKE_WIDTH,
            font_size: style::DEFAULT_FONT_SIZE,
            fill_color: style::DEFAULT_FILL_COLOR.to_string(),
            stroke_color: style::DEFAULT_STROKE_COLOR.to_string(),
            font_color: style::DEFAULT_FONT_COLOR.to_string(),
            icon: None,
        }
    }
}

fn null_as_rotation<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    null_as(deserializer, style::DEFAULT_ROTATION)
}

fn null_as_stroke_width<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    null_as(deserializer, style::DEFAULT_STROKE_WIDTH)
}

fn null_as_font_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    null_as(deserializer, style::DEFAULT_FONT_SIZE)
}

/// A diagram node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "NodeRecord", into = "NodeRecord")]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub data: NodeData,
    pub position: Option<Point>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub selected: bool,
}

impl Node {
    /// Creates a concrete node with the given label
    pub fn concrete(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: NodeData {
                label: label.into(),
                ..NodeData::default()
            },
            ..Self::default()
        }
    }

    /// Creates a virtual node mirroring `virtual_of`
    pub fn mirror(id: impl Into<String>, virtual_of: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Virtual {
                virtual_of: Some(virtual_of.into()),
            },
            ..Self::default()
        }
    }

    /// Nests `diagram` inside this node.
    ///
    /// Virtual nodes cannot nest a diagram; the node is returned unchanged.
    pub fn with_sub_diagram(mut self, diagram: SubDiagram) -> Self {
        if let NodeKind::Concrete { diagram: slot, .. } = &mut self.kind {
            *slot = Some(diagram);
        }
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.data.description = description.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.data.label
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self.kind, NodeKind::Virtual { .. })
    }

    /// Returns the referenced node id of a virtual node.
    pub fn virtual_of(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Virtual { virtual_of } => virtual_of.as_deref(),
            NodeKind::Concrete { .. } => None,
        }
    }

    /// Returns the nested diagram of a concrete node.
    pub fn sub_diagram(&self) -> Option<&SubDiagram> {
        match &self.kind {
            NodeKind::Concrete { diagram, .. } => diagram.as_ref(),
            NodeKind::Virtual { .. } => None,
        }
    }

    /// Returns the node's own size, if both dimensions are set.
    pub fn size(&self) -> Option<Size> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some(Size::new(width, height)),
            _ => None,
        }
    }
}

/// Flat wire representation of [`Node`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    node_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    virtual_of: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    data: NodeData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Point>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f32>,

    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "null_as_default")]
    selected: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_diagram: Option<SubDiagram>,
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        let kind = if record.node_type.as_deref() == Some(VIRTUAL_NODE_TYPE) {
            if record.sub_diagram.is_some() {
                warn!(node_id = record.id.as_str(); "Discarding sub-diagram of virtual node");
            }
            NodeKind::Virtual {
                virtual_of: record.virtual_of.filter(|target| !target.is_empty()),
            }
        } else {
            NodeKind::Concrete {
                type_name: record.node_type,
                diagram: record.sub_diagram,
            }
        };

        Self {
            id: record.id,
            kind,
            data: record.data,
            position: record.position,
            width: record.width,
            height: record.height,
            selected: record.selected,
        }
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        let (node_type, virtual_of, sub_diagram) = match node.kind {
            NodeKind::Concrete { type_name, diagram } => (type_name, None, diagram),
            NodeKind::Virtual { virtual_of } => {
                (Some(VIRTUAL_NODE_TYPE.to_string()), virtual_of, None)
            }
        };

        Self {
            id: node.id,
            node_type,
            virtual_of,
            data: node.data,
            position: node.position,
            width: node.width,
            height: node.height,
            selected: node.selected,
            sub_diagram,
        }
    }
}

/// Arrowhead drawn at one end of an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MarkerRecord")]
pub struct Marker {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Marker {
    pub const ARROW: &'static str = "arrowclosed";

    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }

    /// The closed arrowhead used for generated edges.
    pub fn arrow() -> Self {
        Self::new(Self::ARROW)
    }
}

/// Markers arrive either as a bare name or as `{"type": name}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum MarkerRecord {
    Name(String),
    Spec {
        #[serde(rename = "type", default)]
        kind: Option<String>,
    },
}

impl From<MarkerRecord> for Marker {
    fn from(record: MarkerRecord) -> Self {
        match record {
            MarkerRecord::Name(kind) => Self::new(kind),
            MarkerRecord::Spec { kind } => Self::new(kind.unwrap_or_else(|| Self::ARROW.into())),
        }
    }
}

/// Arrow direction of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    #[default]
    None,
    Forward,
    Backward,
    Both,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Both => "both",
        }
    }

    /// Direction implied by the presence of start/end markers.
    pub fn from_markers(start: bool, end: bool) -> Self {
        match (start, end) {
            (true, true) => Self::Both,
            (true, false) => Self::Backward,
            (false, true) => Self::Forward,
            (false, false) => Self::None,
        }
    }

    /// Presence of start and end markers implied by this direction.
    pub fn markers(self) -> (bool, bool) {
        match self {
            Self::None => (false, false),
            Self::Forward => (false, true),
            Self::Backward => (true, false),
            Self::Both => (true, true),
        }
    }

    /// Parses a direction name; returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(Self::None),
            "forward" => Some(Self::Forward),
            "backward" => Some(Self::Backward),
            "both" | "bidirectional" => Some(Self::Both),
            _ => None,
        }
    }
}

impl From<String> for Direction {
    fn from(name: String) -> Self {
        Self::parse(&name).unwrap_or_default()
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        direction.as_str().to_string()
    }
}

/// Label and style of an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,

    #[serde(deserialize_with = "null_as_default")]
    pub direction: Direction,

    #[serde(deserialize_with = "null_as_default")]
    pub color: String,

    #[serde(deserialize_with = "null_as_stroke_width")]
    pub stroke_width: f32,

    #[serde(deserialize_with = "null_as_font_size")]
    pub font_size: f32,
}

impl Default for EdgeData {
    fn default() -> Self {
        Self {
            label: String::new(),
            direction: Direction::None,
            color: style::DEFAULT_EDGE_COLOR.to_string(),
            stroke_width: style::DEFAULT_STROKE_WIDTH,
            font_size: style::DEFAULT_FONT_SIZE,
        }
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_start: Option<Marker>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<Marker>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub data: EdgeData,

    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "null_as_default")]
    pub selected: bool,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = label.into();
        self
    }

    /// Sets arrowheads on the requested ends and the matching direction
    pub fn with_markers(mut self, start: bool, end: bool) -> Self {
        self.marker_start = start.then(Marker::arrow);
        self.marker_end = end.then(Marker::arrow);
        self.data.direction = Direction::from_markers(start, end);
        self
    }

    pub fn label(&self) -> &str {
        &self.data.label
    }

    pub fn has_start_marker(&self) -> bool {
        self.marker_start.is_some()
    }

    pub fn has_end_marker(&self) -> bool {
        self.marker_end.is_some()
    }
}
