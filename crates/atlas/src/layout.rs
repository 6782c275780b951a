//! Automatic arrangement of generated diagram entities.
//!
//! The [`LayoutAdapter`] turns nodes and edges into a [`LayoutGraph`] of sized
//! boxes and one-to-one connections, hands it to a [`LayoutEngine`] together
//! with the fixed [`LayoutOptions::LAYERED`] options, and copies the returned
//! positions back onto the nodes.
//!
//! # Pipeline Position
//!
//! ```text
//! RawGraph
//!     ↓ normalize
//! Nodes + Edges (default geometry)
//!     ↓ layout (this module)
//! Arrangement (positioned, selected)
//!     ↓ external store
//! ```
//!
//! Layout is best-effort: when the engine fails, panics or returns nothing
//! usable, the adapter logs the failure and returns its input unchanged.
//!
//! # Re-exports
//!
//! - [`LayoutEngine`] - The layout capability the adapter delegates to
//! - [`SugiyamaEngine`] - Layered engine backed by `rust-sugiyama`

mod engines;

pub use engines::{LayoutEngine, SugiyamaEngine};

use std::{
    collections::{HashMap, HashSet},
    panic::{self, AssertUnwindSafe},
};

use log::{debug, trace, warn};
use serde::Serialize;
use thiserror::Error;

use atlas_core::{
    diagram::{Edge, Node},
    geometry::{Point, Size},
};

/// Width given to the engine for nodes without their own size.
pub const FALLBACK_NODE_WIDTH: f32 = 150.0;

/// Height given to the engine for nodes without their own size.
pub const FALLBACK_NODE_HEIGHT: f32 = 50.0;

/// Reasons a layout attempt produced nothing usable.
#[derive(Debug, Error)]
pub enum Error {
    #[error("layout engine panicked: {0}")]
    Panicked(String),

    #[error("layout engine failed: {0}")]
    Engine(String),

    #[error("layout engine returned no node positions")]
    Empty,

    #[error("layout engine positions match none of the input nodes")]
    Unmapped,
}

/// Layout algorithm requested from the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// Nodes arranged in layers along the edge direction.
    #[default]
    Layered,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Layered => "layered",
        }
    }
}

/// Options passed with every layout request.
///
/// All spacings are in diagram units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    algorithm: Algorithm,
    layer_spacing: f32,
    edge_edge_spacing: f32,
    edge_node_spacing: f32,
    component_spacing: f32,
    node_spacing: f32,
}

impl LayoutOptions {
    /// The options the adapter always uses.
    pub const LAYERED: Self = Self {
        algorithm: Algorithm::Layered,
        layer_spacing: 150.0,
        edge_edge_spacing: 150.0,
        edge_node_spacing: 150.0,
        component_spacing: 50.0,
        node_spacing: 80.0,
    };

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Distance between consecutive layers.
    pub fn layer_spacing(&self) -> f32 {
        self.layer_spacing
    }

    /// Distance between parallel edge segments.
    pub fn edge_edge_spacing(&self) -> f32 {
        self.edge_edge_spacing
    }

    /// Distance between edge segments and nodes.
    pub fn edge_node_spacing(&self) -> f32 {
        self.edge_node_spacing
    }

    /// Distance between disconnected parts of the graph.
    pub fn component_spacing(&self) -> f32 {
        self.component_spacing
    }

    /// Distance between nodes of the same layer.
    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    /// The options as ELK layout properties, for engines that take them in
    /// that form.
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        vec![
            ("elk.algorithm", self.algorithm.as_str().to_string()),
            (
                "elk.layered.spacing.nodeNodeBetweenLayers",
                self.layer_spacing.to_string(),
            ),
            ("elk.spacing.edgeEdge", self.edge_edge_spacing.to_string()),
            ("elk.spacing.edgeNode", self.edge_node_spacing.to_string()),
            (
                "elk.spacing.componentComponent",
                self.component_spacing.to_string(),
            ),
            ("elk.spacing.nodeNode", self.node_spacing.to_string()),
        ]
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::LAYERED
    }
}

/// A sized box in the layout input.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub size: Size,
}

/// A connection in the layout input.
///
/// Engines accept multi-endpoint edges; the adapter always sends exactly one
/// source and one target.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub id: String,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
}

/// Layout input: sized nodes and directed edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutGraph {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl LayoutGraph {
    /// Builds the layout input for the given entities.
    ///
    /// Nodes without their own width and height get
    /// [`FALLBACK_NODE_WIDTH`]×[`FALLBACK_NODE_HEIGHT`].
    pub fn from_entities(nodes: &[Node], edges: &[Edge]) -> Self {
        let fallback = Size::new(FALLBACK_NODE_WIDTH, FALLBACK_NODE_HEIGHT);

        Self {
            nodes: nodes
                .iter()
                .map(|node| LayoutNode {
                    id: node.id.clone(),
                    size: node.size().unwrap_or(fallback),
                })
                .collect(),
            edges: edges
                .iter()
                .map(|edge| LayoutEdge {
                    id: edge.id.clone(),
                    sources: vec![edge.source.clone()],
                    targets: vec![edge.target.clone()],
                })
                .collect(),
        }
    }
}

/// Top-left position assigned to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub position: Point,
}

/// Layout output: node positions and the ids of the edges laid out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<String>,
}

/// Nodes and edges ready to be applied to the document store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Arrangement {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Arranges entities with a [`LayoutEngine`], falling back to the input
/// geometry when layout fails.
pub struct LayoutAdapter {
    engine: Box<dyn LayoutEngine>,
}

impl Default for LayoutAdapter {
    fn default() -> Self {
        Self::new(SugiyamaEngine::new())
    }
}

impl LayoutAdapter {
    /// Create an adapter delegating to `engine`.
    pub fn new(engine: impl LayoutEngine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
        }
    }

    /// Positions `nodes` and marks every node and edge as selected.
    ///
    /// On layout failure the entities are returned unchanged.
    pub fn arrange(&self, nodes: Vec<Node>, edges: Vec<Edge>) -> Arrangement {
        if nodes.is_empty() {
            return Arrangement { nodes, edges };
        }

        let graph = LayoutGraph::from_entities(&nodes, &edges);
        let options = LayoutOptions::LAYERED;
        trace!(properties:? = options.properties(); "Layout options");

        match self.run_engine(&graph, &options) {
            Ok(result) => {
                debug!(
                    nodes = result.nodes.len(),
                    edges = result.edges.len();
                    "Layout applied"
                );
                apply_result(&result, nodes, edges)
            }
            Err(err) => {
                warn!(
                    err:% = err,
                    nodes = nodes.len(),
                    edges = edges.len();
                    "Automatic layout failed, keeping unarranged geometry"
                );
                Arrangement { nodes, edges }
            }
        }
    }

    fn run_engine(&self, graph: &LayoutGraph, options: &LayoutOptions) -> Result<LayoutResult, Error> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.engine.layout(graph, options)))
            .map_err(|payload| Error::Panicked(panic_message(payload.as_ref())))??;

        if result.nodes.is_empty() {
            return Err(Error::Empty);
        }

        let known: HashSet<&str> = graph.nodes.iter().map(|node| node.id.as_str()).collect();
        if !result
            .nodes
            .iter()
            .any(|node| known.contains(node.id.as_str()))
        {
            return Err(Error::Unmapped);
        }

        Ok(result)
    }
}

fn apply_result(result: &LayoutResult, mut nodes: Vec<Node>, mut edges: Vec<Edge>) -> Arrangement {
    let positions: HashMap<&str, Point> = result
        .nodes
        .iter()
        .filter(|node| node.position.is_finite())
        .map(|node| (node.id.as_str(), node.position))
        .collect();

    for node in &mut nodes {
        if let Some(&position) = positions.get(node.id.as_str()) {
            node.position = Some(position);
        }
        node.selected = true;
    }
    for edge in &mut edges {
        edge.selected = true;
    }

    Arrangement { nodes, edges }
}

/// Extracts the message of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    }
}
