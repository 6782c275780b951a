//! Layered layout backed by the `rust-sugiyama` crate.
//!
//! `rust-sugiyama` assigns each vertex of a connected part of the graph a
//! layer and an order within that layer. This engine maps those abstract
//! coordinates onto a grid of cells as large as the largest node, then places
//! the connected parts left to right.

use std::{
    collections::{HashMap, HashSet},
    panic,
};

use log::debug;
use rust_sugiyama::configure::Config;

use atlas_core::geometry::{Point, Size};

use crate::layout::{
    Error, LayoutEngine, LayoutGraph, LayoutNode, LayoutOptions, LayoutResult, PositionedNode,
    panic_message,
};

/// Two `rust-sugiyama` y coordinates closer than this share a layer.
const LAYER_TOLERANCE: f32 = 1e-3;

/// Layered layout engine.
///
/// Layers run top to bottom along the edge direction, separated by the layer
/// spacing; nodes within a layer are separated by the node spacing. Connected
/// parts and unconnected nodes are separated by the component spacing. The
/// edge spacings have no effect because edges are not routed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }
}

/// Cell grid every connected part is placed on.
struct Grid {
    cell: Size,
    x_step: f32,
    y_step: f32,
}

impl Grid {
    fn center(&self, origin_x: f32, column: f32, layer: usize) -> Point {
        Point::new(
            origin_x + column * self.x_step,
            layer as f32 * self.y_step,
        )
        .add_point(self.cell.center())
    }

    /// Width of a part whose columns span `0..=columns`.
    fn width(&self, columns: f32) -> f32 {
        columns * self.x_step + self.cell.width()
    }
}

impl LayoutEngine for Engine {
    fn layout(&self, graph: &LayoutGraph, options: &LayoutOptions) -> Result<LayoutResult, Error> {
        // Map node IDs to u32 IDs for rust-sugiyama
        let mut vertices: Vec<&LayoutNode> = Vec::new();
        let mut vertex_ids: HashMap<&str, u32> = HashMap::new();
        for node in &graph.nodes {
            if vertex_ids.contains_key(node.id.as_str()) {
                continue;
            }
            let vertex = u32::try_from(vertices.len())
                .map_err(|_| Error::Engine("graph has too many nodes".to_string()))?;
            vertex_ids.insert(node.id.as_str(), vertex);
            vertices.push(node);
        }

        let mut edges = Vec::new();
        let mut seen = HashSet::new();
        for edge in &graph.edges {
            for source in &edge.sources {
                for target in &edge.targets {
                    if let (Some(&source), Some(&target)) = (
                        vertex_ids.get(source.as_str()),
                        vertex_ids.get(target.as_str()),
                    ) {
                        // Skip self-loops and parallel edges
                        if source != target && seen.insert((source, target)) {
                            edges.push((source, target));
                        }
                    }
                }
            }
        }

        let cell = vertices
            .iter()
            .fold(Size::default(), |cell, node| cell.max(node.size));
        let grid = Grid {
            cell,
            x_step: cell.width() + options.node_spacing(),
            y_step: cell.height() + options.layer_spacing(),
        };

        let mut centers: HashMap<u32, Point> = HashMap::new();
        let mut cursor_x = 0.0;

        if !edges.is_empty() {
            debug!(
                nodes = vertices.len(),
                edges = edges.len();
                "Applying Sugiyama algorithm"
            );
            for component in run_sugiyama(edges.clone())? {
                let width = place_component(&component, &edges, cursor_x, &grid, &mut centers);
                cursor_x += width + options.component_spacing();
            }
        }

        // Nodes without edges form single-node parts after the connected ones
        for (vertex, _) in vertices.iter().enumerate() {
            let vertex = vertex as u32;
            if centers.contains_key(&vertex) {
                continue;
            }
            centers.insert(vertex, grid.center(cursor_x, 0.0, 0));
            cursor_x += grid.width(0.0) + options.component_spacing();
        }

        let nodes = vertices
            .iter()
            .enumerate()
            .filter_map(|(vertex, node)| {
                let center = centers.get(&(vertex as u32))?;
                Some(PositionedNode {
                    id: node.id.clone(),
                    position: center.sub_point(node.size.center()),
                })
            })
            .collect();

        Ok(LayoutResult {
            nodes,
            edges: graph.edges.iter().map(|edge| edge.id.clone()).collect(),
        })
    }
}

/// Runs `rust-sugiyama`, returning the raw coordinates of each connected part.
fn run_sugiyama(edges: Vec<(u32, u32)>) -> Result<Vec<Vec<(u32, Point)>>, Error> {
    let layouts = panic::catch_unwind(move || {
        let config = Config {
            minimum_length: 1,
            vertex_spacing: 1.0,
            ..Default::default()
        };
        rust_sugiyama::from_edges(&edges, &config)
    })
    .map_err(|payload| Error::Panicked(panic_message(payload.as_ref())))?;

    if layouts.is_empty() {
        return Err(Error::Empty);
    }

    Ok(layouts
        .into_iter()
        .map(|(coords, _, _)| {
            coords
                .into_iter()
                .filter_map(|(id, (x, y))| match u32::try_from(id) {
                    Ok(vertex) => Some((vertex, Point::new(x as f32, y as f32))),
                    Err(_) => {
                        debug!(id; "Vertex id from rust-sugiyama is out of range");
                        None
                    }
                })
                .collect()
        })
        .collect())
}

/// Places one connected part with its left edge at `origin_x` and returns its
/// width.
///
/// Layers are numbered so that most edges point downwards, whatever the sign
/// convention of the raw y coordinates.
fn place_component(
    coords: &[(u32, Point)],
    edges: &[(u32, u32)],
    origin_x: f32,
    grid: &Grid,
    centers: &mut HashMap<u32, Point>,
) -> f32 {
    if coords.is_empty() {
        return 0.0;
    }

    let raw_y: HashMap<u32, f32> = coords.iter().map(|&(id, point)| (id, point.y())).collect();
    let flow: f32 = edges
        .iter()
        .filter_map(|(source, target)| Some(raw_y.get(target)? - raw_y.get(source)?))
        .sum();
    let orient = |y: f32| if flow < 0.0 { -y } else { y };

    let mut layers: Vec<f32> = coords.iter().map(|(_, point)| orient(point.y())).collect();
    layers.sort_by(f32::total_cmp);
    layers.dedup_by(|a, b| (*a - *b).abs() < LAYER_TOLERANCE);

    let min_x = coords
        .iter()
        .map(|(_, point)| point.x())
        .fold(f32::INFINITY, f32::min);
    let mut columns: f32 = 0.0;

    for &(id, point) in coords {
        let y = orient(point.y());
        let layer = layers
            .iter()
            .position(|layer| (layer - y).abs() < LAYER_TOLERANCE)
            .unwrap_or_default();
        let column = point.x() - min_x;
        columns = columns.max(column);
        centers.insert(id, grid.center(origin_x, column, layer));
    }

    grid.width(columns)
}
