//! Layout engines.
//!
//! The adapter talks to engines only through [`LayoutEngine`], so a remote or
//! scripted engine can replace the built-in layered one.

mod sugiyama;

pub use sugiyama::Engine as SugiyamaEngine;

use super::{Error, LayoutGraph, LayoutOptions, LayoutResult};

/// A graph layout capability.
///
/// Engines receive every node with its size and every edge with its endpoints,
/// and return the top-left position of each node they placed.
pub trait LayoutEngine: Send + Sync {
    /// Compute node positions for `graph`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when no layout could be produced.
    fn layout(&self, graph: &LayoutGraph, options: &LayoutOptions) -> Result<LayoutResult, Error>;
}
