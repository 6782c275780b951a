//! Visual defaults applied to generated nodes and edges.
//!
//! Numeric defaults are fixed. Color defaults live in [`StyleDefaults`] so an
//! application can restyle generated content without touching templates.

/// Label given to a node that arrives without one.
pub const DEFAULT_NODE_LABEL: &str = "Node";
/// Rotation of a node in degrees.
pub const DEFAULT_ROTATION: f32 = 0.0;
/// Stroke width of node borders and edge lines.
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;
/// Font size of node and edge labels.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;
/// Width of a node that arrives without one.
pub const DEFAULT_NODE_WIDTH: f32 = 90.0;
/// Height of a node that arrives without one.
pub const DEFAULT_NODE_HEIGHT: f32 = 40.0;

pub const DEFAULT_FILL_COLOR: &str = "#ffffff";
pub const DEFAULT_STROKE_COLOR: &str = "#1e1e1e";
pub const DEFAULT_FONT_COLOR: &str = "#1e1e1e";
pub const DEFAULT_EDGE_COLOR: &str = "#555555";

/// Global color defaults, used when neither the raw entity nor its template
/// supplies a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDefaults {
    fill_color: String,
    stroke_color: String,
    font_color: String,
    edge_color: String,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            fill_color: DEFAULT_FILL_COLOR.to_string(),
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            font_color: DEFAULT_FONT_COLOR.to_string(),
            edge_color: DEFAULT_EDGE_COLOR.to_string(),
        }
    }
}

impl StyleDefaults {
    /// Sets the node fill color
    pub fn with_fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = color.into();
        self
    }

    /// Sets the node stroke color
    pub fn with_stroke_color(mut self, color: impl Into<String>) -> Self {
        self.stroke_color = color.into();
        self
    }

    /// Sets the node font color
    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = color.into();
        self
    }

    /// Sets the edge line color
    pub fn with_edge_color(mut self, color: impl Into<String>) -> Self {
        self.edge_color = color.into();
        self
    }

    pub fn fill_color(&self) -> &str {
        &self.fill_color
    }

    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    pub fn font_color(&self) -> &str {
        &self.font_color
    }

    pub fn edge_color(&self) -> &str {
        &self.edge_color
    }
}
