//! Bounded text summaries of diagram forests.
//!
//! [`summarize`] renders a whole forest, nested sub-diagrams included, as
//! plain text for a language model prompt:
//!
//! ```text
//! Diagram: Backend [d1]
//! Node: API [api] type=service path=[]
//! Node: Auth [auth] type=concrete path=[api] within="API" description="Issues tokens"
//! Edge: API [api] --> Auth [auth] label="verifies"
//! ```
//!
//! Virtual nodes are not listed; edges that touch them are reported against
//! the node they mirror. The output never exceeds [`SUMMARY_BUDGET`]
//! characters plus [`TRUNCATION_MARKER`].

use std::collections::{HashMap, HashSet};

use log::debug;

use atlas_core::diagram::{Diagram, Edge, Forest, Node};

/// Returned for an empty forest.
pub const NO_CONTEXT: &str = "no context";

/// Maximum number of characters of summary text.
pub const SUMMARY_BUDGET: usize = 120_000;

/// Appended when the summary is cut at [`SUMMARY_BUDGET`].
pub const TRUNCATION_MARKER: &str = "\n...[truncated]";

/// Maximum number of characters kept from a node description.
pub const DESCRIPTION_LIMIT: usize = 300;

const ELLIPSIS: &str = "...";
const UNNAMED_DIAGRAM: &str = "(unnamed)";
const UNTITLED_NODE: &str = "(untitled)";

/// Renders `forest` as bounded text.
///
/// The diagram `root_id` (when present in the forest) is listed first, the
/// remaining diagrams follow in forest order. This function never fails.
pub fn summarize(forest: &Forest, root_id: Option<&str>) -> String {
    if forest.is_empty() {
        return NO_CONTEXT.to_string();
    }

    let mut summary = Summary::default();
    for (key, diagram) in visiting_order(forest, root_id) {
        summary.add_diagram(key, diagram);
    }

    let edge_lines = summary.edge_lines();
    debug!(
        diagrams = forest.len(),
        nodes = summary.index.len(),
        edges = edge_lines.len();
        "Summarized diagram forest"
    );

    let mut text = summary.lines.join("\n");
    if !edge_lines.is_empty() {
        text.push('\n');
        text.push_str(&edge_lines.join("\n"));
    }
    truncate_to_budget(text, SUMMARY_BUDGET)
}

/// Root diagram first, then the others in map order.
fn visiting_order<'a>(
    forest: &'a Forest,
    root_id: Option<&str>,
) -> impl Iterator<Item = (&'a str, &'a Diagram)> {
    let root = root_id.and_then(|id| forest.get_key_value(id));
    let root_key = root.map(|(key, _)| key.as_str());

    root.into_iter()
        .chain(
            forest
                .iter()
                .filter(move |(key, _)| Some(key.as_str()) != root_key),
        )
        .map(|(key, diagram)| (key.as_str(), diagram))
}

/// A node waiting to be visited, with the ids and labels of its ancestors.
struct PendingNode<'a> {
    node: &'a Node,
    path_ids: Vec<&'a str>,
    path_labels: Vec<&'a str>,
}

#[derive(Default)]
struct Summary<'a> {
    lines: Vec<String>,
    index: HashMap<&'a str, &'a Node>,
    edges: Vec<&'a Edge>,
}

impl<'a> Summary<'a> {
    /// Emits the diagram header and its concrete nodes, depth first.
    fn add_diagram(&mut self, key: &'a str, diagram: &'a Diagram) {
        let name = diagram
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNNAMED_DIAGRAM);
        let id = if diagram.id.is_empty() {
            key
        } else {
            diagram.id.as_str()
        };
        self.lines.push(format!("Diagram: {name} [{id}]"));
        self.edges.extend(&diagram.edges);

        let mut worklist: Vec<PendingNode<'a>> = diagram
            .nodes
            .iter()
            .rev()
            .map(|node| PendingNode {
                node,
                path_ids: Vec::new(),
                path_labels: Vec::new(),
            })
            .collect();

        while let Some(pending) = worklist.pop() {
            let node = pending.node;
            self.index.entry(node.id.as_str()).or_insert(node);

            if node.is_virtual() {
                continue;
            }
            self.lines.push(node_line(&pending));

            if let Some(sub_diagram) = node.sub_diagram() {
                self.edges.extend(&sub_diagram.edges);

                let mut path_ids = pending.path_ids;
                path_ids.push(node.id.as_str());
                let mut path_labels = pending.path_labels;
                path_labels.push(display_label(node));

                worklist.extend(sub_diagram.nodes.iter().rev().map(|child| PendingNode {
                    node: child,
                    path_ids: path_ids.clone(),
                    path_labels: path_labels.clone(),
                }));
            }
        }
    }

    /// Renders every resolvable edge once per deduplication key.
    fn edge_lines(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();

        for edge in &self.edges {
            let source = self.resolve(&edge.source);
            let target = self.resolve(&edge.target);
            if source.is_empty() || target.is_empty() || source == target {
                continue;
            }
            let (Some(source_node), Some(target_node)) =
                (self.concrete(source), self.concrete(target))
            else {
                continue;
            };

            let label = single_line(edge.label());
            let key = (
                source,
                target,
                edge.has_start_marker(),
                edge.has_end_marker(),
                label.clone(),
            );
            if !seen.insert(key) {
                continue;
            }

            let glyph = arrow_glyph(edge.has_start_marker(), edge.has_end_marker());
            let mut line = format!(
                "Edge: {} [{source}] {glyph} {} [{target}]",
                display_label(source_node),
                display_label(target_node),
            );
            if let Some(label) = label {
                line.push_str(&format!(" label=\"{}\"", escape_quotes(&label)));
            }
            lines.push(line);
        }

        lines
    }

    /// Follows one virtual reference; any other id resolves to itself.
    fn resolve<'b>(&self, id: &'b str) -> &'b str
    where
        'a: 'b,
    {
        match self.index.get(id).copied().and_then(Node::virtual_of) {
            Some(target) => target,
            None => id,
        }
    }

    fn concrete(&self, id: &str) -> Option<&'a Node> {
        self.index
            .get(id)
            .copied()
            .filter(|node| !node.is_virtual())
    }
}

fn node_line(pending: &PendingNode<'_>) -> String {
    let node = pending.node;
    let mut line = format!(
        "Node: {} [{}] type={} path=[{}]",
        display_label(node),
        node.id,
        node.kind.discriminator(),
        pending.path_ids.join(", "),
    );
    if !pending.path_labels.is_empty() {
        line.push_str(&format!(
            " within=\"{}\"",
            escape_quotes(&pending.path_labels.join(" > "))
        ));
    }
    if let Some(description) = format_description(&node.data.description) {
        line.push_str(&format!(" description=\"{description}\""));
    }
    line
}

fn display_label(node: &Node) -> &str {
    let label = node.label().trim();
    if label.is_empty() { UNTITLED_NODE } else { label }
}

/// Glyph for an edge given the presence of its start and end markers.
pub fn arrow_glyph(start: bool, end: bool) -> &'static str {
    match (start, end) {
        (true, true) => "<-->",
        (true, false) => "<--",
        (false, true) => "-->",
        (false, false) => "--",
    }
}

/// Formats a description as a single quoted-string-safe line.
///
/// Whitespace runs collapse to single spaces, the text is trimmed, cut to
/// [`DESCRIPTION_LIMIT`] characters (with an ellipsis) and quotes are
/// escaped. Returns `None` for a blank description.
pub fn format_description(description: &str) -> Option<String> {
    let collapsed = single_line(description)?;
    let limited = if collapsed.chars().count() > DESCRIPTION_LIMIT {
        let mut cut: String = collapsed.chars().take(DESCRIPTION_LIMIT).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        collapsed
    };
    Some(escape_quotes(&limited))
}

fn single_line(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

fn truncate_to_budget(text: String, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => {
            let mut truncated = text[..cut].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            truncated
        }
        None => text,
    }
}
