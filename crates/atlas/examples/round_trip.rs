//! Example: Summarizing a forest and ingesting a generated reply
//!
//! This example builds a small diagram forest in code, renders the summary a
//! language model would receive, then ingests a canned model reply.

use atlas::{
    Atlas,
    diagram::{Diagram, Edge, Forest, Node, SubDiagram},
    template::Template,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A system diagram whose API node nests its own diagram
    let api = Node::concrete("api", "API").with_sub_diagram(SubDiagram::new(
        vec![
            Node::concrete("auth", "Auth").with_description("Issues and verifies tokens"),
            Node::mirror("db-ref", "db"),
        ],
        vec![Edge::new("e2", "auth", "db-ref").with_markers(false, true)],
    ));
    let system = Diagram::new("system")
        .with_name("System")
        .with_nodes(vec![api, Node::concrete("db", "Database")])
        .with_edges(vec![Edge::new("e1", "api", "db").with_label("queries")]);

    let mut forest = Forest::new();
    forest.insert(system.id.clone(), system);

    let atlas = Atlas::default();
    println!("Summary sent to the model:\n");
    println!("{}\n", atlas.summarize(&forest, Some("system")));

    // What a model might answer when asked to extend the diagram
    let reply = r#"```json
    {
        "diagramId": "system",
        "nodes": [
            {"data": {"label": "Cache", "templateId": "store"}},
            {"id": "db", "data": {"label": "Database"}}
        ],
        "edges": [
            {"source": "Cache", "target": "db", "data": {"label": "reads through", "direction": "forward"}},
            {"source": "Queue", "target": "db"}
        ]
    }
    ```"#;
    let templates = [Template::new("store", "Store").with_fill_color("#fff4e0")];

    let raw = atlas.parse(reply)?;
    let ingested = atlas.ingest_with_draft(raw, &templates, true)?;

    println!("Ingested {} nodes and {} edges:", ingested.nodes.len(), ingested.edges.len());
    println!("{}", serde_json::to_string_pretty(&ingested)?);

    Ok(())
}
