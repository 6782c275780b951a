use std::fs;

use tempfile::tempdir;

use atlas::AtlasError;
use atlas_cli::{Args, Command, run};

fn args(command: Command) -> Args {
    Args {
        command,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn test_summarize_to_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let forest_path = temp_dir.path().join("forest.json");
    let output_path = temp_dir.path().join("summary.txt");
    fs::write(
        &forest_path,
        r#"{
            "d1": {
                "id": "d1",
                "name": "Checkout",
                "nodes": [{"id": "a", "data": {"label": "Cart"}}, {"id": "b", "data": {"label": "Payment"}}],
                "edges": [{"id": "e1", "source": "a", "target": "b", "markerEnd": "arrowclosed"}]
            }
        }"#,
    )
    .unwrap();

    run(&args(Command::Summarize {
        forest: forest_path.to_string_lossy().to_string(),
        root: Some("d1".to_string()),
        output: Some(output_path.to_string_lossy().to_string()),
    }))
    .expect("Summarize failed");

    let summary = fs::read_to_string(&output_path).unwrap();
    assert!(summary.starts_with("Diagram: Checkout [d1]\n"));
    assert!(summary.contains("Edge: Cart [a] --> Payment [b]"));
}

#[test]
fn test_ingest_with_templates_and_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let raw_path = temp_dir.path().join("reply.md");
    let templates_path = temp_dir.path().join("templates.json");
    let config_path = temp_dir.path().join("config.toml");
    let output_path = temp_dir.path().join("ingested.json");

    fs::write(
        &raw_path,
        "```json\n{\"diagramId\": \"d1\", \"nodes\": [{\"data\": {\"label\": \"Cache\", \"templateId\": \"store\"}}, {\"id\": \"db\"}], \"edges\": [{\"source\": \"Cache\", \"target\": \"db\"}]}\n```\n",
    )
    .unwrap();
    fs::write(
        &templates_path,
        r##"[{"id": "store", "label": "Store", "fillColor": "#fff4e0"}]"##,
    )
    .unwrap();
    fs::write(&config_path, "[ingest]\ndraft = true\nauto_layout = false\n").unwrap();

    let mut args = args(Command::Ingest {
        raw: raw_path.to_string_lossy().to_string(),
        templates: Some(templates_path.to_string_lossy().to_string()),
        draft: false,
        output: Some(output_path.to_string_lossy().to_string()),
    });
    args.config = Some(config_path.to_string_lossy().to_string());

    run(&args).expect("Ingest failed");

    let ingested: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(ingested["diagramId"], "d1");

    let nodes = ingested["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes[0]["id"].as_str().unwrap().starts_with("draft-"));
    assert_eq!(nodes[0]["data"]["fillColor"], "#fff4e0");
    assert_eq!(nodes[1]["id"], "db");

    let edges = ingested["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["target"], "db");
}

#[test]
fn test_malformed_input_reports_json_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let raw_path = temp_dir.path().join("reply.json");
    fs::write(&raw_path, "{\"nodes\": [").unwrap();

    let err = run(&args(Command::Ingest {
        raw: raw_path.to_string_lossy().to_string(),
        templates: None,
        draft: false,
        output: Some(temp_dir.path().join("out.json").to_string_lossy().to_string()),
    }))
    .unwrap_err();

    assert!(matches!(err, AtlasError::Json { .. }));
}

#[test]
fn test_missing_input_is_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let err = run(&args(Command::Summarize {
        forest: temp_dir.path().join("nope.json").to_string_lossy().to_string(),
        root: None,
        output: None,
    }))
    .unwrap_err();

    assert!(matches!(err, AtlasError::Io(_)));
}
