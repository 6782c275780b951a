//! CLI logic for the Atlas diagram tool.
//!
//! This module contains the core CLI logic: loading configuration, reading
//! JSON inputs, and running summarization or ingestion.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::fs;

use log::info;

use atlas::{Atlas, AtlasError, diagram::Forest, template::Template};

/// Run the Atlas CLI application
///
/// # Errors
///
/// Returns `AtlasError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed JSON inputs
/// - Unknown template references
pub fn run(args: &Args) -> Result<(), AtlasError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let draft_by_default = app_config.ingest().draft();
    let atlas = Atlas::new(app_config)?;

    match &args.command {
        Command::Summarize {
            forest,
            root,
            output,
        } => {
            info!(input_path = forest, root:?; "Summarizing forest");

            let forest: Forest = read_json(forest)?;
            let summary = atlas.summarize(&forest, root.as_deref());

            write_output(output.as_deref(), &summary)?;
        }
        Command::Ingest {
            raw,
            templates,
            draft,
            output,
        } => {
            info!(input_path = raw, templates:?; "Ingesting generated graph");

            let source = fs::read_to_string(raw)?;
            let raw = atlas.parse(&source)?;
            let templates: Vec<Template> = match templates {
                Some(path) => read_json(path)?,
                None => Vec::new(),
            };

            let ingested = atlas.ingest_with_draft(raw, &templates, *draft || draft_by_default)?;
            let json = serde_json::to_string_pretty(&ingested).map_err(std::io::Error::other)?;

            write_output(output.as_deref(), &json)?;
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, AtlasError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|err| AtlasError::new_json_error(err, content))
}

fn write_output(output: Option<&str>, content: &str) -> Result<(), AtlasError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            info!(output_file = path; "Output written");
        }
        None => println!("{content}"),
    }
    Ok(())
}
