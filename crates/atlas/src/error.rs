//! Error types for Atlas operations.
//!
//! This module provides the main error type [`AtlasError`]. Only failures the
//! caller must act on are errors: dropped edges and layout fallbacks are
//! logged and absorbed by the pipeline.

use std::io;

use thiserror::Error;

/// The main error type for Atlas operations.
///
/// # Diagnostic Variants
///
/// The `Json` variant keeps the source text that failed to decode so the
/// error can be reported with the offending line and column.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {err}")]
    Json { err: serde_json::Error, src: String },

    #[error("Template `{template_id}` referenced by node `{node_id}` does not exist")]
    TemplateNotFound { template_id: String, node_id: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AtlasError {
    /// Create a new `Json` error with the associated source text.
    pub fn new_json_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Json {
            err,
            src: src.into(),
        }
    }
}
