//! Error adapter for converting AtlasError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. JSON decode errors
//! are rendered against the offending input with a label at the reported line
//! and column.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use atlas::AtlasError;

/// Adapter for a JSON decode error and the text it was decoded from.
pub struct JsonAdapter<'a> {
    err: &'a serde_json::Error,
    src: &'a str,
}

impl<'a> JsonAdapter<'a> {
    pub fn new(err: &'a serde_json::Error, src: &'a str) -> Self {
        Self { err, src }
    }

    /// Byte span of the reported position, clamped to the source.
    fn span(&self) -> SourceSpan {
        let line_start: usize = self
            .src
            .split_inclusive('\n')
            .take(self.err.line().saturating_sub(1))
            .map(str::len)
            .sum();
        let offset = (line_start + self.err.column().saturating_sub(1)).min(self.src.len());

        let len = if self.src.is_char_boundary(offset) {
            self.src[offset..].chars().next().map_or(0, char::len_utf8)
        } else {
            0
        };
        SourceSpan::new(offset.into(), len)
    }
}

impl fmt::Debug for JsonAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for JsonAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid JSON: {}", self.err)
    }
}

impl std::error::Error for JsonAdapter<'_> {}

impl MietteDiagnostic for JsonAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("atlas::json"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.err.classify() {
            serde_json::error::Category::Eof => "the input ends before the JSON document is complete",
            serde_json::error::Category::Data => "the JSON is well-formed but does not match the expected shape",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("here".to_string()),
            self.span(),
        ))))
    }
}

/// Adapter for [`AtlasError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a AtlasError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            AtlasError::Io(_) => "atlas::io",
            AtlasError::Json { .. } => "atlas::json",
            AtlasError::TemplateNotFound { .. } => "atlas::template",
            AtlasError::Config(_) => "atlas::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            AtlasError::TemplateNotFound { .. } => Some(Box::new(
                "pass the template catalog with --templates, or remove the templateId",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A JSON decode error with its source text.
    Json(JsonAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Json(j) => fmt::Display::fmt(j, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Json(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Json(j) => j.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Json(j) => j.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Json(j) => j.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Json(j) => j.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert an [`AtlasError`] into a reportable error.
pub fn to_reportable(err: &AtlasError) -> Reportable<'_> {
    match err {
        AtlasError::Json { err, src } => Reportable::Json(JsonAdapter::new(err, src)),
        _ => Reportable::Error(ErrorAdapter(err)),
    }
}
