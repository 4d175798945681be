//! Loader for the deployment-system export.
//!
//! The export is a JSON tree of applications, each with components, each
//! carrying name-based tags. Only the fields the converter needs are read;
//! everything else in the export is ignored. Missing names fall back to
//! placeholders and missing tag lists are treated as empty.

use std::path::Path;

use serde::Deserialize;
use ucdport_common::constants::{DEFAULT_APPLICATION_NAME, DEFAULT_COMPONENT_NAME};
use ucdport_common::error::{Result, UcdportError};

/// Root of a loaded export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocument {
    /// Applications in export order.
    pub applications: Vec<SourceApplication>,
}

/// One application of the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceApplication {
    /// Display name.
    pub name: String,
    /// Raw tag tokens.
    pub tags: Vec<String>,
    /// Components in export order.
    pub components: Vec<SourceComponent>,
}

/// One component of an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceComponent {
    /// Display name.
    pub name: String,
    /// Raw tag tokens.
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    applications: Option<Vec<RawEntry>>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    application: Option<RawNamed>,
    components: Option<Vec<RawNamed>>,
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    name: Option<String>,
    tags: Option<Vec<RawTag>>,
}

#[derive(Debug, Deserialize)]
struct RawTag {
    name: Option<String>,
}

impl RawNamed {
    fn resolved_name(&self, fallback: &str) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_owned(),
            _ => fallback.to_owned(),
        }
    }

    fn tag_tokens(&self) -> Vec<String> {
        self.tags
            .iter()
            .flatten()
            .filter_map(|t| t.name.clone())
            .collect()
    }
}

impl From<RawEntry> for SourceApplication {
    fn from(entry: RawEntry) -> Self {
        let (name, tags) = entry.application.as_ref().map_or_else(
            || (DEFAULT_APPLICATION_NAME.to_owned(), Vec::new()),
            |app| (app.resolved_name(DEFAULT_APPLICATION_NAME), app.tag_tokens()),
        );
        let components = entry
            .components
            .unwrap_or_default()
            .iter()
            .map(|c| SourceComponent {
                name: c.resolved_name(DEFAULT_COMPONENT_NAME),
                tags: c.tag_tokens(),
            })
            .collect();
        Self {
            name,
            tags,
            components,
        }
    }
}

/// Parses an export from its JSON text.
///
/// # Errors
///
/// Returns an error if the text is not JSON or does not have the export's shape.
pub fn parse_document(input: &str) -> serde_json::Result<SourceDocument> {
    let raw: RawDocument = serde_json::from_str(input)?;
    let applications = raw
        .applications
        .unwrap_or_default()
        .into_iter()
        .map(SourceApplication::from)
        .collect();
    Ok(SourceDocument { applications })
}

/// Reads and parses an export from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn load_document(path: &Path) -> Result<SourceDocument> {
    tracing::info!(path = %path.display(), "loading export");
    let content = std::fs::read_to_string(path).map_err(|source| UcdportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(&content).map_err(|source| UcdportError::InputParse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        applications = document.applications.len(),
        "export loaded"
    );
    Ok(document)
}
