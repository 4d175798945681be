//! Writes a [`ConversionPlan`] to disk.
//!
//! Layout under the output root:
//!
//! ```text
//! <root>/<namespace>/services/<serviceIdentifier>.yaml
//! <root>/<namespace>/pipelines/<pipelineIdentifier>.yaml
//! ```
//!
//! Files are overwritten in place. Two documents with the same sanitized
//! identifier in one run end up in the same file; the later one wins and a
//! warning is logged.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use ucdport_common::constants::{PIPELINES_DIR, SERVICES_DIR, YAML_EXTENSION};
use ucdport_common::error::{Result, UcdportError};

use crate::convert::ConversionPlan;

/// Paths written by one [`Emitter::emit`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Every file written, in write order. Repeats on collision.
    pub written: Vec<PathBuf>,
    /// Number of writes that replaced a file from the same run.
    pub collisions: usize,
}

/// Writes generated documents under an output root.
#[derive(Debug, Clone)]
pub struct Emitter {
    base: PathBuf,
}

impl Emitter {
    /// Creates an emitter writing to `<root>/<namespace>`.
    pub fn new(root: impl AsRef<Path>, namespace: &str) -> Self {
        Self {
            base: root.as_ref().join(namespace),
        }
    }

    /// Directory holding service documents.
    #[must_use]
    pub fn services_dir(&self) -> PathBuf {
        self.base.join(SERVICES_DIR)
    }

    /// Directory holding pipeline documents.
    #[must_use]
    pub fn pipelines_dir(&self) -> PathBuf {
        self.base.join(PIPELINES_DIR)
    }

    /// Path of the service document with the given identifier.
    #[must_use]
    pub fn service_path(&self, identifier: &str) -> PathBuf {
        self.services_dir()
            .join(format!("{identifier}.{YAML_EXTENSION}"))
    }

    /// Path of the pipeline document with the given identifier.
    #[must_use]
    pub fn pipeline_path(&self, identifier: &str) -> PathBuf {
        self.pipelines_dir()
            .join(format!("{identifier}.{YAML_EXTENSION}"))
    }

    /// Writes every document of the plan, creating directories as needed.
    ///
    /// Files written before a failure stay on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file cannot be written or a
    /// document cannot be serialized.
    pub fn emit(&self, plan: &ConversionPlan) -> Result<EmitReport> {
        for dir in [self.services_dir(), self.pipelines_dir()] {
            std::fs::create_dir_all(&dir).map_err(|source| UcdportError::Io {
                path: dir.clone(),
                source,
            })?;
        }

        let mut report = EmitReport::default();
        let mut seen = HashSet::new();
        for app in &plan.applications {
            for service in &app.services {
                let path = self.service_path(&service.service.identifier);
                write_document(&path, service, &mut seen, &mut report)?;
            }
            if let Some(pipeline) = &app.pipeline {
                let path = self.pipeline_path(&pipeline.pipeline.identifier);
                write_document(&path, pipeline, &mut seen, &mut report)?;
            }
        }
        tracing::info!(
            files = report.written.len(),
            collisions = report.collisions,
            "documents written"
        );
        Ok(report)
    }
}

/// Serializes one document to YAML.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized.
pub fn render_yaml<T: Serialize>(document: &T) -> Result<String> {
    Ok(serde_yaml::to_string(document)?)
}

fn write_document<T: Serialize>(
    path: &Path,
    document: &T,
    seen: &mut HashSet<PathBuf>,
    report: &mut EmitReport,
) -> Result<()> {
    let yaml = render_yaml(document)?;
    if !seen.insert(path.to_path_buf()) {
        tracing::warn!(path = %path.display(), "identifier collision, overwriting earlier output");
        report.collisions += 1;
    }
    std::fs::write(path, yaml).map_err(|source| UcdportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "wrote document");
    report.written.push(path.to_path_buf());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert;
    use crate::source::parse_document;
    use crate::template::TemplateMatcher;
    use ucdport_common::config::ConvertConfig;

    fn plan(json: &str) -> ConversionPlan {
        let doc = parse_document(json).expect("parse");
        convert(&doc, &ConvertConfig::default(), &TemplateMatcher::disabled())
    }

    #[test]
    fn paths_follow_layout() {
        let emitter = Emitter::new("/out", ".harness");
        assert_eq!(
            emitter.service_path("Orders_API"),
            PathBuf::from("/out/.harness/services/Orders_API.yaml")
        );
        assert_eq!(
            emitter.pipeline_path("Orders_deploy"),
            PathBuf::from("/out/.harness/pipelines/Orders_deploy.yaml")
        );
    }

    #[test]
    fn emit_writes_services_and_pipeline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let emitter = Emitter::new(dir.path(), ".harness");
        let report = emitter
            .emit(&plan(
                r#"{"applications": [{"application": {"name": "A"},
                    "components": [{"name": "one"}, {"name": "two"}]}]}"#,
            ))
            .expect("emit");
        assert_eq!(report.written.len(), 3);
        assert_eq!(report.collisions, 0);
        assert!(emitter.service_path("one").is_file());
        assert!(emitter.service_path("two").is_file());
        assert!(emitter.pipeline_path("A_deploy").is_file());
    }

    #[test]
    fn colliding_identifiers_overwrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let emitter = Emitter::new(dir.path(), "ns");
        let report = emitter
            .emit(&plan(
                r#"{"applications": [{"application": {"name": "A"},
                    "components": [{"name": "web-api"}, {"name": "web.api"}]}]}"#,
            ))
            .expect("emit");
        assert_eq!(report.collisions, 1);
        let content = std::fs::read_to_string(emitter.service_path("web_api")).expect("read");
        assert!(content.contains("name: web.api"));
    }

    #[test]
    fn emit_fails_when_root_is_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("blocker");
        std::fs::write(&file, "x").expect("write");
        let emitter = Emitter::new(&file, "ns");
        let err = emitter.emit(&ConversionPlan::default()).expect_err("should fail");
        assert!(matches!(err, UcdportError::Io { .. }));
    }
}
