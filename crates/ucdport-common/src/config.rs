//! Conversion configuration model.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Result, UcdportError};

/// Settings stamped into every generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Organisation identifier.
    pub org: String,
    /// Project identifier.
    pub project: String,
    /// Directory under the output root holding `services/` and `pipelines/`.
    pub namespace: String,
    /// Where step-group rules come from.
    pub templates: TemplateSettings,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            org: constants::DEFAULT_ORG.into(),
            project: constants::DEFAULT_PROJECT.into(),
            namespace: constants::DEFAULT_NAMESPACE.into(),
            templates: TemplateSettings::default(),
        }
    }
}

impl ConvertConfig {
    /// Checks that the identifiers are set and the namespace stays under
    /// the output root.
    ///
    /// # Errors
    ///
    /// Returns [`UcdportError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("org", &self.org), ("project", &self.project)] {
            if value.trim().is_empty() {
                return Err(UcdportError::Config {
                    message: format!("{field} must not be blank"),
                });
            }
        }
        let namespace = Path::new(&self.namespace);
        if self.namespace.trim().is_empty()
            || !namespace
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(UcdportError::Config {
                message: format!(
                    "namespace must be a relative directory inside the output root, got {:?}",
                    self.namespace
                ),
            });
        }
        Ok(())
    }
}

/// Step-group template configuration.
///
/// A registry file, when present, replaces the single rule described by
/// the remaining fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSettings {
    /// Template reference injected into matching stages; empty disables it.
    pub template_ref: String,
    /// Version label stamped next to the reference.
    pub version_label: String,
    /// Case-insensitive regex selecting the components that receive it.
    pub match_pattern: String,
    /// Optional YAML registry of template rules.
    pub registry: Option<PathBuf>,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            template_ref: String::new(),
            version_label: constants::DEFAULT_TEMPLATE_VERSION.into(),
            match_pattern: constants::DEFAULT_MATCH_PATTERN.into(),
            registry: None,
        }
    }
}
