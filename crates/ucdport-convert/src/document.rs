//! Generated resource documents.
//!
//! Field order follows the target schema and is preserved by the YAML
//! serializer, so these structs define the exact layout of every file.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use ucdport_common::types::{DeploymentType, ShellKind};

use crate::tags::TagMap;

/// A service file: `service: {...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDocument {
    /// The service definition.
    pub service: Service,
}

/// A deployable unit bound to one source component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Display name (the component name).
    pub name: String,
    /// Sanitized identifier; also the file stem.
    pub identifier: String,
    /// Organisation identifier.
    pub org_identifier: String,
    /// Project identifier.
    pub project_identifier: String,
    /// Component tags.
    pub tags: TagMap,
    /// Deployment mechanism.
    pub service_definition: ServiceDefinition,
}

/// Deployment mechanism of a service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDefinition {
    /// Deployment type.
    #[serde(rename = "type")]
    pub kind: DeploymentType,
    /// Type-specific settings; always empty when generated.
    pub spec: BTreeMap<String, String>,
}

/// A pipeline file: `pipeline: {...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineDocument {
    /// The pipeline definition.
    pub pipeline: Pipeline,
}

/// Ordered stages deploying one source application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    /// Display name.
    pub name: String,
    /// Sanitized identifier; also the file stem.
    pub identifier: String,
    /// Organisation identifier.
    pub org_identifier: String,
    /// Project identifier.
    pub project_identifier: String,
    /// Application tags.
    pub tags: TagMap,
    /// Stages in component order.
    pub stages: Vec<StageEntry>,
}

/// List wrapper: `- stage: {...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageEntry {
    /// The stage.
    pub stage: Stage,
}

/// Deployment stage for one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    /// Display name (the component name).
    pub name: String,
    /// Sanitized identifier.
    pub identifier: String,
    /// Stage kind, always `Deployment`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Stage body.
    pub spec: StageSpec,
}

/// Body of a deployment stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSpec {
    /// Must equal the referenced service's deployment type.
    pub deployment_type: DeploymentType,
    /// Service the stage deploys.
    pub service: ServiceRef,
    /// Target environment, chosen at run time.
    pub environment: EnvironmentRef,
    /// Steps to run.
    pub execution: Execution,
}

/// Reference to a generated service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRef {
    /// Identifier of the service.
    pub service_ref: String,
}

/// Environment and infrastructure selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentRef {
    /// Environment identifier or runtime-input placeholder.
    pub environment_ref: String,
    /// Infrastructure definitions within the environment.
    pub infrastructure_definitions: Vec<InfrastructureRef>,
}

/// One infrastructure definition reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfrastructureRef {
    /// Identifier or runtime-input placeholder.
    pub identifier: String,
}

/// Execution block of a stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Execution {
    /// Steps in run order.
    pub steps: Vec<ExecutionStep>,
}

/// One entry of an execution step list.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionStep {
    /// `stepGroup: {...}` referencing a template.
    StepGroup(StepGroup),
    /// `step: {...}` running a script.
    Step(ShellStep),
}

impl ExecutionStep {
    /// Returns the step group, if this entry is one.
    #[must_use]
    pub const fn as_step_group(&self) -> Option<&StepGroup> {
        match self {
            Self::StepGroup(g) => Some(g),
            Self::Step(_) => None,
        }
    }

    /// Returns the script step, if this entry is one.
    #[must_use]
    pub const fn as_step(&self) -> Option<&ShellStep> {
        match self {
            Self::Step(s) => Some(s),
            Self::StepGroup(_) => None,
        }
    }
}

// Single-key maps rather than serde's enum encoding, which YAML renders as tags.
impl Serialize for ExecutionStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::StepGroup(group) => map.serialize_entry("stepGroup", group)?,
            Self::Step(step) => map.serialize_entry("step", step)?,
        }
        map.end()
    }
}

/// A reference to a reusable step-group template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepGroup {
    /// Display name.
    pub name: String,
    /// Sanitized identifier.
    pub identifier: String,
    /// Template reference.
    pub template: TemplateLink,
}

/// Template reference with its inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLink {
    /// Template identifier.
    pub template_ref: String,
    /// Template version.
    pub version_label: String,
    /// Inputs; omitted when there are none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_inputs: Option<TemplateInputs>,
}

/// Inputs passed to a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateInputs {
    /// Variables in declaration order.
    pub variables: Vec<TemplateVariable>,
}

/// One template input variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateVariable {
    /// Variable name.
    pub name: String,
    /// Variable type, always `String`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Variable value.
    pub value: serde_yaml::Value,
}

impl TemplateVariable {
    /// Creates a `String`-typed variable.
    pub fn string(name: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        Self {
            name: name.into(),
            kind: "String",
            value: value.into(),
        }
    }
}

/// An inline script step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellStep {
    /// Display name.
    pub name: String,
    /// Identifier.
    pub identifier: String,
    /// Step kind, always `ShellScript`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Step body.
    pub spec: ShellSpec,
}

/// Body of a script step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellSpec {
    /// Shell the script runs under.
    pub shell: ShellKind,
    /// Whether the script runs on the delegate.
    pub on_delegate: bool,
    /// Script source.
    pub source: ScriptSource,
}

/// Where a script comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptSource {
    /// Source kind, always `Inline`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Inline body.
    pub spec: InlineScript,
}

/// An inline script body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineScript {
    /// Script text.
    pub script: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_steps_serialize_as_single_key_maps() {
        let step = ExecutionStep::Step(ShellStep {
            name: "Deploy".into(),
            identifier: "Deploy".into(),
            kind: "ShellScript",
            spec: ShellSpec {
                shell: ShellKind::Bash,
                on_delegate: true,
                source: ScriptSource {
                    kind: "Inline",
                    spec: InlineScript {
                        script: "echo hi".into(),
                    },
                },
            },
        });
        let yaml = serde_yaml::to_string(&step).expect("serialize");
        assert!(yaml.starts_with("step:\n"), "{yaml}");
        assert!(yaml.contains("onDelegate: true"));
        assert!(yaml.contains("shell: Bash"));
        assert!(!yaml.contains('!'));
    }

    #[test]
    fn template_inputs_are_omitted_when_absent() {
        let group = ExecutionStep::StepGroup(StepGroup {
            name: "T".into(),
            identifier: "T_Invocation".into(),
            template: TemplateLink {
                template_ref: "T".into(),
                version_label: "v1".into(),
                template_inputs: None,
            },
        });
        let yaml = serde_yaml::to_string(&group).expect("serialize");
        assert!(yaml.starts_with("stepGroup:\n"));
        assert!(yaml.contains("templateRef: T"));
        assert!(!yaml.contains("templateInputs"));
        assert!(group.as_step_group().is_some());
        assert!(group.as_step().is_none());
    }

    #[test]
    fn service_definition_uses_target_type_names() {
        let def = ServiceDefinition {
            kind: DeploymentType::WindowsRemote,
            spec: BTreeMap::new(),
        };
        let yaml = serde_yaml::to_string(&def).expect("serialize");
        assert_eq!(yaml, "type: WinRm\nspec: {}\n");
    }
}
