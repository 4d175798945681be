//! Construction of service, stage, and pipeline documents.

use std::collections::BTreeMap;

use ucdport_common::config::ConvertConfig;
use ucdport_common::constants::{PIPELINE_ID_SUFFIX, RUNTIME_INPUT};
use ucdport_common::types::{DeploymentType, ShellKind};

use crate::document::{
    EnvironmentRef, Execution, ExecutionStep, InfrastructureRef, InlineScript, Pipeline,
    PipelineDocument, ScriptSource, Service, ServiceDefinition, ServiceDocument, ServiceRef,
    ShellSpec, ShellStep, Stage, StageEntry, StageSpec, StepGroup,
};
use crate::identifier::sanitize_identifier;
use crate::tags::TagMap;

/// Builds the service document for one component.
#[must_use]
pub fn build_service(
    name: &str,
    config: &ConvertConfig,
    tags: TagMap,
    deployment_type: DeploymentType,
) -> ServiceDocument {
    ServiceDocument {
        service: Service {
            name: name.to_owned(),
            identifier: sanitize_identifier(name),
            org_identifier: config.org.clone(),
            project_identifier: config.project.clone(),
            tags,
            service_definition: ServiceDefinition {
                kind: deployment_type,
                spec: BTreeMap::new(),
            },
        },
    }
}

/// Builds the deployment stage for one component.
///
/// The stage runs the given step groups first, then a placeholder deploy
/// step. Environment and infrastructure are left to the operator.
#[must_use]
pub fn build_stage(
    component_name: &str,
    service: &Service,
    step_groups: Vec<StepGroup>,
) -> StageEntry {
    let deployment_type = service.service_definition.kind;
    let mut steps: Vec<ExecutionStep> = step_groups
        .into_iter()
        .map(ExecutionStep::StepGroup)
        .collect();
    steps.push(ExecutionStep::Step(placeholder_step(
        component_name,
        deployment_type.shell(),
    )));

    StageEntry {
        stage: Stage {
            name: component_name.to_owned(),
            identifier: sanitize_identifier(component_name),
            kind: "Deployment",
            spec: StageSpec {
                deployment_type,
                service: ServiceRef {
                    service_ref: service.identifier.clone(),
                },
                environment: EnvironmentRef {
                    environment_ref: RUNTIME_INPUT.to_owned(),
                    infrastructure_definitions: vec![InfrastructureRef {
                        identifier: RUNTIME_INPUT.to_owned(),
                    }],
                },
                execution: Execution { steps },
            },
        },
    }
}

/// Builds the pipeline document for one application.
#[must_use]
pub fn build_pipeline(
    app_name: &str,
    config: &ConvertConfig,
    tags: TagMap,
    stages: Vec<StageEntry>,
) -> PipelineDocument {
    PipelineDocument {
        pipeline: Pipeline {
            name: format!("{app_name} - deploy"),
            identifier: sanitize_identifier(&format!("{app_name}{PIPELINE_ID_SUFFIX}")),
            org_identifier: config.org.clone(),
            project_identifier: config.project.clone(),
            tags,
            stages,
        },
    }
}

/// The deploy step every stage ends with, to be replaced by hand.
#[must_use]
pub fn placeholder_step(component_name: &str, shell: ShellKind) -> ShellStep {
    ShellStep {
        name: "Deploy".into(),
        identifier: "Deploy".into(),
        kind: "ShellScript",
        spec: ShellSpec {
            shell,
            on_delegate: true,
            source: ScriptSource {
                kind: "Inline",
                spec: InlineScript {
                    script: placeholder_script(component_name, shell),
                },
            },
        },
    }
}

/// A one-line script announcing that deployment is not implemented yet.
#[must_use]
pub fn placeholder_script(component_name: &str, shell: ShellKind) -> String {
    let message = format!("TODO: implement deployment for {component_name}");
    match shell {
        ShellKind::Bash => format!("echo \"{}\"", escape_double_quoted(&message, '\\', "\"\\$`")),
        ShellKind::PowerShell => {
            format!("Write-Host \"{}\"", escape_double_quoted(&message, '`', "\"`$"))
        }
    }
}

/// Prefixes every char in `specials` with `escape`; newlines become spaces.
fn escape_double_quoted(text: &str, escape: char, specials: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' | '\r' => out.push(' '),
            c if specials.contains(c) => {
                out.push(escape);
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
