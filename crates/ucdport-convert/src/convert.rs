//! Per-application conversion.
//!
//! Turns a loaded export into a [`ConversionPlan`]: every service and
//! pipeline document of the run, in input order, without touching the
//! filesystem. Applications are independent of each other.

use ucdport_common::config::ConvertConfig;
use ucdport_common::types::DeploymentType;

use crate::builder::{build_pipeline, build_service, build_stage};
use crate::classify::classify;
use crate::document::{PipelineDocument, ServiceDocument};
use crate::source::{SourceApplication, SourceDocument};
use crate::tags::{TagMap, merge_tags, parse_tags};
use crate::template::TemplateMatcher;

/// Everything generated for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionPlan {
    /// One entry per source application, in input order.
    pub applications: Vec<ApplicationPlan>,
}

impl ConversionPlan {
    /// Returns `true` when the export contained no applications.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    /// Total number of service documents.
    #[must_use]
    pub fn service_count(&self) -> usize {
        self.applications.iter().map(|a| a.services.len()).sum()
    }

    /// Total number of pipeline documents.
    #[must_use]
    pub fn pipeline_count(&self) -> usize {
        self.applications
            .iter()
            .filter(|a| a.pipeline.is_some())
            .count()
    }
}

/// Documents generated for one application.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationPlan {
    /// Application name.
    pub name: String,
    /// Deployment type shared by all of its services and stages.
    pub deployment_type: DeploymentType,
    /// One service per component, in component order.
    pub services: Vec<ServiceDocument>,
    /// The pipeline, absent when the application has no components.
    pub pipeline: Option<PipelineDocument>,
}

impl ApplicationPlan {
    /// Number of step groups injected across all stages.
    #[must_use]
    pub fn step_group_count(&self) -> usize {
        self.pipeline.as_ref().map_or(0, |p| {
            p.pipeline
                .stages
                .iter()
                .flat_map(|s| &s.stage.spec.execution.steps)
                .filter(|step| step.as_step_group().is_some())
                .count()
        })
    }
}

/// Converts every application of an export.
#[must_use]
pub fn convert(
    document: &SourceDocument,
    config: &ConvertConfig,
    templates: &TemplateMatcher,
) -> ConversionPlan {
    let applications = document
        .applications
        .iter()
        .map(|app| convert_application(app, config, templates))
        .collect();
    ConversionPlan { applications }
}

/// Converts one application into its services and pipeline.
#[must_use]
pub fn convert_application(
    app: &SourceApplication,
    config: &ConvertConfig,
    templates: &TemplateMatcher,
) -> ApplicationPlan {
    let app_tags = parse_tags(&app.tags);
    let component_tags: Vec<TagMap> = app
        .components
        .iter()
        .map(|c| parse_tags(&c.tags))
        .collect();

    // Aggregated tags only feed classification.
    let mut all_tags = app_tags.clone();
    for tags in &component_tags {
        merge_tags(&mut all_tags, tags);
    }
    let deployment_type = classify(
        &app.name,
        app.components.iter().map(|c| c.name.as_str()),
        &all_tags,
    );
    tracing::info!(
        application = %app.name,
        components = app.components.len(),
        deployment_type = %deployment_type,
        "converting application"
    );

    let mut services = Vec::with_capacity(app.components.len());
    let mut stages = Vec::with_capacity(app.components.len());
    for (component, tags) in app.components.iter().zip(component_tags) {
        let step_groups = templates.step_groups_for(component, &tags);
        if !step_groups.is_empty() {
            tracing::debug!(
                component = %component.name,
                step_groups = step_groups.len(),
                "injecting step groups"
            );
        }
        let service = build_service(&component.name, config, tags, deployment_type);
        stages.push(build_stage(&component.name, &service.service, step_groups));
        services.push(service);
    }

    let pipeline =
        (!stages.is_empty()).then(|| build_pipeline(&app.name, config, app_tags, stages));

    ApplicationPlan {
        name: app.name.clone(),
        deployment_type,
        services,
        pipeline,
    }
}
