//! `ucdport plan` — Display the documents a conversion would generate.

use clap::Args;
use ucdport_convert::convert::convert;
use ucdport_convert::emit::Emitter;
use ucdport_convert::source::load_document;
use ucdport_convert::template::TemplateMatcher;

use super::MappingArgs;
use crate::output;

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Input and mapping options.
    #[command(flatten)]
    pub mapping: MappingArgs,
}

/// Executes the `plan` command.
///
/// Loads the export, classifies each application, and lists the service
/// and pipeline files together with any injected step groups. Paths are
/// shown relative to the output root.
///
/// # Errors
///
/// Returns an error if the export or the template registry cannot be loaded.
pub fn execute(args: &PlanArgs) -> anyhow::Result<()> {
    let config = args.mapping.to_config();
    config.validate()?;
    let document = load_document(&args.mapping.input)?;
    let matcher = TemplateMatcher::from_settings(&config.templates)?;
    let plan = convert(&document, &config, &matcher);

    let title = format!("Conversion Plan for: {}", args.mapping.input.display());
    println!("{title}");
    println!("{}", output::rule(title.chars().count()));
    println!();

    if plan.is_empty() {
        println!("  No applications found in input document.");
        return Ok(());
    }

    for rule in matcher.rules() {
        if !rule.is_valid() {
            println!("  ! template rule '{}' has an invalid pattern and will never match", rule.name());
        }
    }

    let layout = Emitter::new("", &config.namespace);
    for app in &plan.applications {
        println!("  {}", output::application_heading(app));
        for service in &app.services {
            println!(
                "    + {}",
                layout.service_path(&service.service.identifier).display()
            );
        }
        if let Some(pipeline) = &app.pipeline {
            let p = &pipeline.pipeline;
            println!("    + {}", layout.pipeline_path(&p.identifier).display());
            for entry in &p.stages {
                let groups: Vec<&str> = entry
                    .stage
                    .spec
                    .execution
                    .steps
                    .iter()
                    .filter_map(|s| s.as_step_group())
                    .map(|g| g.template.template_ref.as_str())
                    .collect();
                if !groups.is_empty() {
                    println!("        {} <- {}", entry.stage.name, groups.join(", "));
                }
            }
        } else {
            println!("    (no components, no pipeline)");
        }
    }

    println!();
    println!(
        "  {} service(s) and {} pipeline(s) would be written.",
        plan.service_count(),
        plan.pipeline_count()
    );
    Ok(())
}
