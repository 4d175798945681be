//! `ucdport convert` — Convert an export and write the generated documents.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use ucdport_convert::convert::convert;
use ucdport_convert::emit::Emitter;
use ucdport_convert::source::load_document;
use ucdport_convert::template::TemplateMatcher;

use super::MappingArgs;
use crate::output;

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input and mapping options.
    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Output root directory.
    #[arg(short, long, env = "UCDPORT_OUT")]
    pub out: PathBuf,
}

/// Executes the `convert` command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the export cannot be
/// read or parsed, the template registry is invalid, or an output file
/// cannot be written.
pub fn execute(args: &ConvertArgs) -> anyhow::Result<()> {
    let config = args.mapping.to_config();
    config.validate()?;
    tracing::info!(
        input = %args.mapping.input.display(),
        out = %args.out.display(),
        "converting export"
    );

    let document = load_document(&args.mapping.input)?;
    let matcher = TemplateMatcher::from_settings(&config.templates)?;
    let plan = convert(&document, &config, &matcher);

    if plan.is_empty() {
        println!("No applications found in input document.");
        return Ok(());
    }

    let report = Emitter::new(&args.out, &config.namespace).emit(&plan)?;

    for app in &plan.applications {
        println!("{}", output::application_summary(app));
    }
    if let Some(notice) = output::collision_notice(&report) {
        println!("{notice}");
    }

    let root = std::path::absolute(&args.out)
        .with_context(|| format!("cannot resolve {}", args.out.display()))?;
    println!();
    println!("Done. Output written under: {}", root.display());
    Ok(())
}
