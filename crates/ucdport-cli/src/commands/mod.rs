//! CLI command definitions and dispatch.

pub mod convert;
pub mod plan;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use ucdport_common::config::{ConvertConfig, TemplateSettings};
use ucdport_common::constants;

/// ucdport — export-to-pipeline converter.
#[derive(Parser, Debug)]
#[command(name = constants::BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an export and write service and pipeline files.
    Convert(convert::ConvertArgs),
    /// Show what a conversion would generate without writing anything.
    Plan(plan::PlanArgs),
}

/// Options shared by every command that maps an export.
#[derive(Args, Debug, Clone)]
pub struct MappingArgs {
    /// Path to the JSON export.
    #[arg(short, long, env = "UCDPORT_INPUT")]
    pub input: PathBuf,

    /// Organisation identifier stamped into every document.
    #[arg(long, env = "UCDPORT_ORG", default_value = constants::DEFAULT_ORG)]
    pub org: String,

    /// Project identifier stamped into every document.
    #[arg(long, env = "UCDPORT_PROJECT", default_value = constants::DEFAULT_PROJECT)]
    pub project: String,

    /// Step-group template injected into matching stages (empty disables it).
    #[arg(long, env = "UCDPORT_TEMPLATE_REF", default_value = "")]
    pub template_ref: String,

    /// Version label of the step-group template.
    #[arg(long, env = "UCDPORT_TEMPLATE_VERSION", default_value = constants::DEFAULT_TEMPLATE_VERSION)]
    pub template_version: String,

    /// Case-insensitive regex selecting components for the template.
    #[arg(long, env = "UCDPORT_MATCH_PATTERN", default_value = constants::DEFAULT_MATCH_PATTERN)]
    pub match_pattern: String,

    /// YAML template registry; replaces --template-ref and --match-pattern.
    ///
    /// Defaults to `.harness/template-registry.yaml` when that file exists.
    #[arg(long, env = "UCDPORT_REGISTRY")]
    pub registry: Option<PathBuf>,

    /// Directory under the output root that receives the documents.
    #[arg(long, env = "UCDPORT_NAMESPACE", default_value = constants::DEFAULT_NAMESPACE)]
    pub namespace: String,
}

impl MappingArgs {
    /// Builds the conversion configuration, resolving the default registry.
    #[must_use]
    pub fn to_config(&self) -> ConvertConfig {
        let registry = self.registry.clone().or_else(|| {
            let default = Path::new(constants::DEFAULT_REGISTRY_PATH);
            default.is_file().then(|| default.to_path_buf())
        });
        ConvertConfig {
            org: self.org.clone(),
            project: self.project.clone(),
            namespace: self.namespace.clone(),
            templates: TemplateSettings {
                template_ref: self.template_ref.trim().to_owned(),
                version_label: self.template_version.clone(),
                match_pattern: self.match_pattern.clone(),
                registry,
            },
        }
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Convert(args) => convert::execute(&args),
        Command::Plan(args) => plan::execute(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_requires_input_and_output() {
        assert!(Cli::try_parse_from(["ucdport", "convert"]).is_err());
        assert!(Cli::try_parse_from(["ucdport", "convert", "-i", "x.json"]).is_err());
    }

    #[test]
    fn convert_defaults() {
        let cli = Cli::try_parse_from(["ucdport", "convert", "-i", "x.json", "-o", "out"])
            .expect("should parse");
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.out, PathBuf::from("out"));
        assert_eq!(args.mapping.namespace, ".harness");
        assert_eq!(args.mapping.match_pattern, "java|gradle|jar|war");
        assert!(args.mapping.template_ref.is_empty());
    }

    #[test]
    fn mapping_args_become_config() {
        let cli = Cli::try_parse_from([
            "ucdport",
            "plan",
            "--input",
            "x.json",
            "--org",
            "acme",
            "--project",
            "retail",
            "--template-ref",
            " Java_Gradle_Build ",
            "--template-version",
            "v2",
            "--registry",
            "rules.yaml",
        ])
        .expect("should parse");
        let Command::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        let cfg = args.mapping.to_config();
        assert_eq!(cfg.org, "acme");
        assert_eq!(cfg.project, "retail");
        assert_eq!(cfg.templates.template_ref, "Java_Gradle_Build");
        assert_eq!(cfg.templates.version_label, "v2");
        assert_eq!(cfg.templates.registry, Some(PathBuf::from("rules.yaml")));
    }
}
