//! Step-group template rules.
//!
//! A rule names a reusable step-group template and the conditions under
//! which a component's stage should reference it. Rules come either from a
//! YAML registry file or from a single reference and pattern given on the
//! command line. A rule whose pattern does not compile never matches.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use ucdport_common::config::TemplateSettings;
use ucdport_common::constants::{DEFAULT_TEMPLATE_VERSION, STEP_GROUP_ID_SUFFIX};
use ucdport_common::error::{Result, UcdportError};

use crate::document::{StepGroup, TemplateInputs, TemplateLink, TemplateVariable};
use crate::identifier::sanitize_identifier;
use crate::source::SourceComponent;
use crate::tags::{TagMap, render_tags};

/// Inputs stamped on the command-line template; meant to be edited afterwards.
const DEFAULT_VARIABLES: &[(&str, &str)] = &[
    ("workingDir", "."),
    ("gradleTasks", "clean build"),
    ("extraArgs", ""),
    ("javaHome", ""),
];

/// Contents of a template registry file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateRegistry {
    /// Rules in evaluation order.
    #[serde(default)]
    pub templates: Vec<TemplateRule>,
}

/// One registry entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRule {
    /// Display name; defaults to the template reference.
    pub name: Option<String>,
    /// Reference of the template in the target system.
    pub template_ref: Option<String>,
    /// Version label; defaults to `v1`.
    pub version_label: Option<String>,
    /// Conditions selecting components.
    #[serde(default, rename = "match")]
    pub conditions: Option<MatchConditions>,
    /// Template inputs.
    #[serde(default)]
    pub inputs: Option<RuleInputs>,
}

/// Match conditions of a rule. Every present condition must hold.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchConditions {
    /// At least one pattern must match.
    pub any_regex: Option<Vec<String>>,
    /// Every pattern must match.
    pub all_regex: Option<Vec<String>>,
    /// At least one tag token must match (`key:value`, or a bare key or value).
    pub tags_any: Option<Vec<String>>,
}

/// Template inputs of a rule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleInputs {
    /// Variables in declaration order.
    #[serde(default)]
    pub variables: serde_yaml::Mapping,
}

/// Loads a registry file.
///
/// An empty file yields an empty registry.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid registry.
pub fn load_registry(path: &Path) -> Result<TemplateRegistry> {
    tracing::info!(path = %path.display(), "loading template registry");
    let content = std::fs::read_to_string(path).map_err(|source| UcdportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let registry: Option<TemplateRegistry> =
        serde_yaml::from_str(&content).map_err(|source| UcdportError::Registry {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(registry.unwrap_or_default())
}

/// A rule ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    name: String,
    template_ref: String,
    version_label: String,
    any_regex: Vec<Regex>,
    all_regex: Vec<Regex>,
    tags_any: Vec<String>,
    variables: Vec<TemplateVariable>,
    valid: bool,
}

impl CompiledRule {
    /// Compiles a registry rule. Rules without a template reference yield `None`.
    #[must_use]
    pub fn compile(rule: &TemplateRule) -> Option<Self> {
        let template_ref = rule
            .template_ref
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())?
            .to_owned();
        let name = rule
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| template_ref.clone());
        let version_label = rule
            .version_label
            .clone()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TEMPLATE_VERSION.to_owned());

        let conditions = rule.conditions.clone().unwrap_or_default();
        let mut valid = true;
        let any_regex = compile_all(&name, conditions.any_regex.as_deref(), &mut valid);
        let all_regex = compile_all(&name, conditions.all_regex.as_deref(), &mut valid);
        let tags_any = conditions
            .tags_any
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let variables = rule
            .inputs
            .as_ref()
            .map(|i| {
                i.variables
                    .iter()
                    .map(|(k, v)| TemplateVariable::string(scalar_text(k), null_to_empty(v)))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            name,
            template_ref,
            version_label,
            any_regex,
            all_regex,
            tags_any,
            variables,
            valid,
        })
    }

    /// Builds the rule configured through command-line flags.
    ///
    /// Returns `None` when the reference is blank, which disables injection.
    #[must_use]
    pub fn from_settings(settings: &TemplateSettings) -> Option<Self> {
        let rule = TemplateRule {
            name: None,
            template_ref: Some(settings.template_ref.clone()),
            version_label: Some(settings.version_label.clone()),
            conditions: Some(MatchConditions {
                any_regex: Some(vec![settings.match_pattern.clone()]),
                ..MatchConditions::default()
            }),
            inputs: None,
        };
        let mut compiled = Self::compile(&rule)?;
        compiled.variables = DEFAULT_VARIABLES
            .iter()
            .map(|(k, v)| TemplateVariable::string(*k, *v))
            .collect();
        Some(compiled)
    }

    /// Display name of the rule.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether every pattern of the rule compiled.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Tests the rule against a haystack and the tags it was built from.
    #[must_use]
    pub fn matches(&self, haystack: &str, tags: &TagMap) -> bool {
        if !self.valid {
            return false;
        }
        if !self.any_regex.is_empty() && !self.any_regex.iter().any(|r| r.is_match(haystack)) {
            return false;
        }
        if !self.all_regex.iter().all(|r| r.is_match(haystack)) {
            return false;
        }
        self.tags_any.is_empty() || self.tags_any.iter().any(|t| tag_token_matches(t, tags))
    }

    /// Builds the step-group entry referencing this rule's template.
    #[must_use]
    pub fn step_group(&self) -> StepGroup {
        StepGroup {
            name: self.name.clone(),
            identifier: sanitize_identifier(&format!("{}{STEP_GROUP_ID_SUFFIX}", self.name)),
            template: TemplateLink {
                template_ref: self.template_ref.clone(),
                version_label: self.version_label.clone(),
                template_inputs: (!self.variables.is_empty()).then(|| TemplateInputs {
                    variables: self.variables.clone(),
                }),
            },
        }
    }
}

fn compile_all(rule: &str, patterns: Option<&[String]>, valid: &mut bool) -> Vec<Regex> {
    let mut compiled = Vec::new();
    for pattern in patterns.unwrap_or_default() {
        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(re) => compiled.push(re),
            Err(e) => {
                tracing::warn!(rule, pattern = %pattern, error = %e, "invalid match pattern, rule disabled");
                *valid = false;
            }
        }
    }
    compiled
}

/// `key:value` tokens match a rendered pair; bare tokens match any key or value.
fn tag_token_matches(token: &str, tags: &TagMap) -> bool {
    if token.contains(':') {
        tags.iter()
            .any(|(k, v)| format!("{k}:{v}").to_lowercase() == token)
    } else {
        tags.iter()
            .any(|(k, v)| k.to_lowercase() == token || v.to_lowercase() == token)
    }
}

fn scalar_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_owned())
            .unwrap_or_default(),
    }
}

fn null_to_empty(value: &serde_yaml::Value) -> serde_yaml::Value {
    if value.is_null() {
        serde_yaml::Value::String(String::new())
    } else {
        value.clone()
    }
}

/// The ordered set of rules applied during one run.
#[derive(Debug, Clone, Default)]
pub struct TemplateMatcher {
    rules: Vec<CompiledRule>,
}

impl TemplateMatcher {
    /// A matcher that never injects anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Compiles every usable rule of a registry, preserving order.
    #[must_use]
    pub fn from_registry(registry: &TemplateRegistry) -> Self {
        let rules = registry
            .templates
            .iter()
            .filter_map(|rule| {
                let compiled = CompiledRule::compile(rule);
                if compiled.is_none() {
                    tracing::warn!(name = ?rule.name, "template rule without templateRef skipped");
                }
                compiled
            })
            .collect();
        Self { rules }
    }

    /// Builds the matcher for a run: the registry if one is configured,
    /// otherwise the single command-line rule.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured registry cannot be loaded.
    pub fn from_settings(settings: &TemplateSettings) -> Result<Self> {
        if let Some(path) = &settings.registry {
            return Ok(Self::from_registry(&load_registry(path)?));
        }
        let rules = CompiledRule::from_settings(settings).into_iter().collect();
        Ok(Self { rules })
    }

    /// Returns `true` when no rule can ever match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Step groups for one component, one per matching rule in rule order.
    #[must_use]
    pub fn step_groups_for(&self, component: &SourceComponent, tags: &TagMap) -> Vec<StepGroup> {
        if self.rules.is_empty() {
            return Vec::new();
        }
        let haystack = component_haystack(&component.name, tags);
        self.rules
            .iter()
            .filter(|rule| rule.matches(&haystack, tags))
            .map(CompiledRule::step_group)
            .collect()
    }
}

/// Text a component is matched against: its name followed by its own tags.
#[must_use]
pub fn component_haystack(name: &str, tags: &TagMap) -> String {
    format!("{name} {}", render_tags(tags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::parse_tags;

    fn settings(template_ref: &str, pattern: &str) -> TemplateSettings {
        TemplateSettings {
            template_ref: template_ref.into(),
            match_pattern: pattern.into(),
            ..TemplateSettings::default()
        }
    }

    fn component(name: &str, tags: &[&str]) -> (SourceComponent, TagMap) {
        let comp = SourceComponent {
            name: name.into(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        };
        let parsed = parse_tags(&comp.tags);
        (comp, parsed)
    }

    #[test]
    fn blank_reference_disables_injection() {
        let matcher = TemplateMatcher::from_settings(&settings("  ", "java")).expect("matcher");
        assert!(matcher.is_empty());
        let (comp, tags) = component("java-app", &[]);
        assert!(matcher.step_groups_for(&comp, &tags).is_empty());
    }

    #[test]
    fn pattern_matches_component_name_case_insensitively() {
        let matcher =
            TemplateMatcher::from_settings(&settings("Java_Gradle_Build", "java|gradle"))
                .expect("matcher");
        let (comp, tags) = component("Inventory-Gradle-Service", &[]);
        let groups = matcher.step_groups_for(&comp, &tags);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].template.template_ref, "Java_Gradle_Build");
        assert_eq!(groups[0].template.version_label, "v1");
        assert_eq!(groups[0].identifier, "Java_Gradle_Build_Invocation");
    }

    #[test]
    fn non_matching_component_gets_nothing() {
        let matcher =
            TemplateMatcher::from_settings(&settings("Java_Gradle_Build", "java|gradle"))
                .expect("matcher");
        let (comp, tags) = component("Billing-DB", &[]);
        assert!(matcher.step_groups_for(&comp, &tags).is_empty());
    }

    #[test]
    fn pattern_matches_rendered_tags() {
        let matcher = TemplateMatcher::from_settings(&settings("T", "java")).expect("matcher");
        let (comp, tags) = component("Orders-API", &["java"]);
        assert_eq!(matcher.step_groups_for(&comp, &tags).len(), 1);
    }

    #[test]
    fn invalid_pattern_fails_closed() {
        let matcher = TemplateMatcher::from_settings(&settings("T", "java(")).expect("matcher");
        assert!(!matcher.is_empty());
        assert!(!matcher.rules()[0].is_valid());
        let (comp, tags) = component("java-service", &["java"]);
        assert!(matcher.step_groups_for(&comp, &tags).is_empty());
    }

    #[test]
    fn default_pattern_covers_build_keywords() {
        let matcher = TemplateMatcher::from_settings(&TemplateSettings {
            template_ref: "T".into(),
            ..TemplateSettings::default()
        })
        .expect("matcher");
        for name in ["java-api", "GRADLE-lib", "app.jar", "web.war"] {
            let (comp, tags) = component(name, &[]);
            assert_eq!(matcher.step_groups_for(&comp, &tags).len(), 1, "{name}");
        }
        let (comp, tags) = component("postgres", &[]);
        assert!(matcher.step_groups_for(&comp, &tags).is_empty());
    }

    #[test]
    fn command_line_rule_carries_default_inputs() {
        let rule = CompiledRule::from_settings(&settings("T", "x")).expect("rule");
        let group = rule.step_group();
        let inputs = group.template.template_inputs.expect("inputs");
        let names: Vec<&str> = inputs.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["workingDir", "gradleTasks", "extraArgs", "javaHome"]);
        assert_eq!(
            inputs.variables[1].value,
            serde_yaml::Value::String("clean build".into())
        );
    }

    #[test]
    fn registry_rules_apply_in_order() {
        let yaml = r#"
templates:
  - name: Java Gradle Build
    templateRef: Java_Gradle_Build
    match:
      any_regex: ['\bgradle\b', '\bjava\b']
    inputs:
      variables:
        workingDir: "."
        javaHome: null
  - name: Tagged Only
    templateRef: Tagged
    versionLabel: v3
    match:
      tags_any: ["tier:web"]
  - name: No Ref
"#;
        let registry: TemplateRegistry = serde_yaml::from_str(yaml).expect("registry");
        let matcher = TemplateMatcher::from_registry(&registry);
        assert_eq!(matcher.rules().len(), 2);

        let (comp, tags) = component("shop java", &["tier:web"]);
        let groups = matcher.step_groups_for(&comp, &tags);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Java Gradle Build");
        assert_eq!(groups[0].identifier, "Java_Gradle_Build_Invocation");
        let vars = &groups[0]
            .template
            .template_inputs
            .as_ref()
            .expect("inputs")
            .variables;
        assert_eq!(vars[1].name, "javaHome");
        assert_eq!(vars[1].value, serde_yaml::Value::String(String::new()));
        assert_eq!(groups[1].template.version_label, "v3");
        assert!(groups[1].template.template_inputs.is_none());
    }

    #[test]
    fn all_regex_requires_every_pattern() {
        let rule = CompiledRule::compile(&TemplateRule {
            template_ref: Some("T".into()),
            conditions: Some(MatchConditions {
                all_regex: Some(vec!["java".into(), "spring".into()]),
                ..MatchConditions::default()
            }),
            ..TemplateRule::default()
        })
        .expect("rule");
        assert!(rule.matches("Java Spring app", &TagMap::new()));
        assert!(!rule.matches("java app", &TagMap::new()));
    }

    #[test]
    fn bare_tag_tokens_match_keys_or_values() {
        let rule = CompiledRule::compile(&TemplateRule {
            template_ref: Some("T".into()),
            conditions: Some(MatchConditions {
                tags_any: Some(vec!["Prod".into()]),
                ..MatchConditions::default()
            }),
            ..TemplateRule::default()
        })
        .expect("rule");
        assert!(rule.matches("", &parse_tags(["env:prod"])));
        assert!(rule.matches("", &parse_tags(["prod"])));
        assert!(!rule.matches("", &parse_tags(["env:qa"])));
    }

    #[test]
    fn invalid_registry_pattern_disables_only_that_rule() {
        let yaml = r"
templates:
  - templateRef: Broken
    match:
      any_regex: ['(']
  - templateRef: Working
    match:
      any_regex: ['api']
";
        let registry: TemplateRegistry = serde_yaml::from_str(yaml).expect("registry");
        let matcher = TemplateMatcher::from_registry(&registry);
        let (comp, tags) = component("orders-api", &[]);
        let groups = matcher.step_groups_for(&comp, &tags);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Working");
    }

    #[test]
    fn load_registry_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("template-registry.yaml");
        std::fs::write(&path, "templates:\n  - templateRef: A\n").expect("write");
        let registry = load_registry(&path).expect("load");
        assert_eq!(registry.templates.len(), 1);

        std::fs::write(&path, "").expect("write");
        assert!(load_registry(&path).expect("load empty").templates.is_empty());

        std::fs::write(&path, "templates: [").expect("write");
        assert!(matches!(
            load_registry(&path),
            Err(UcdportError::Registry { .. })
        ));
    }

    #[test]
    fn configured_registry_replaces_command_line_rule() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("registry.yaml");
        std::fs::write(&path, "templates:\n  - templateRef: FromFile\n").expect("write");
        let matcher = TemplateMatcher::from_settings(&TemplateSettings {
            template_ref: "FromFlags".into(),
            registry: Some(path),
            ..TemplateSettings::default()
        })
        .expect("matcher");
        assert_eq!(matcher.rules().len(), 1);
        assert_eq!(matcher.rules()[0].name(), "FromFile");
    }
}
