//! Deployment-type inference.
//!
//! The export never states how a component is deployed. The type is guessed
//! once per application from keywords found anywhere in its names and tags,
//! using an ordered rule list where the first match wins.

use ucdport_common::types::DeploymentType;

use crate::tags::TagMap;

/// A keyword rule: any marker present in the corpus selects `result`.
#[derive(Debug, Clone, Copy)]
struct Rule {
    label: &'static str,
    markers: &'static [&'static str],
    result: DeploymentType,
}

const RULES: &[Rule] = &[
    Rule {
        label: "windows",
        markers: &["windows", "iis", "msi", "com", "dcom", "app pool", "app_pool"],
        result: DeploymentType::WindowsRemote,
    },
    Rule {
        label: "cloud-foundry",
        markers: &["pcf", "tanzu", "cloud foundry", "tas"],
        result: DeploymentType::CloudFoundryStyle,
    },
    // Same outcome as the fallback; kept as its own rule so the match is logged.
    Rule {
        label: "informatica",
        markers: &["informatica"],
        result: DeploymentType::SecureShell,
    },
];

const FALLBACK: DeploymentType = DeploymentType::SecureShell;

/// Builds the lowercase search corpus for an application.
#[must_use]
pub fn corpus<'a, I>(app_name: &'a str, component_names: I, tags: &'a TagMap) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parts: Vec<&str> = vec![app_name];
    parts.extend(component_names);
    parts.extend(tags.keys().map(String::as_str));
    parts.extend(tags.values().map(String::as_str));
    parts.join(" ").to_lowercase()
}

/// Infers the deployment type of an application.
///
/// Substring matching is deliberately loose: `com` also matches `component`.
#[must_use]
pub fn classify<'a, I>(app_name: &'a str, component_names: I, tags: &'a TagMap) -> DeploymentType
where
    I: IntoIterator<Item = &'a str>,
{
    let hay = corpus(app_name, component_names, tags);
    for rule in RULES {
        if let Some(marker) = rule.markers.iter().find(|m| hay.contains(*m)) {
            tracing::debug!(
                application = app_name,
                rule = rule.label,
                marker,
                "deployment type matched"
            );
            return rule.result;
        }
    }
    FALLBACK
}
