//! Naming conventions and defaults shared by the converter and the CLI.

/// Maximum length of a generated identifier.
pub const ID_MAX_LEN: usize = 128;

/// Identifier used when the sanitized input is empty.
pub const DEFAULT_IDENTIFIER: &str = "id";

/// Name given to an application without one.
pub const DEFAULT_APPLICATION_NAME: &str = "Application";

/// Name given to a component without one.
pub const DEFAULT_COMPONENT_NAME: &str = "Component";

/// Key used for a `:value` tag whose key is blank.
pub const DEFAULT_TAG_KEY: &str = "tag";

/// Value used for bare tags and `key:` tags.
pub const DEFAULT_TAG_VALUE: &str = "true";

/// Directory under the output root that holds generated resources.
pub const DEFAULT_NAMESPACE: &str = ".harness";

/// Subdirectory for service documents.
pub const SERVICES_DIR: &str = "services";

/// Subdirectory for pipeline documents.
pub const PIPELINES_DIR: &str = "pipelines";

/// Extension of every generated document.
pub const YAML_EXTENSION: &str = "yaml";

/// Default organisation identifier stamped into documents.
pub const DEFAULT_ORG: &str = "default";

/// Default project identifier stamped into documents.
pub const DEFAULT_PROJECT: &str = "default";

/// Default version label for step-group templates.
pub const DEFAULT_TEMPLATE_VERSION: &str = "v1";

/// Default pattern deciding which components receive the step group.
pub const DEFAULT_MATCH_PATTERN: &str = "java|gradle|jar|war";

/// Registry picked up from the working directory when none is given.
pub const DEFAULT_REGISTRY_PATH: &str = ".harness/template-registry.yaml";

/// Placeholder telling the target system to ask for a value at run time.
pub const RUNTIME_INPUT: &str = "<+input>";

/// Suffix appended to application names to form pipeline identifiers.
pub const PIPELINE_ID_SUFFIX: &str = "_deploy";

/// Suffix appended to template names to form step-group identifiers.
pub const STEP_GROUP_ID_SUFFIX: &str = "_Invocation";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "ucdport";
