//! Domain primitive types used across the ucdport workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Execution mechanism a generated service and its stage deploy with.
///
/// Never present in the source document; inferred per application by the
/// classifier. Serialized with the target system's names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeploymentType {
    /// Remote Windows execution (`WinRm`).
    #[serde(rename = "WinRm")]
    WindowsRemote,
    /// Cloud Foundry / Tanzu Application Service (`TAS`).
    #[serde(rename = "TAS")]
    CloudFoundryStyle,
    /// Plain SSH execution (`Ssh`).
    #[serde(rename = "Ssh")]
    SecureShell,
}

impl DeploymentType {
    /// Returns the target system's name for this deployment type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WindowsRemote => "WinRm",
            Self::CloudFoundryStyle => "TAS",
            Self::SecureShell => "Ssh",
        }
    }

    /// Returns the shell that generated scripts run under.
    #[must_use]
    pub const fn shell(self) -> ShellKind {
        match self {
            Self::WindowsRemote => ShellKind::PowerShell,
            Self::CloudFoundryStyle | Self::SecureShell => ShellKind::Bash,
        }
    }
}

impl fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shell flavour of a generated script step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShellKind {
    /// POSIX shell.
    Bash,
    /// Windows PowerShell.
    PowerShell,
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bash => write!(f, "Bash"),
            Self::PowerShell => write!(f, "PowerShell"),
        }
    }
}
