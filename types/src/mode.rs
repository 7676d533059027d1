//! Deployment mode: decides once per process whether simulated verification
//! is even constructible.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The deployment flag the service was started with.
///
/// Only an explicit non-production value enables simulation. Anything
/// missing, empty or unrecognised is treated as [`DeploymentMode::Production`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeploymentMode {
    #[default]
    Production,
    Development,
    Test,
}

impl DeploymentMode {
    /// Interpret a raw deployment flag.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(|f| f.trim().to_ascii_lowercase()).as_deref() {
            Some("development") | Some("dev") => Self::Development,
            Some("test") => Self::Test,
            _ => Self::Production,
        }
    }

    pub fn allows_simulation(&self) -> bool {
        !matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Test => "test",
        }
    }
}

impl From<String> for DeploymentMode {
    fn from(s: String) -> Self {
        Self::from_flag(Some(&s))
    }
}

impl From<DeploymentMode> for String {
    fn from(mode: DeploymentMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_flags_enable_simulation() {
        assert!(DeploymentMode::from_flag(Some("development")).allows_simulation());
        assert!(DeploymentMode::from_flag(Some("TEST")).allows_simulation());
        assert!(!DeploymentMode::from_flag(Some("production")).allows_simulation());
        assert!(!DeploymentMode::from_flag(Some("prod")).allows_simulation());
        assert!(!DeploymentMode::from_flag(Some("")).allows_simulation());
        assert!(!DeploymentMode::from_flag(None).allows_simulation());
    }

    #[test]
    fn garbage_falls_back_to_production() {
        assert_eq!(
            DeploymentMode::from_flag(Some("staging")),
            DeploymentMode::Production
        );
    }
}
