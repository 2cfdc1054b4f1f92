//! Deployment environment enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment stage of a credential. Orthogonal to [`super::Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "credential_environment", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production systems.
    Production,
    /// Staging systems.
    Staging,
    /// Development systems.
    Development,
    /// Testing systems.
    Testing,
}

impl Environment {
    /// Return the environment as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
            Self::Testing => "testing",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = vaultkeeper_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            "testing" => Ok(Self::Testing),
            _ => Err(vaultkeeper_core::AppError::validation(format!(
                "Invalid environment: '{s}'"
            ))),
        }
    }
}
