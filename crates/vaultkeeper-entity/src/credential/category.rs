//! Credential category enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Organizational tag attached to a credential and to per-application
/// permission overrides.
///
/// The set is closed: adding a category is a compile-time-checked change
/// everywhere it matters. Wire strings are the title-cased forms below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "credential_category")]
pub enum Category {
    /// Hosting credentials for staging infrastructure.
    #[serde(rename = "Staging Hosting")]
    #[sqlx(rename = "Staging Hosting")]
    StagingHosting,
    /// Hosting credentials for production infrastructure.
    #[serde(rename = "Production Hosting")]
    #[sqlx(rename = "Production Hosting")]
    ProductionHosting,
    /// Application-level credentials for staging deployments.
    #[serde(rename = "Staging Application")]
    #[sqlx(rename = "Staging Application")]
    StagingApplication,
    /// Application-level credentials for live deployments.
    #[serde(rename = "Live Application")]
    #[sqlx(rename = "Live Application")]
    LiveApplication,
    /// Application-level credentials for QA deployments.
    #[serde(rename = "QA Application")]
    #[sqlx(rename = "QA Application")]
    QaApplication,
    /// Anything that does not fit the other tags.
    #[serde(rename = "Other")]
    #[sqlx(rename = "Other")]
    Other,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 6] = [
        Category::StagingHosting,
        Category::ProductionHosting,
        Category::StagingApplication,
        Category::LiveApplication,
        Category::QaApplication,
        Category::Other,
    ];

    /// Return the category's wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StagingHosting => "Staging Hosting",
            Self::ProductionHosting => "Production Hosting",
            Self::StagingApplication => "Staging Application",
            Self::LiveApplication => "Live Application",
            Self::QaApplication => "QA Application",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = vaultkeeper_core::AppError;

    /// Parse a wire string, case-insensitively.
    ///
    /// `"Development Hosting"` is accepted as an alias for staging hosting;
    /// the upstream category catalog reports both labels for the same tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "staging hosting" | "development hosting" => Ok(Self::StagingHosting),
            "production hosting" => Ok(Self::ProductionHosting),
            "staging application" => Ok(Self::StagingApplication),
            "live application" => Ok(Self::LiveApplication),
            "qa application" => Ok(Self::QaApplication),
            "other" => Ok(Self::Other),
            _ => Err(vaultkeeper_core::AppError::validation(format!(
                "Invalid credential category: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_development_hosting_alias() {
        assert_eq!(
            "development hosting".parse::<Category>().unwrap(),
            Category::StagingHosting
        );
    }

    #[test]
    fn test_unknown_is_validation_error() {
        let err = "Database".parse::<Category>().unwrap_err();
        assert_eq!(err.kind, vaultkeeper_core::error::ErrorKind::Validation);
    }
}
