//! Access-control policy configuration.

use serde::{Deserialize, Serialize};

/// Visibility policy for standalone credentials (no linked application).
///
/// Standalone credentials have no per-application grant rows, so their
/// visibility cannot come from the resolver. The policy is explicit and
/// configurable rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StandaloneVisibility {
    /// Visible to global Admins, global Managers, and the creator.
    PrivilegedAndCreator,
    /// Visible to global Admins and the creator only.
    CreatorOnly,
}

/// Access-control policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Who may see standalone credentials in listings and reveals.
    #[serde(default = "default_standalone_visibility")]
    pub standalone_visibility: StandaloneVisibility,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            standalone_visibility: default_standalone_visibility(),
        }
    }
}

fn default_standalone_visibility() -> StandaloneVisibility {
    StandaloneVisibility::PrivilegedAndCreator
}
