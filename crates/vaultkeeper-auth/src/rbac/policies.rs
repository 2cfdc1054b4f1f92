//! Role-to-capability mapping definitions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use vaultkeeper_entity::user::UserRole;

/// A system-wide action gated by the global role (distinct from
/// per-application access, which the resolver governs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemAction {
    /// Create users, change roles, delete users.
    ManageUsers,
    /// Read the user directory (needed to pick grantees).
    ReadUsers,
    /// Create a new application.
    CreateApplication,
    /// Create a credential not linked to any application.
    CreateStandaloneCredential,
    /// Search the audit log.
    ViewAuditLog,
}

/// Defines the mapping from each global role to its allowed system actions.
#[derive(Debug, Clone)]
pub struct RolePolicies {
    policies: HashMap<UserRole, HashSet<SystemAction>>,
}

impl RolePolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        // Viewer: no system-wide capabilities; per-application visibility
        // still comes from explicit grants.
        policies.insert(UserRole::Viewer, HashSet::new());

        // Manager: can build out the vault but not administer people.
        let manager: HashSet<SystemAction> = [
            SystemAction::ReadUsers,
            SystemAction::CreateApplication,
            SystemAction::CreateStandaloneCredential,
        ]
        .into_iter()
        .collect();
        policies.insert(UserRole::Manager, manager);

        // Admin: everything.
        let admin: HashSet<SystemAction> = [
            SystemAction::ManageUsers,
            SystemAction::ReadUsers,
            SystemAction::CreateApplication,
            SystemAction::CreateStandaloneCredential,
            SystemAction::ViewAuditLog,
        ]
        .into_iter()
        .collect();
        policies.insert(UserRole::Admin, admin);

        Self { policies }
    }

    /// Checks whether the given role may perform the specified action.
    pub fn allows(&self, role: &UserRole, action: &SystemAction) -> bool {
        self.policies
            .get(role)
            .map(|actions| actions.contains(action))
            .unwrap_or(false)
    }

    /// Returns the set of actions for the given role.
    pub fn actions_for_role(&self, role: &UserRole) -> HashSet<SystemAction> {
        self.policies.get(role).cloned().unwrap_or_default()
    }
}

impl Default for RolePolicies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_cannot_manage_users() {
        let policies = RolePolicies::new();
        assert!(policies.allows(&UserRole::Admin, &SystemAction::ManageUsers));
        assert!(!policies.allows(&UserRole::Manager, &SystemAction::ManageUsers));
        assert!(policies.allows(&UserRole::Manager, &SystemAction::CreateApplication));
    }

    #[test]
    fn test_viewer_has_no_system_actions() {
        let policies = RolePolicies::new();
        assert!(policies.actions_for_role(&UserRole::Viewer).is_empty());
    }
}
