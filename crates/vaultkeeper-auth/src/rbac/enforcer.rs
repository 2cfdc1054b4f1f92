//! RBAC enforcement — checks whether a role may perform a system action.

use vaultkeeper_core::error::AppError;
use vaultkeeper_entity::user::UserRole;

use super::policies::{RolePolicies, SystemAction};

/// Enforces role-based access control for system-wide operations.
#[derive(Debug, Clone)]
pub struct RoleEnforcer {
    policies: RolePolicies,
}

impl RoleEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self {
            policies: RolePolicies::new(),
        }
    }

    /// Creates an enforcer with custom policies.
    pub fn with_policies(policies: RolePolicies) -> Self {
        Self { policies }
    }

    /// Checks whether the given role may perform the action.
    ///
    /// Returns `Ok(())` if allowed, or a `Forbidden` error if denied.
    pub fn require(&self, role: &UserRole, action: &SystemAction) -> Result<(), AppError> {
        if self.policies.allows(role, action) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role '{role}' may not perform '{action:?}'"
            )))
        }
    }

    /// Checks whether the role may perform the action (returns bool).
    pub fn allows(&self, role: &UserRole, action: &SystemAction) -> bool {
        self.policies.allows(role, action)
    }

    /// Checks whether the given role is at least the specified minimum role.
    ///
    /// Role hierarchy: Admin > Manager > Viewer.
    pub fn require_minimum_role(
        &self,
        actual_role: &UserRole,
        minimum_role: &UserRole,
    ) -> Result<(), AppError> {
        if actual_role.has_at_least(minimum_role) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role '{actual_role}' is insufficient; minimum required: '{minimum_role}'"
            )))
        }
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RolePolicies {
        &self.policies
    }
}

impl Default for RoleEnforcer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_denies_with_forbidden() {
        let enforcer = RoleEnforcer::new();
        let err = enforcer
            .require(&UserRole::Viewer, &SystemAction::CreateApplication)
            .unwrap_err();
        assert!(err.is_forbidden());
    }

    #[test]
    fn test_minimum_role() {
        let enforcer = RoleEnforcer::new();
        assert!(
            enforcer
                .require_minimum_role(&UserRole::Admin, &UserRole::Manager)
                .is_ok()
        );
        assert!(
            enforcer
                .require_minimum_role(&UserRole::Viewer, &UserRole::Manager)
                .is_err()
        );
    }
}
