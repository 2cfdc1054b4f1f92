//! Role-based access control for system-wide actions.

pub mod enforcer;
pub mod policies;

pub use enforcer::RoleEnforcer;
pub use policies::{RolePolicies, SystemAction};
