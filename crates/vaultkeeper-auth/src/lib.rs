//! # vaultkeeper-auth
//!
//! Authorization logic for Vault Access Keeper.
//!
//! ## Modules
//!
//! - `rbac` — global role capability policies and enforcement
//! - `resolver` — effective per-application access resolution

pub mod rbac;
pub mod resolver;

pub use rbac::{RoleEnforcer, RolePolicies, SystemAction};
pub use resolver::{AccessResolver, AccessSource, ResolvedAccess};
