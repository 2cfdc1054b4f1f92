//! Per-application permission domain entities.

pub mod access;
pub mod model;

pub use access::{AccessLevel, ApplicationPermission};
pub use model::{ApplicationGrant, CategoryPermission, GranteeView, UserGrantView};
