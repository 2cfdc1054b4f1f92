//! # vaultkeeper-core
//!
//! Core crate for Vault Access Keeper. Contains configuration schemas,
//! pagination types, the logging bootstrap, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Vault Access Keeper
//! crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
