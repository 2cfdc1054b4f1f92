//! # vaultkeeper-database
//!
//! Persistence layer for Vault Access Keeper: the store contract traits the
//! core consumes, their PostgreSQL implementations, and an in-memory
//! implementation for single-node and test use.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{ApplicationStore, AuditLogStore, CredentialStore, PermissionStore, UserStore};
