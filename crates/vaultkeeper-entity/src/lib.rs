//! # vaultkeeper-entity
//!
//! Domain entity models for Vault Access Keeper. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod application;
pub mod audit;
pub mod credential;
pub mod permission;
pub mod user;
