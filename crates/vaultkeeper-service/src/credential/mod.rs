//! The credential access gate.

pub mod service;

pub use service::CredentialService;
