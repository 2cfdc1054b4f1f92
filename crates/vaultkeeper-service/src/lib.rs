//! # vaultkeeper-service
//!
//! Business logic service layer for Vault Access Keeper. Each service
//! orchestrates the store contracts and the access resolver to implement
//! application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references — and every operation takes
//! the acting user as an explicit [`RequestContext`]; there is no ambient
//! current-user state anywhere.

pub mod application;
pub mod audit;
pub mod context;
pub mod credential;
pub mod grant;
pub mod user;

pub use application::ApplicationService;
pub use audit::AuditService;
pub use context::RequestContext;
pub use credential::CredentialService;
pub use grant::{GrantRequest, GrantService};
pub use user::UserService;
