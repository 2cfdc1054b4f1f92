//! PostgreSQL repository implementations of the store contracts.

pub mod application;
pub mod audit;
pub mod credential;
pub mod permission;
pub mod user;

pub use application::ApplicationRepository;
pub use audit::AuditLogRepository;
pub use credential::CredentialRepository;
pub use permission::PermissionRepository;
pub use user::UserRepository;
