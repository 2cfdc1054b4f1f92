//! Application entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A logical grouping of related credentials (one deployed service).
///
/// `created_by` is informational only; mutation rights come from the
/// permission model, never from creator identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    /// Unique application identifier.
    pub id: Uuid,
    /// Application name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// The user who created this application.
    pub created_by: Uuid,
    /// When the application was created.
    pub created_at: DateTime<Utc>,
    /// When the application was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplication {
    /// Application name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Data for updating an existing application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateApplication {
    /// New name, if changed.
    pub name: Option<String>,
    /// New description, if changed.
    pub description: Option<String>,
}
