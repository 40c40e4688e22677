//! Client entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use geolab_core::types::{DbId, Timestamp};

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    /// Generated client code (`CLI-001`, `CLI-002`, ...).
    pub code: String,
    pub nom: String,
    pub projet: String,
    pub contact: String,
    pub telephone: String,
    pub email: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new client. The code is generated server-side.
#[derive(Debug, Deserialize)]
pub struct CreateClient {
    pub nom: String,
    #[serde(default)]
    pub projet: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub email: String,
}
