//! Notification entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use geolab_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    /// Severity: `info`, `success`, `warning` or `error`.
    #[sqlx(rename = "type")]
    pub r#type: String,
    pub title: String,
    pub message: String,
    /// Originating area, e.g. `"workflow"`.
    pub module: String,
    pub action_required: bool,
    pub read: bool,
    pub echantillon_id: Option<DbId>,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub r#type: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub action_required: bool,
    #[serde(default)]
    pub echantillon_id: Option<DbId>,
}
