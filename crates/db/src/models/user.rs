//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use geolab_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub telephone: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Strip the password hash for API output.
    pub fn into_response(self) -> UserResponse {
        UserResponse {
            id: self.id,
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            role: self.role,
            telephone: self.telephone,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    /// Workflow role (e.g. `"chef_projet"`, `"marketing"`, `"admin"`).
    pub role: String,
    pub telephone: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a new user. `password_hash` is already hashed.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub full_name: String,
    pub role: String,
    #[serde(default)]
    pub telephone: String,
}
