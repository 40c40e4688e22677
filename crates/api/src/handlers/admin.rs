//! Handlers for the `/admin` resource (user accounts, event ledger).
//!
//! All handlers require the `admin` role via [`RequireAdmin`]. User
//! creation is how the per-role accounts of the sign-off circuit come
//! into existence.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use geolab_core::error::CoreError;
use geolab_core::roles::validate_role;
use geolab_db::models::event::Event;
use geolab_db::models::user::{CreateUser, UserResponse};
use geolab_db::repositories::{EventRepo, UserRepo};
use geolab_events::{names, DomainEvent};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum page size for event ledger listing.
const MAX_EVENT_LIMIT: i64 = 200;

/// Default page size for event ledger listing.
const DEFAULT_EVENT_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    /// One of the workflow roles (`chef_projet`, `marketing`, ...) or `admin`.
    pub role: String,
    #[serde(default)]
    pub telephone: String,
}

/// Filter parameters for `GET /admin/events`.
#[derive(Debug, Deserialize)]
pub struct EventQuery {
    pub event_type: Option<String>,
    pub source_entity_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/users
///
/// Create a user account. Validates the role against the accepted set and
/// the password against the minimum strength, hashes the password, and
/// returns a safe [`UserResponse`] with 201 Created.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    if input.username.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A user requires a non-empty username".to_string(),
        )));
    }
    validate_role(&input.role)?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        username: input.username,
        email: input.email,
        password_hash: hashed,
        full_name: input.full_name,
        role: input.role,
        telephone: input.telephone,
    };
    let user = UserRepo::create(&state.pool, &create_dto).await?;

    state.event_bus.publish(
        DomainEvent::new(names::USER_CREE)
            .with_source("user", user.id)
            .with_actor(admin.user_id)
            .with_payload(json!({ "username": user.username, "role": user.role })),
    );

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        role = %user.role,
        created_by = %admin.user_id,
        "User created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: user.into_response(),
        }),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    let responses: Vec<UserResponse> = users.into_iter().map(|u| u.into_response()).collect();
    Ok(Json(DataResponse { data: responses }))
}

// ---------------------------------------------------------------------------
// Event ledger
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/events
///
/// Page through the domain event ledger, newest first, optionally
/// filtered by `event_type` and/or `source_entity_type`.
pub async fn list_events(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<EventQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let limit = page
        .limit
        .unwrap_or(DEFAULT_EVENT_LIMIT)
        .clamp(1, MAX_EVENT_LIMIT);
    let offset = page.offset.unwrap_or(0).max(0);

    let events = EventRepo::list(
        &state.pool,
        filter.event_type.as_deref(),
        filter.source_entity_type.as_deref(),
        limit,
        offset,
    )
    .await?;

    Ok(Json(DataResponse { data: events }))
}
