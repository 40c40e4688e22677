//! Handlers for the `/notifications` resource.
//!
//! Notifications are scoped to the authenticated user; there is no way to
//! read or mark another user's rows.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use geolab_core::error::CoreError;
use geolab_core::types::DbId;
use geolab_db::models::notification::Notification;
use geolab_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/notifications
///
/// The authenticated user's notifications, newest first.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = NotificationRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// GET /api/v1/notifications/non_lues
///
/// The authenticated user's unread notifications, newest first.
pub async fn non_lues(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = NotificationRepo::list_unread_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// POST /api/v1/notifications/{id}/marquer_lue
///
/// Mark one notification as read. 204 on success; 404 when the row does
/// not exist, belongs to someone else, or was already read.
pub async fn marquer_lue(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let marked = NotificationRepo::mark_read(&state.pool, id, auth.user_id).await?;
    if !marked {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/marquer_toutes_lues
///
/// Mark every unread notification as read, returning the count swept.
pub async fn marquer_toutes_lues(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    Ok(Json(serde_json::json!({
        "data": { "marquees_lues": count }
    })))
}
