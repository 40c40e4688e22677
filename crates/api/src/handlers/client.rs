//! Handlers for the `/clients` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use validator::ValidateEmail;

use geolab_core::error::CoreError;
use geolab_core::types::DbId;
use geolab_db::models::client::{Client, CreateClient};
use geolab_db::repositories::ClientRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/clients
///
/// Register a client. The `CLI-nnn` code is generated server-side.
pub async fn create_client(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateClient>,
) -> AppResult<impl IntoResponse> {
    if input.nom.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A client requires a non-empty nom".to_string(),
        )));
    }
    // The contact email is optional, but a provided one must be well-formed.
    if !input.email.is_empty() && !input.email.validate_email() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "'{}' is not a valid email address",
            input.email
        ))));
    }

    let client = ClientRepo::create(&state.pool, &input, Some(auth.user_id)).await?;

    state.event_bus.publish(
        geolab_events::DomainEvent::new(geolab_events::names::CLIENT_CREE)
            .with_source("client", client.id)
            .with_actor(auth.user_id)
            .with_payload(json!({ "code": client.code, "nom": client.nom })),
    );

    tracing::info!(
        client_id = %client.id,
        code = %client.code,
        user_id = %auth.user_id,
        "Client registered"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: client })))
}

/// GET /api/v1/clients
pub async fn list_clients(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Client>>>> {
    let clients = ClientRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: clients }))
}

/// GET /api/v1/clients/{id}
pub async fn get_client(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Client>>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id,
        }))?;
    Ok(Json(DataResponse { data: client }))
}
