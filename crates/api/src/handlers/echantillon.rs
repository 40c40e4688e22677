//! Handlers for the `/echantillons` resource.
//!
//! Samples are registered by the reception desk; their generated code
//! (`S-0001/26`) is the handle everything downstream — workflows
//! included — refers to them by.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use geolab_core::echantillon::{
    validate_nature, validate_priorite, validate_profondeurs, validate_sondage, validate_statut,
};
use geolab_core::error::CoreError;
use geolab_core::types::DbId;
use geolab_db::models::echantillon::{CreateEchantillon, Echantillon};
use geolab_db::repositories::{ClientRepo, EchantillonRepo};
use geolab_events::{names, DomainEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /echantillons`.
#[derive(Debug, Deserialize)]
pub struct EchantillonQuery {
    pub statut: Option<String>,
    pub client_id: Option<DbId>,
}

/// Query parameters for `GET /echantillons/par_code`.
#[derive(Debug, Deserialize)]
pub struct ParCodeQuery {
    pub code: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/echantillons
///
/// Register a sample. The code is generated server-side from the nature
/// prefix and a per-year counter; the referenced client must exist.
pub async fn create_echantillon(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateEchantillon>,
) -> AppResult<impl IntoResponse> {
    validate_nature(&input.nature)?;
    validate_sondage(&input.sondage, input.numero_sondage.as_deref())?;
    validate_profondeurs(input.profondeur_debut, input.profondeur_fin)?;
    if let Some(priorite) = input.priorite.as_deref() {
        validate_priorite(priorite)?;
    }

    ClientRepo::find_by_id(&state.pool, input.client_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: input.client_id,
        }))?;

    let echantillon = EchantillonRepo::create(&state.pool, &input, Some(auth.user_id)).await?;

    state.event_bus.publish(
        DomainEvent::new(names::ECHANTILLON_CREE)
            .with_source("echantillon", echantillon.id)
            .with_actor(auth.user_id)
            .with_payload(json!({
                "code": echantillon.code,
                "nature": echantillon.nature,
                "client_id": echantillon.client_id,
            })),
    );

    tracing::info!(
        echantillon_id = %echantillon.id,
        code = %echantillon.code,
        user_id = %auth.user_id,
        "Echantillon registered"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: echantillon })))
}

/// GET /api/v1/echantillons
///
/// List samples with optional `statut` and `client_id` filters.
pub async fn list_echantillons(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<EchantillonQuery>,
) -> AppResult<Json<DataResponse<Vec<Echantillon>>>> {
    if let Some(statut) = params.statut.as_deref() {
        validate_statut(statut)?;
    }

    let echantillons =
        EchantillonRepo::list(&state.pool, params.statut.as_deref(), params.client_id).await?;
    Ok(Json(DataResponse { data: echantillons }))
}

/// GET /api/v1/echantillons/par_code?code=S-0001/26
///
/// Look a sample up by its generated code.
pub async fn par_code(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ParCodeQuery>,
) -> AppResult<Json<DataResponse<Echantillon>>> {
    let echantillon = EchantillonRepo::find_by_code(&state.pool, &params.code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No echantillon with code '{}'", params.code)))?;
    Ok(Json(DataResponse { data: echantillon }))
}

/// GET /api/v1/echantillons/{id}
pub async fn get_echantillon(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Echantillon>>> {
    let echantillon = EchantillonRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Echantillon",
            id,
        }))?;
    Ok(Json(DataResponse { data: echantillon }))
}
