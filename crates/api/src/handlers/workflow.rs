//! Handlers for the `/workflows` resource: the report sign-off circuit.
//!
//! The three comment stages (`chef_projet`, `chef_service`,
//! `directeur_technique`) share one decision path; the SNERTP advisory
//! and the marketing dispatch each have a dedicated operation. Every
//! transition handler re-checks the precondition on the row it read so a
//! stale caller gets a descriptive 409; the conditional UPDATE in the
//! repository stays authoritative when two actors race.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use geolab_core::error::CoreError;
use geolab_core::notification::{TYPE_INFO, TYPE_SUCCESS, TYPE_WARNING};
use geolab_core::types::DbId;
use geolab_core::workflow::{self, Decision, Etape, Statut};
use geolab_db::models::workflow::{
    AviserRequest, CreateWorkflow, EnvoyerClientRequest, RenvoyerRequest, ValiderRequest,
    WorkflowValidation,
};
use geolab_db::repositories::{ClientRepo, EchantillonRepo, WorkflowRepo};
use geolab_events::{names, DomainEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::exiger_acteur_etape;
use crate::notify;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /workflows`.
///
/// Filter names are the workflow record's own field names
/// (`etape_actuelle`, `statut`, `code_echantillon`), as clients of the
/// store have always sent them.
#[derive(Debug, Deserialize)]
pub struct WorkflowQuery {
    pub etape_actuelle: Option<String>,
    pub statut: Option<String>,
    pub code_echantillon: Option<String>,
}

/// Query parameters for `GET /workflows/par_etape`.
#[derive(Debug, Deserialize)]
pub struct ParEtapeQuery {
    pub etape: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a workflow or fail with 404.
async fn fetch_workflow(pool: &sqlx::PgPool, id: DbId) -> AppResult<WorkflowValidation> {
    WorkflowRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workflow",
            id,
        }))
}

/// The conditional UPDATE matched nothing: the row moved between the
/// precondition check and the write.
fn conflict_concurrent() -> AppError {
    AppError::Core(CoreError::Conflict(
        "Workflow state changed concurrently, no transition was applied".into(),
    ))
}

/// Publish a workflow event on the bus.
fn publier(
    state: &AppState,
    event_type: impl Into<String>,
    workflow: &WorkflowValidation,
    actor: DbId,
    payload: serde_json::Value,
) {
    state.event_bus.publish(
        DomainEvent::new(event_type)
            .with_source("workflow", workflow.id)
            .with_actor(actor)
            .with_payload(payload),
    );
}

/// Fan a stage-arrival notification out to the stage's role holders.
///
/// Best-effort: the transition already committed, a fan-out failure is
/// logged instead of failing the request.
async fn notifier(
    state: &AppState,
    etape: Etape,
    type_notification: &str,
    title: &str,
    message: &str,
    workflow: &WorkflowValidation,
) {
    let Some(role) = etape.role_requis() else {
        return;
    };
    if let Err(e) = notify::notifier_role(
        &state.pool,
        role,
        type_notification,
        title,
        message,
        Some(workflow.echantillon_id),
    )
    .await
    {
        tracing::error!(error = %e, workflow_id = %workflow.id, "Notification fan-out failed");
    }
}

// ---------------------------------------------------------------------------
// Listing / read
// ---------------------------------------------------------------------------

/// GET /api/v1/workflows
///
/// List workflows with optional `etape_actuelle`, `statut` and
/// `code_echantillon` filters.
pub async fn list_workflows(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<WorkflowQuery>,
) -> AppResult<Json<DataResponse<Vec<WorkflowValidation>>>> {
    if let Some(etape) = params.etape_actuelle.as_deref() {
        Etape::parse(etape)?;
    }
    if let Some(statut) = params.statut.as_deref() {
        Statut::parse(statut)?;
    }

    let workflows = WorkflowRepo::list(
        &state.pool,
        params.etape_actuelle.as_deref(),
        params.statut.as_deref(),
        params.code_echantillon.as_deref(),
    )
    .await?;

    Ok(Json(DataResponse { data: workflows }))
}

/// GET /api/v1/workflows/par_etape
///
/// The pending work list: workflows awaiting a decision, optionally
/// restricted to one stage.
pub async fn par_etape(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ParEtapeQuery>,
) -> AppResult<Json<DataResponse<Vec<WorkflowValidation>>>> {
    if let Some(etape) = params.etape.as_deref() {
        Etape::parse(etape)?;
    }

    let workflows = WorkflowRepo::par_etape(&state.pool, params.etape.as_deref()).await?;
    Ok(Json(DataResponse { data: workflows }))
}

/// GET /api/v1/workflows/rejetes
///
/// Rejected workflows sitting at the rework stage, newest rejection first.
pub async fn rejetes(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<WorkflowValidation>>>> {
    let workflows = WorkflowRepo::rejetes(&state.pool).await?;
    Ok(Json(DataResponse { data: workflows }))
}

/// GET /api/v1/workflows/{id}
pub async fn get_workflow(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkflowValidation>>> {
    let workflow = fetch_workflow(&state.pool, id).await?;
    Ok(Json(DataResponse { data: workflow }))
}

// ---------------------------------------------------------------------------
// Opening
// ---------------------------------------------------------------------------

/// POST /api/v1/workflows
///
/// Open a workflow: the report enters the circuit at `chef_projet` and
/// the sample moves to the `validation` status. Requires the sample to
/// exist and to have no other active workflow.
pub async fn create_workflow(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateWorkflow>,
) -> AppResult<impl IntoResponse> {
    let echantillon = EchantillonRepo::find_by_id(&state.pool, input.echantillon_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Echantillon",
            id: input.echantillon_id,
        }))?;

    if let Some(actif) =
        WorkflowRepo::find_active_by_echantillon(&state.pool, echantillon.id).await?
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Echantillon '{}' already has an active workflow at etape '{}'",
            echantillon.code, actif.etape_actuelle
        ))));
    }

    let client = ClientRepo::find_by_id(&state.pool, echantillon.client_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: echantillon.client_id,
        }))?;

    let workflow = WorkflowRepo::create(
        &state.pool,
        &input,
        &echantillon,
        &client.nom,
        Some(auth.user_id),
    )
    .await?;

    publier(
        &state,
        names::WORKFLOW_CREE,
        &workflow,
        auth.user_id,
        json!({
            "code_echantillon": workflow.code_echantillon,
            "etape": workflow.etape_actuelle,
        }),
    );
    notifier(
        &state,
        Etape::ChefProjet,
        TYPE_INFO,
        "Nouveau rapport à valider",
        &format!(
            "Le rapport de l'échantillon {} attend la validation du chef de projet.",
            workflow.code_echantillon
        ),
        &workflow,
    )
    .await;

    tracing::info!(
        workflow_id = %workflow.id,
        code_echantillon = %workflow.code_echantillon,
        user_id = %auth.user_id,
        "Workflow opened"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: workflow })))
}

// ---------------------------------------------------------------------------
// Stage decisions
// ---------------------------------------------------------------------------

/// POST /api/v1/workflows/{id}/valider_chef_projet
pub async fn valider_chef_projet(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ValiderRequest>,
) -> AppResult<Json<DataResponse<WorkflowValidation>>> {
    valider_etape(state, auth, id, Etape::ChefProjet, input).await
}

/// POST /api/v1/workflows/{id}/valider_chef_service
pub async fn valider_chef_service(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ValiderRequest>,
) -> AppResult<Json<DataResponse<WorkflowValidation>>> {
    valider_etape(state, auth, id, Etape::ChefService, input).await
}

/// POST /api/v1/workflows/{id}/valider_directeur_technique
pub async fn valider_directeur_technique(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ValiderRequest>,
) -> AppResult<Json<DataResponse<WorkflowValidation>>> {
    valider_etape(state, auth, id, Etape::DirecteurTechnique, input).await
}

/// Shared path for the three comment-stage decisions.
///
/// Order of checks: role gate, action wellformedness (a rejection needs
/// a reason), existence (404), precondition on the row as read
/// (descriptive 409), then the conditional UPDATE.
async fn valider_etape(
    state: AppState,
    auth: AuthUser,
    id: DbId,
    etape: Etape,
    input: ValiderRequest,
) -> AppResult<Json<DataResponse<WorkflowValidation>>> {
    exiger_acteur_etape(&auth, etape)?;

    let decision = Decision::parse(&input.action)?;
    if decision == Decision::Rejeter {
        workflow::valider_motif_rejet(&input.comment)?;
    }

    let courant = fetch_workflow(&state.pool, id).await?;
    workflow::verifier_transition(&courant.etape_actuelle, &courant.statut, etape)?;

    let updated = WorkflowRepo::valider(&state.pool, id, etape, decision, &input.comment)
        .await?
        .ok_or_else(conflict_concurrent)?;

    match decision {
        Decision::Accepter => {
            publier(
                &state,
                names::workflow_valide(etape),
                &updated,
                auth.user_id,
                json!({
                    "code_echantillon": updated.code_echantillon,
                    "etape": etape.as_str(),
                    "comment": input.comment,
                }),
            );
            if let Some(suivante) = etape.suivante() {
                notifier(
                    &state,
                    suivante,
                    TYPE_SUCCESS,
                    "Rapport en attente de validation",
                    &format!(
                        "Le rapport de l'échantillon {} est arrivé à l'étape '{}'.",
                        updated.code_echantillon,
                        suivante.as_str()
                    ),
                    &updated,
                )
                .await;
            }
        }
        Decision::Rejeter => {
            publier(
                &state,
                names::workflow_rejete(etape),
                &updated,
                auth.user_id,
                json!({
                    "code_echantillon": updated.code_echantillon,
                    "etape": etape.as_str(),
                    "raison_rejet": input.comment,
                }),
            );
            if let Some(cible) = etape.cible_rejet() {
                notifier(
                    &state,
                    cible,
                    TYPE_WARNING,
                    "Rapport rejeté",
                    &format!(
                        "Le rapport de l'échantillon {} a été rejeté à l'étape '{}' : {}",
                        updated.code_echantillon,
                        etape.as_str(),
                        input.comment
                    ),
                    &updated,
                )
                .await;
            }
        }
    }

    tracing::info!(
        workflow_id = %id,
        etape = etape.as_str(),
        action = %input.action,
        user_id = %auth.user_id,
        "Workflow decision applied"
    );

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Advisory and dispatch
// ---------------------------------------------------------------------------

/// POST /api/v1/workflows/{id}/aviser_directeur_snertp
///
/// Record the SNERTP director's advisory (observations + mandatory
/// signature) and hand the workflow over to marketing.
pub async fn aviser_directeur_snertp(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AviserRequest>,
) -> AppResult<Json<DataResponse<WorkflowValidation>>> {
    exiger_acteur_etape(&auth, Etape::DirecteurSnertp)?;
    workflow::valider_signature(&input.signature)?;

    let courant = fetch_workflow(&state.pool, id).await?;
    workflow::verifier_transition(&courant.etape_actuelle, &courant.statut, Etape::DirecteurSnertp)?;

    let updated =
        WorkflowRepo::aviser_directeur_snertp(&state.pool, id, &input.observations, &input.signature)
            .await?
            .ok_or_else(conflict_concurrent)?;

    publier(
        &state,
        names::WORKFLOW_AVISE,
        &updated,
        auth.user_id,
        json!({
            "code_echantillon": updated.code_echantillon,
            "observations": input.observations,
        }),
    );
    notifier(
        &state,
        Etape::Marketing,
        TYPE_SUCCESS,
        "Rapport avisé",
        &format!(
            "Le rapport de l'échantillon {} a été avisé par le directeur SNERTP et attend l'envoi au client.",
            updated.code_echantillon
        ),
        &updated,
    )
    .await;

    tracing::info!(workflow_id = %id, user_id = %auth.user_id, "Workflow advisory recorded");

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/workflows/{id}/envoyer_client
///
/// Terminal transition: marketing dispatches the report to the client.
pub async fn envoyer_client(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EnvoyerClientRequest>,
) -> AppResult<Json<DataResponse<WorkflowValidation>>> {
    exiger_acteur_etape(&auth, Etape::Marketing)?;
    workflow::valider_email_client(&input.email_client)?;

    let courant = fetch_workflow(&state.pool, id).await?;
    workflow::verifier_transition(&courant.etape_actuelle, &courant.statut, Etape::Marketing)?;

    let updated = WorkflowRepo::envoyer_client(&state.pool, id, &input.email_client)
        .await?
        .ok_or_else(conflict_concurrent)?;

    publier(
        &state,
        names::WORKFLOW_ENVOYE_CLIENT,
        &updated,
        auth.user_id,
        json!({
            "code_echantillon": updated.code_echantillon,
            "email_client": input.email_client,
        }),
    );

    // The circuit is closed; tell the author rather than a stage role.
    if let Some(author) = updated.created_by {
        if let Err(e) = notify::notifier_user(
            &state.pool,
            author,
            TYPE_SUCCESS,
            "Rapport envoyé au client",
            &format!(
                "Le rapport de l'échantillon {} a été envoyé à {}.",
                updated.code_echantillon, input.email_client
            ),
            Some(updated.echantillon_id),
        )
        .await
        {
            tracing::error!(error = %e, workflow_id = %id, "Notification fan-out failed");
        }
    }

    tracing::info!(
        workflow_id = %id,
        email_client = %input.email_client,
        user_id = %auth.user_id,
        "Workflow report dispatched to client"
    );

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Resubmission
// ---------------------------------------------------------------------------

/// POST /api/v1/workflows/{id}/renvoyer_validation
///
/// Resubmit a rejected report into the circuit at `chef_projet`,
/// optionally replacing the attached document.
pub async fn renvoyer_validation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RenvoyerRequest>,
) -> AppResult<Json<DataResponse<WorkflowValidation>>> {
    exiger_acteur_etape(&auth, Etape::Traitement)?;

    let courant = fetch_workflow(&state.pool, id).await?;
    workflow::verifier_renvoi(&courant.etape_actuelle, &courant.statut)?;

    let updated = WorkflowRepo::renvoyer_validation(&state.pool, id, &input)
        .await?
        .ok_or_else(conflict_concurrent)?;

    publier(
        &state,
        names::WORKFLOW_RENVOYE,
        &updated,
        auth.user_id,
        json!({
            "code_echantillon": updated.code_echantillon,
            "observations": input.observations,
        }),
    );
    notifier(
        &state,
        Etape::ChefProjet,
        TYPE_INFO,
        "Rapport resoumis",
        &format!(
            "Le rapport corrigé de l'échantillon {} attend la validation du chef de projet.",
            updated.code_echantillon
        ),
        &updated,
    )
    .await;

    tracing::info!(
        workflow_id = %id,
        user_id = %auth.user_id,
        "Workflow resubmitted into the circuit"
    );

    Ok(Json(DataResponse { data: updated }))
}
