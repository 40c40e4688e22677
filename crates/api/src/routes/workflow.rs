//! Route definitions for the `/workflows` resource: the report sign-off
//! circuit.
//!
//! The static paths (`par_etape`, `rejetes`) are declared before the
//! `{id}` routes; each transition operation has its own endpoint so the
//! role gate and payload shape stay stage-specific.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::workflow;
use crate::state::AppState;

/// Routes mounted at `/workflows`.
///
/// ```text
/// GET    /                                  -> list_workflows
/// POST   /                                  -> create_workflow
/// GET    /par_etape                         -> par_etape
/// GET    /rejetes                           -> rejetes
/// GET    /{id}                              -> get_workflow
/// POST   /{id}/valider_chef_projet          -> valider_chef_projet
/// POST   /{id}/valider_chef_service         -> valider_chef_service
/// POST   /{id}/valider_directeur_technique  -> valider_directeur_technique
/// POST   /{id}/aviser_directeur_snertp      -> aviser_directeur_snertp
/// POST   /{id}/envoyer_client               -> envoyer_client
/// POST   /{id}/renvoyer_validation          -> renvoyer_validation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(workflow::list_workflows).post(workflow::create_workflow),
        )
        .route("/par_etape", get(workflow::par_etape))
        .route("/rejetes", get(workflow::rejetes))
        .route("/{id}", get(workflow::get_workflow))
        .route(
            "/{id}/valider_chef_projet",
            post(workflow::valider_chef_projet),
        )
        .route(
            "/{id}/valider_chef_service",
            post(workflow::valider_chef_service),
        )
        .route(
            "/{id}/valider_directeur_technique",
            post(workflow::valider_directeur_technique),
        )
        .route(
            "/{id}/aviser_directeur_snertp",
            post(workflow::aviser_directeur_snertp),
        )
        .route("/{id}/envoyer_client", post(workflow::envoyer_client))
        .route(
            "/{id}/renvoyer_validation",
            post(workflow::renvoyer_validation),
        )
}
