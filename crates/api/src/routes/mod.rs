pub mod admin;
pub mod auth;
pub mod client;
pub mod echantillon;
pub mod health;
pub mod notification;
pub mod workflow;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
///
/// /admin/users                                     list, create (admin only)
/// /admin/events                                    domain event ledger (admin only)
///
/// /clients                                         list, create
/// /clients/{id}                                    get
///
/// /echantillons                                    list (?statut, ?client_id), create
/// /echantillons/par_code                           lookup by generated code (?code=)
/// /echantillons/{id}                               get
///
/// /workflows                                       list (?etape_actuelle, ?statut, ?code_echantillon), create
/// /workflows/par_etape                             pending work list (?etape=)
/// /workflows/rejetes                               rejected, awaiting rework
/// /workflows/{id}                                  get
/// /workflows/{id}/valider_chef_projet              accept/reject decision (POST)
/// /workflows/{id}/valider_chef_service             accept/reject decision (POST)
/// /workflows/{id}/valider_directeur_technique      accept/reject decision (POST)
/// /workflows/{id}/aviser_directeur_snertp          advisory + signature (POST)
/// /workflows/{id}/envoyer_client                   terminal dispatch (POST)
/// /workflows/{id}/renvoyer_validation              resubmit after rejection (POST)
///
/// /notifications                                   list (auth user's)
/// /notifications/non_lues                          unread only
/// /notifications/{id}/marquer_lue                  mark read (POST)
/// /notifications/marquer_toutes_lues               mark all read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (login is the only public route).
        .nest("/auth", auth::router())
        // Admin: user accounts and the event ledger.
        .nest("/admin", admin::router())
        // Clients and the samples they send in.
        .nest("/clients", client::router())
        .nest("/echantillons", echantillon::router())
        // The report sign-off circuit.
        .nest("/workflows", workflow::router())
        // Per-user notification feed.
        .nest("/notifications", notification::router())
}
