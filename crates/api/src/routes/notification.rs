//! Route definitions for the `/notifications` resource.
//!
//! The static `marquer_toutes_lues` path is declared before the `{id}`
//! route so it is not captured as an id.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /                      -> list_notifications
/// GET    /non_lues              -> non_lues
/// POST   /marquer_toutes_lues   -> marquer_toutes_lues
/// POST   /{id}/marquer_lue      -> marquer_lue
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list_notifications))
        .route("/non_lues", get(notification::non_lues))
        .route(
            "/marquer_toutes_lues",
            post(notification::marquer_toutes_lues),
        )
        .route("/{id}/marquer_lue", post(notification::marquer_lue))
}
