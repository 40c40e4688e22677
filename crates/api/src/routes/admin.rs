//! Route definitions for the `/admin` resource (users, event ledger).

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All handlers require the `admin` role.
///
/// ```text
/// GET    /users    -> list_users
/// POST   /users    -> create_user
/// GET    /events   -> list_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route("/events", get(admin::list_events))
}
