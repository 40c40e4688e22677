//! Route definitions for the `/echantillons` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::echantillon;
use crate::state::AppState;

/// Routes mounted at `/echantillons`.
///
/// ```text
/// GET    /           -> list_echantillons
/// POST   /           -> create_echantillon
/// GET    /par_code   -> par_code (?code=S-0001/26)
/// GET    /{id}       -> get_echantillon
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(echantillon::list_echantillons).post(echantillon::create_echantillon),
        )
        .route("/par_code", get(echantillon::par_code))
        .route("/{id}", get(echantillon::get_echantillon))
}
