//! Role-based access control (RBAC) extractors and checks.
//!
//! [`RequireAdmin`] wraps [`AuthUser`] and rejects requests whose role is
//! not `admin`. [`exiger_acteur_etape`] is the per-stage gate for workflow
//! transitions: every stage of the sign-off circuit belongs to exactly one
//! role, and only that role (or an admin) may decide at it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use geolab_core::error::CoreError;
use geolab_core::roles::ROLE_ADMIN;
use geolab_core::workflow::Etape;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Check that `user` may act at `etape`.
///
/// The stage's designated role passes, as does `admin`. Rejects with 403
/// Forbidden otherwise, and for stages that have no internal actor
/// (`client` is terminal).
pub fn exiger_acteur_etape(user: &AuthUser, etape: Etape) -> Result<(), AppError> {
    if user.role == ROLE_ADMIN {
        return Ok(());
    }
    match etape.role_requis() {
        Some(role) if user.role == role => Ok(()),
        Some(role) => Err(AppError::Core(CoreError::Forbidden(format!(
            "Acting at etape '{}' requires the '{role}' role",
            etape.as_str()
        )))),
        None => Err(AppError::Core(CoreError::Forbidden(format!(
            "No one may act at etape '{}'",
            etape.as_str()
        )))),
    }
}
