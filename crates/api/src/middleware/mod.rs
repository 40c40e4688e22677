//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::exiger_acteur_etape`] -- Requires the role designated to act
//!   at a given workflow stage (admin always passes).

pub mod auth;
pub mod rbac;
