//! The `{ "data": ... }` response envelope.
//!
//! Every successful endpoint -- workflow listings, transition results,
//! notification feeds -- returns its payload under a `data` key, mirroring
//! the `{ "error", "code" }` envelope that [`AppError`] produces on
//! failure. Wrap payloads in [`DataResponse`] instead of an ad-hoc
//! `serde_json::json!` so the shape is typed.
//!
//! [`AppError`]: crate::error::AppError

use serde::Serialize;

/// Standard `{ "data": T }` success envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: workflows }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
