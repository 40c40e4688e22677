use crate::types::DbId;

/// Domain-level error taxonomy.
///
/// Precondition violations that the original system left to its UI layer
/// (missing rejection reason, missing signature, acting out of turn) are
/// first-class variants here so the API layer can map each to a distinct
/// HTTP status instead of a collapsed boolean failure.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A state transition guard failed: the workflow moved between the
    /// caller's read and its action, or was never at the expected stage.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
