//! Domain event ledger row.

use serde::Serialize;
use sqlx::FromRow;

use geolab_core::types::{DbId, EventId, Timestamp};

/// A row from the append-only `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: EventId,
    /// Dot-separated event name, e.g. `"workflow.valide.chef_projet"`.
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    pub actor_user_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
