//! Report validation workflow entity model, DTOs and transition requests.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use geolab_core::types::{DbId, Timestamp};

/// A row from the `workflow_validations` table.
///
/// One row per report circulating through the sign-off circuit. The
/// per-stage decision flags obey the invariant that at most one of
/// `validation_*` / `rejet_*` is true per stage; the transition
/// repository resets the counterpart flag on every decision.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowValidation {
    pub id: DbId,
    pub echantillon_id: DbId,
    pub code_echantillon: String,
    pub client_id: Option<DbId>,
    pub client_name: String,

    pub file_name: String,
    pub file_data: String,

    pub etape_actuelle: String,
    pub statut: String,

    pub observations_traitement: String,

    pub validation_chef_projet: bool,
    pub rejet_chef_projet: bool,
    pub commentaire_chef_projet: String,
    pub date_envoi_chef_projet: Option<Timestamp>,
    pub date_validation_chef_projet: Option<Timestamp>,

    pub validation_chef_service: bool,
    pub rejet_chef_service: bool,
    pub commentaire_chef_service: String,
    pub date_envoi_chef_service: Option<Timestamp>,
    pub date_validation_chef_service: Option<Timestamp>,

    pub validation_directeur_technique: bool,
    pub rejet_directeur_technique: bool,
    pub commentaire_directeur_technique: String,
    pub date_envoi_directeur_technique: Option<Timestamp>,
    pub date_validation_directeur_technique: Option<Timestamp>,

    pub avise_directeur_snertp: bool,
    pub observations_directeur_snertp: String,
    pub signature_directeur_snertp: String,
    pub date_envoi_directeur_snertp: Option<Timestamp>,
    pub date_validation_directeur_snertp: Option<Timestamp>,

    pub processed_by_marketing: bool,
    pub email_client: String,
    pub date_envoi_marketing: Option<Timestamp>,
    pub date_envoi_client: Option<Timestamp>,

    pub raison_rejet: String,
    pub date_rejet: Option<Timestamp>,

    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create / transition DTOs
// ---------------------------------------------------------------------------

/// DTO for opening a workflow: a report enters the circuit at the
/// chef de projet stage.
#[derive(Debug, Deserialize)]
pub struct CreateWorkflow {
    pub echantillon_id: DbId,
    #[serde(default)]
    pub file_name: String,
    /// Report document, opaque base64.
    #[serde(default)]
    pub file_data: String,
    #[serde(default)]
    pub observations_traitement: String,
}

/// Request body for the three `valider_*` stage decisions.
#[derive(Debug, Deserialize)]
pub struct ValiderRequest {
    /// `"accepter"` or `"rejeter"`.
    pub action: String,
    /// Stage comment; doubles as the mandatory reason on rejection.
    #[serde(default)]
    pub comment: String,
}

/// Request body for the SNERTP director's advisory.
#[derive(Debug, Deserialize)]
pub struct AviserRequest {
    #[serde(default)]
    pub observations: String,
    /// Signature artifact, opaque base64. Mandatory.
    #[serde(default)]
    pub signature: String,
}

/// Request body for the marketing dispatch to the client.
#[derive(Debug, Deserialize)]
pub struct EnvoyerClientRequest {
    #[serde(default)]
    pub email_client: String,
}

/// Request body for resubmitting a rejected report into the circuit.
#[derive(Debug, Deserialize)]
pub struct RenvoyerRequest {
    #[serde(default)]
    pub observations: String,
    /// Optional replacement report document.
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_data: Option<String>,
}
