//! Sample (echantillon) entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use geolab_core::types::{DbId, Timestamp};

/// A row from the `echantillons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Echantillon {
    pub id: DbId,
    /// Generated sample code (`S-0001/26` for the first soil sample of 2026).
    pub code: String,
    pub client_id: DbId,
    pub nature: String,
    pub profondeur_debut: f64,
    pub profondeur_fin: f64,
    pub sondage: String,
    pub numero_sondage: String,
    pub nappe: String,
    pub statut: String,
    pub priorite: String,
    /// Display name of the project lead in charge of the sample.
    pub chef_projet: String,
    pub date_reception: NaiveDate,
    pub date_envoi_essais: Option<NaiveDate>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new sample. The code is generated server-side.
#[derive(Debug, Deserialize)]
pub struct CreateEchantillon {
    pub client_id: DbId,
    pub nature: String,
    pub profondeur_debut: f64,
    pub profondeur_fin: f64,
    pub sondage: String,
    #[serde(default)]
    pub numero_sondage: Option<String>,
    #[serde(default)]
    pub nappe: String,
    #[serde(default)]
    pub priorite: Option<String>,
    #[serde(default)]
    pub chef_projet: String,
    /// Defaults to today when omitted.
    #[serde(default)]
    pub date_reception: Option<NaiveDate>,
}
