//! Repository for the `echantillons` table.

use chrono::Datelike;
use sqlx::PgPool;

use geolab_core::echantillon::{formater_code, prefixe_nature, PRIORITE_NORMALE};
use geolab_core::types::DbId;

use crate::models::echantillon::{CreateEchantillon, Echantillon};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, client_id, nature, profondeur_debut, profondeur_fin, \
                       sondage, numero_sondage, nappe, statut, priorite, chef_projet, \
                       date_reception, date_envoi_essais, created_by, created_at, updated_at";

/// Provides CRUD operations for samples.
pub struct EchantillonRepo;

impl EchantillonRepo {
    /// Register a new sample with a generated code.
    ///
    /// The code counter is per nature-prefix and per two-digit year
    /// (`S-0001/26`, `G-0001/26`, ...). The counter read and the insert
    /// share a transaction; `uq_echantillons_code` backs the rare case of
    /// two registrations racing to the same number, surfacing the loser
    /// as a unique violation.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEchantillon,
        created_by: Option<DbId>,
    ) -> Result<Echantillon, sqlx::Error> {
        let annee = chrono::Utc::now().year();
        let prefix = prefixe_nature(&input.nature);

        let mut tx = pool.begin().await?;

        let last: i32 = sqlx::query_scalar(
            "SELECT coalesce(max((split_part(split_part(code, '-', 2), '/', 1))::int), 0)
             FROM echantillons
             WHERE code LIKE $1 AND code LIKE $2",
        )
        .bind(format!("{prefix}-%"))
        .bind(format!("%/{:02}", annee.rem_euclid(100)))
        .fetch_one(&mut *tx)
        .await?;

        let code = formater_code(&input.nature, (last + 1) as u32, annee);

        let query = format!(
            "INSERT INTO echantillons
                (code, client_id, nature, profondeur_debut, profondeur_fin, sondage,
                 numero_sondage, nappe, priorite, chef_projet, date_reception, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, CURRENT_DATE), $12)
             RETURNING {COLUMNS}"
        );
        let echantillon = sqlx::query_as::<_, Echantillon>(&query)
            .bind(&code)
            .bind(input.client_id)
            .bind(&input.nature)
            .bind(input.profondeur_debut)
            .bind(input.profondeur_fin)
            .bind(&input.sondage)
            .bind(input.numero_sondage.as_deref().unwrap_or(""))
            .bind(&input.nappe)
            .bind(input.priorite.as_deref().unwrap_or(PRIORITE_NORMALE))
            .bind(&input.chef_projet)
            .bind(input.date_reception)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(echantillon)
    }

    /// Find a sample by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Echantillon>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM echantillons WHERE id = $1");
        sqlx::query_as::<_, Echantillon>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a sample by its generated code.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Echantillon>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM echantillons WHERE code = $1");
        sqlx::query_as::<_, Echantillon>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List samples, optionally filtered by status and/or client.
    pub async fn list(
        pool: &PgPool,
        statut: Option<&str>,
        client_id: Option<DbId>,
    ) -> Result<Vec<Echantillon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM echantillons
             WHERE ($1::text IS NULL OR statut = $1)
               AND ($2::uuid IS NULL OR client_id = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Echantillon>(&query)
            .bind(statut)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }
}
