//! Repository for the `workflow_validations` table.
//!
//! Every transition is a single conditional UPDATE whose WHERE clause
//! names the expected stage and status. Two actors racing on the same
//! workflow serialize at the row: the loser's UPDATE matches nothing,
//! `fetch_optional` returns `None`, and no state changes. Transitions
//! that also move the sample status run inside a transaction.

use sqlx::PgPool;

use geolab_core::echantillon::{STATUT_TRAITEMENT, STATUT_VALIDATION, STATUT_VALIDE};
use geolab_core::types::DbId;
use geolab_core::workflow::{Decision, Etape};

use crate::models::echantillon::Echantillon;
use crate::models::workflow::{CreateWorkflow, RenvoyerRequest, WorkflowValidation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, echantillon_id, code_echantillon, client_id, client_name, \
    file_name, file_data, etape_actuelle, statut, observations_traitement, \
    validation_chef_projet, rejet_chef_projet, commentaire_chef_projet, \
    date_envoi_chef_projet, date_validation_chef_projet, \
    validation_chef_service, rejet_chef_service, commentaire_chef_service, \
    date_envoi_chef_service, date_validation_chef_service, \
    validation_directeur_technique, rejet_directeur_technique, \
    commentaire_directeur_technique, date_envoi_directeur_technique, \
    date_validation_directeur_technique, \
    avise_directeur_snertp, observations_directeur_snertp, \
    signature_directeur_snertp, date_envoi_directeur_snertp, \
    date_validation_directeur_snertp, \
    processed_by_marketing, email_client, date_envoi_marketing, date_envoi_client, \
    raison_rejet, date_rejet, created_by, created_at, updated_at";

/// Provides CRUD and transition operations for report validation workflows.
pub struct WorkflowRepo;

impl WorkflowRepo {
    /// Open a workflow: the report enters the circuit at `chef_projet`,
    /// pending, and the sample moves to the `validation` status in the
    /// same transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWorkflow,
        echantillon: &Echantillon,
        client_name: &str,
        created_by: Option<DbId>,
    ) -> Result<WorkflowValidation, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO workflow_validations
                (echantillon_id, code_echantillon, client_id, client_name,
                 file_name, file_data, observations_traitement,
                 etape_actuelle, statut, date_envoi_chef_projet, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'chef_projet', 'en_attente', now(), $8)
             RETURNING {COLUMNS}"
        );
        let workflow = sqlx::query_as::<_, WorkflowValidation>(&query)
            .bind(echantillon.id)
            .bind(&echantillon.code)
            .bind(echantillon.client_id)
            .bind(client_name)
            .bind(&input.file_name)
            .bind(&input.file_data)
            .bind(&input.observations_traitement)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE echantillons SET statut = $2 WHERE id = $1")
            .bind(echantillon.id)
            .bind(STATUT_VALIDATION)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(workflow)
    }

    /// Find a workflow by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkflowValidation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflow_validations WHERE id = $1");
        sqlx::query_as::<_, WorkflowValidation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The non-terminal workflow for a sample, if any.
    ///
    /// At most one workflow per sample is active at a time; a terminal
    /// one (`statut = 'valide'`) no longer counts.
    pub async fn find_active_by_echantillon(
        pool: &PgPool,
        echantillon_id: DbId,
    ) -> Result<Option<WorkflowValidation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_validations
             WHERE echantillon_id = $1 AND statut <> 'valide'
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, WorkflowValidation>(&query)
            .bind(echantillon_id)
            .fetch_optional(pool)
            .await
    }

    /// The non-terminal workflow carrying a sample code, if any.
    pub async fn find_active_by_code(
        pool: &PgPool,
        code_echantillon: &str,
    ) -> Result<Option<WorkflowValidation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_validations
             WHERE code_echantillon = $1 AND statut <> 'valide'
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, WorkflowValidation>(&query)
            .bind(code_echantillon)
            .fetch_optional(pool)
            .await
    }

    /// List workflows, optionally filtered by stage, status and/or
    /// sample code.
    pub async fn list(
        pool: &PgPool,
        etape_actuelle: Option<&str>,
        statut: Option<&str>,
        code_echantillon: Option<&str>,
    ) -> Result<Vec<WorkflowValidation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_validations
             WHERE ($1::text IS NULL OR etape_actuelle = $1)
               AND ($2::text IS NULL OR statut = $2)
               AND ($3::text IS NULL OR code_echantillon = $3)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, WorkflowValidation>(&query)
            .bind(etape_actuelle)
            .bind(statut)
            .bind(code_echantillon)
            .fetch_all(pool)
            .await
    }

    /// The pending work list: workflows sitting at a stage with
    /// `statut = 'en_attente'`. With no stage given, every pending
    /// workflow is returned.
    pub async fn par_etape(
        pool: &PgPool,
        etape: Option<&str>,
    ) -> Result<Vec<WorkflowValidation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_validations
             WHERE statut = 'en_attente'
               AND ($1::text IS NULL OR etape_actuelle = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, WorkflowValidation>(&query)
            .bind(etape)
            .fetch_all(pool)
            .await
    }

    /// Rejected workflows sitting at the rework stage, newest rejection
    /// first.
    pub async fn rejetes(pool: &PgPool) -> Result<Vec<WorkflowValidation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_validations
             WHERE statut = 'rejete'
             ORDER BY date_rejet DESC NULLS LAST, created_at DESC"
        );
        sqlx::query_as::<_, WorkflowValidation>(&query)
            .fetch_all(pool)
            .await
    }

    /// Apply an accept/reject decision at one of the three comment
    /// stages (`chef_projet`, `chef_service`, `directeur_technique`).
    ///
    /// Accept advances `etape_actuelle` exactly one step and stamps the
    /// next stage's hand-off date. Reject records the reason, marks the
    /// workflow rejected, reverts it to the rework stage and moves the
    /// sample back to `traitement` in the same transaction.
    ///
    /// Returns `None` when the conditional UPDATE matched nothing: the
    /// workflow is not at `etape` with `statut = 'en_attente'` (already
    /// decided, moved, or absent). The caller maps that to a conflict.
    pub async fn valider(
        pool: &PgPool,
        id: DbId,
        etape: Etape,
        decision: Decision,
        comment: &str,
    ) -> Result<Option<WorkflowValidation>, sqlx::Error> {
        // Stage column names come from `Etape::as_str`, a closed set of
        // fixed identifiers, never from request input.
        let suffixe = etape.as_str();
        let (suivante, cible_rejet) = match (etape.suivante(), etape.cible_rejet()) {
            (Some(s), Some(c)) => (s, c),
            // Only the three comment stages carry a decision.
            _ => return Ok(None),
        };

        match decision {
            Decision::Accepter => {
                let query = format!(
                    "UPDATE workflow_validations SET
                        validation_{suffixe} = true,
                        rejet_{suffixe} = false,
                        commentaire_{suffixe} = $3,
                        date_validation_{suffixe} = now(),
                        etape_actuelle = $4,
                        date_envoi_{next} = now()
                     WHERE id = $1 AND etape_actuelle = $2 AND statut = 'en_attente'
                     RETURNING {COLUMNS}",
                    next = suivante.as_str(),
                );
                sqlx::query_as::<_, WorkflowValidation>(&query)
                    .bind(id)
                    .bind(suffixe)
                    .bind(comment)
                    .bind(suivante.as_str())
                    .fetch_optional(pool)
                    .await
            }
            Decision::Rejeter => {
                let mut tx = pool.begin().await?;

                let query = format!(
                    "UPDATE workflow_validations SET
                        rejet_{suffixe} = true,
                        validation_{suffixe} = false,
                        commentaire_{suffixe} = $3,
                        date_validation_{suffixe} = now(),
                        raison_rejet = $3,
                        date_rejet = now(),
                        statut = 'rejete',
                        etape_actuelle = $4
                     WHERE id = $1 AND etape_actuelle = $2 AND statut = 'en_attente'
                     RETURNING {COLUMNS}"
                );
                let workflow = sqlx::query_as::<_, WorkflowValidation>(&query)
                    .bind(id)
                    .bind(suffixe)
                    .bind(comment)
                    .bind(cible_rejet.as_str())
                    .fetch_optional(&mut *tx)
                    .await?;

                if let Some(w) = &workflow {
                    sqlx::query("UPDATE echantillons SET statut = $2 WHERE id = $1")
                        .bind(w.echantillon_id)
                        .bind(STATUT_TRAITEMENT)
                        .execute(&mut *tx)
                        .await?;
                }

                tx.commit().await?;
                Ok(workflow)
            }
        }
    }

    /// Record the SNERTP director's advisory (observations + signature)
    /// and hand the workflow over to marketing.
    ///
    /// Returns `None` when the workflow is not pending at
    /// `directeur_snertp`.
    pub async fn aviser_directeur_snertp(
        pool: &PgPool,
        id: DbId,
        observations: &str,
        signature: &str,
    ) -> Result<Option<WorkflowValidation>, sqlx::Error> {
        let query = format!(
            "UPDATE workflow_validations SET
                avise_directeur_snertp = true,
                observations_directeur_snertp = $2,
                signature_directeur_snertp = $3,
                date_validation_directeur_snertp = now(),
                etape_actuelle = 'marketing',
                date_envoi_marketing = now()
             WHERE id = $1 AND etape_actuelle = 'directeur_snertp' AND statut = 'en_attente'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowValidation>(&query)
            .bind(id)
            .bind(observations)
            .bind(signature)
            .fetch_optional(pool)
            .await
    }

    /// Dispatch the report to the client: terminal transition. The
    /// workflow reaches `client` with `statut = 'valide'` and the sample
    /// is marked `valide` in the same transaction.
    ///
    /// Returns `None` when the workflow is not pending at `marketing`.
    pub async fn envoyer_client(
        pool: &PgPool,
        id: DbId,
        email_client: &str,
    ) -> Result<Option<WorkflowValidation>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE workflow_validations SET
                processed_by_marketing = true,
                email_client = $2,
                etape_actuelle = 'client',
                statut = 'valide',
                date_envoi_client = now()
             WHERE id = $1 AND etape_actuelle = 'marketing' AND statut = 'en_attente'
             RETURNING {COLUMNS}"
        );
        let workflow = sqlx::query_as::<_, WorkflowValidation>(&query)
            .bind(id)
            .bind(email_client)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(w) = &workflow {
            sqlx::query("UPDATE echantillons SET statut = $2 WHERE id = $1")
                .bind(w.echantillon_id)
                .bind(STATUT_VALIDE)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(workflow)
    }

    /// Resubmit a rejected report into the circuit at `chef_projet`.
    ///
    /// Clears every per-stage decision flag so the fresh pass starts
    /// from a clean slate (comments, dates and the rejection reason stay
    /// as history), optionally replaces the attached report, and moves
    /// the sample back to `validation` in the same transaction.
    ///
    /// Returns `None` when the workflow is not rejected at the rework
    /// stage.
    pub async fn renvoyer_validation(
        pool: &PgPool,
        id: DbId,
        input: &RenvoyerRequest,
    ) -> Result<Option<WorkflowValidation>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE workflow_validations SET
                etape_actuelle = 'chef_projet',
                statut = 'en_attente',
                observations_traitement = $2,
                file_name = COALESCE($3, file_name),
                file_data = COALESCE($4, file_data),
                validation_chef_projet = false,
                rejet_chef_projet = false,
                validation_chef_service = false,
                rejet_chef_service = false,
                validation_directeur_technique = false,
                rejet_directeur_technique = false,
                avise_directeur_snertp = false,
                processed_by_marketing = false,
                date_envoi_chef_projet = now()
             WHERE id = $1 AND etape_actuelle = 'traitement' AND statut = 'rejete'
             RETURNING {COLUMNS}"
        );
        let workflow = sqlx::query_as::<_, WorkflowValidation>(&query)
            .bind(id)
            .bind(&input.observations)
            .bind(input.file_name.as_deref())
            .bind(input.file_data.as_deref())
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(w) = &workflow {
            sqlx::query("UPDATE echantillons SET statut = $2 WHERE id = $1")
                .bind(w.echantillon_id)
                .bind(STATUT_VALIDATION)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(workflow)
    }
}
