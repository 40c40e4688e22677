//! Repository for the `clients` table.

use sqlx::PgPool;

use geolab_core::echantillon::formater_code_client;
use geolab_core::types::DbId;

use crate::models::client::{Client, CreateClient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, code, nom, projet, contact, telephone, email, created_by, created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Register a new client with a generated `CLI-nnn` code.
    ///
    /// The counter comes from the `client_code_seq` sequence, so two
    /// concurrent registrations cannot collide.
    pub async fn create(
        pool: &PgPool,
        input: &CreateClient,
        created_by: Option<DbId>,
    ) -> Result<Client, sqlx::Error> {
        let numero: i64 = sqlx::query_scalar("SELECT nextval('client_code_seq')")
            .fetch_one(pool)
            .await?;
        let code = formater_code_client(numero as u32);

        let query = format!(
            "INSERT INTO clients (code, nom, projet, contact, telephone, email, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&code)
            .bind(&input.nom)
            .bind(&input.projet)
            .bind(&input.contact)
            .bind(&input.telephone)
            .bind(&input.email)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a client by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all clients ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients ORDER BY created_at DESC");
        sqlx::query_as::<_, Client>(&query).fetch_all(pool).await
    }
}
