//! The user directory: the persisted user table behind a trait seam.
//!
//! The gate and the HTTP handlers only see [`UserDirectory`]; the server
//! wires in [`PgUserDirectory`] at startup, and the integration tests drive
//! the full router against an in-memory implementation instead.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{PgPool, Row};
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::password;

/// A row of the user table. The password digest never serializes and never
/// appears in debug output.
#[derive(Clone, Serialize, ToSchema)]
pub struct User {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    #[schema(value_type = String)]
    pub password_hash: String,
}

impl User {
    /// True iff `plaintext` matches this user's stored digest.
    #[must_use]
    pub fn verify_secret(&self, plaintext: &str) -> bool {
        password::verify(plaintext, &self.password_hash)
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"***")
            .finish()
    }
}

/// Outcome when attempting to register a new user.
#[derive(Debug)]
pub enum InsertOutcome {
    Created(User),
    Duplicate,
}

/// Contract consumed by the auth gate and the handlers.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get(&self, id: Uuid) -> Result<Option<User>>;
    async fn insert(&self, email: &str, password_hash: &str) -> Result<InsertOutcome>;
}

/// Postgres-backed directory over the `users` table.
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = "SELECT id, email, password_hash FROM users WHERE email = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user by email")?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
        }))
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let query = "SELECT id, email, password_hash FROM users WHERE id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup user by id")?;

        Ok(row.map(|row| User {
            id: row.get("id"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
        }))
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<InsertOutcome> {
        let query = "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(InsertOutcome::Created(User {
                id: row.get("id"),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
            })),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Duplicate),
            Err(err) => Err(err).context("failed to insert user"),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
