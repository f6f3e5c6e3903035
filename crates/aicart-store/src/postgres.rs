//! Postgres-backed credential store.

use crate::CredentialStore;
use crate::error::StoreError;
use aicart_core::{DatabaseConfig, NewUser, Role, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::postgres::PgPoolOptions;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, password_hash, role, name, credits, created_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String, // Argon2 PHC string
    role: String,          // "admin" | "user", enforced by a CHECK constraint
    name: String,
    credits: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: aicart_core::UnknownRole| StoreError::CorruptRecord(e.to_string()))?;
        Ok(User {
            id: row.id.to_string(),
            email: row.email,
            password_hash: row.password_hash,
            role,
            name: row.name,
            credits: row.credits,
            created_at: row.created_at,
        })
    }
}

pub struct PostgresCredentialStore {
    pool: sqlx::PgPool,
    query_timeout: Duration,
}

impl PostgresCredentialStore {
    /// Connect, verify the connection and apply the `users` migration.
    ///
    /// The whole attempt is bounded by the pool's acquire timeout, so an
    /// unreachable host fails fast instead of stalling startup.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let acquire_timeout = config.pool.acquire_timeout();
        let url = config.connection_string();
        let connect = PgPoolOptions::new()
            .max_connections(config.pool.max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(&url);

        let pool = tokio::time::timeout(acquire_timeout, connect)
            .await
            .map_err(|_| {
                StoreError::Unavailable(format!(
                    "connection attempt timed out after {}s",
                    acquire_timeout.as_secs()
                ))
            })?
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        Ok(Self::from_pool(pool, config.pool.query_timeout()))
    }

    pub fn from_pool(pool: sqlx::PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Unavailable(format!(
                "query timed out after {}s",
                self.query_timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = self
            .bounded(
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(email)
                    .fetch_optional(&self.pool),
            )
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, email, password_hash, role, name, credits) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        );
        let row = self
            .bounded(
                sqlx::query_as::<_, UserRow>(&sql)
                    .bind(Uuid::new_v4())
                    .bind(&user.email)
                    .bind(&user.password_hash)
                    .bind(user.role.as_str())
                    .bind(&user.name)
                    .bind(user.credits)
                    .fetch_one(&self.pool),
            )
            .await?;

        tracing::debug!(email = %user.email, role = %user.role, "created user record");
        User::try_from(row)
    }
}
