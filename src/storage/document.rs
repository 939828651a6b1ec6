// ABOUTME: SQLite-backed document store, the alternate persistence backend
// ABOUTME: JSON document column per record with explicit stored expiry timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

use super::StorageProvider;
use crate::errors::{AuthError, AuthResult};
use crate::models::{AuthorizationCode, Client};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

/// Document-oriented storage backend over SQLite.
///
/// Each record is stored as a JSON document in a per-collection table, keyed
/// by its natural identifier. SQLite has no native key expiry, so code
/// records carry an explicit `expires_at` timestamp checked (and evicted) on
/// read.
#[derive(Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    /// Open (or create) the document store at `database_url`
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the database cannot be opened or the
    /// schema migration fails
    pub async fn new(database_url: &str) -> AuthResult<Self> {
        let in_memory = database_url.contains(":memory:");

        // In-memory databases exist per connection: pin the pool to a single
        // long-lived connection so every operation sees the same data
        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let connection_url = if in_memory || database_url.contains('?') {
            database_url.to_owned()
        } else {
            // mode=rwc creates the database file on first open
            format!("{database_url}?mode=rwc")
        };

        let pool = options.connect(&connection_url).await?;

        let store = Self { pool };
        store.migrate().await?;
        debug!("document store ready at {}", database_url);
        Ok(store)
    }

    /// Create collection tables if they do not exist
    async fn migrate(&self) -> AuthResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS clients (
                client_id TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS auth_codes (
                code TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn parse_timestamp(raw: &str) -> AuthResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| AuthError::storage(format!("corrupt timestamp in code record: {e}")))
    }
}

#[async_trait]
impl StorageProvider for DocumentStore {
    async fn store_client(&self, client: &Client) -> AuthResult<()> {
        let document = serde_json::to_string(client)?;

        sqlx::query(
            "INSERT OR REPLACE INTO clients (client_id, document, created_at) VALUES (?, ?, ?)",
        )
        .bind(&client.client_id)
        .bind(document)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_client(&self, client_id: &str) -> AuthResult<Option<Client>> {
        let row = sqlx::query("SELECT document FROM clients WHERE client_id = ?")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let document: String = row.try_get("document")?;
                Ok(Some(serde_json::from_str(&document)?))
            }
            None => Ok(None),
        }
    }

    async fn store_auth_code(&self, record: &AuthorizationCode) -> AuthResult<()> {
        let document = serde_json::to_string(record)?;
        let now = Utc::now();
        let expires_at = now + chrono::Duration::milliseconds(record.expires_in);

        sqlx::query(
            "INSERT OR REPLACE INTO auth_codes (code, document, expires_at, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(&record.code)
        .bind(document)
        .bind(expires_at.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_auth_code(&self, code: &str) -> AuthResult<Option<AuthorizationCode>> {
        let row = sqlx::query("SELECT document, expires_at FROM auth_codes WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: String = row.try_get("expires_at")?;
        if Self::parse_timestamp(&expires_at)? <= Utc::now() {
            // Consumer-side expiry check: evict and report absent
            warn!("authorization code expired before redemption");
            self.delete_auth_code(code).await?;
            return Ok(None);
        }

        let document: String = row.try_get("document")?;
        Ok(Some(serde_json::from_str(&document)?))
    }

    async fn delete_auth_code(&self, code: &str) -> AuthResult<()> {
        sqlx::query("DELETE FROM auth_codes WHERE code = ?")
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> AuthResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
