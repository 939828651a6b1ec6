// ABOUTME: Storage factory with URL-based backend detection
// ABOUTME: Routes every persistence call through the one configured backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

use super::document::DocumentStore;
use super::redis::RedisStore;
use super::StorageProvider;
use crate::config::StorageConfig;
use crate::errors::{AuthError, AuthResult};
use crate::models::{AuthorizationCode, Client};
use async_trait::async_trait;
use tracing::{debug, info};

/// Supported storage backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// Redis key-value store
    Redis,
    /// SQLite document store
    Sqlite,
}

/// Storage instance wrapper that delegates to the configured backend.
///
/// Exactly one backend is active per server instance; selection happens once
/// at construction time from the storage URL scheme, never inside business
/// logic.
#[derive(Clone)]
pub enum Storage {
    /// Key-value backend
    Redis(RedisStore),
    /// Document-store backend
    Document(DocumentStore),
}

impl Storage {
    /// Create a storage instance based on the configured URL
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the URL format is unsupported or the
    /// backend cannot be reached
    pub async fn new(config: &StorageConfig) -> AuthResult<Self> {
        debug!("detecting storage backend from URL: {}", config.url);
        let storage_type = detect_storage_type(&config.url)?;

        match storage_type {
            StorageType::Redis => {
                info!("initializing redis key-value storage backend");
                let store = RedisStore::new(&config.url, &config.redis).await?;
                Ok(Self::Redis(store))
            }
            StorageType::Sqlite => {
                info!("initializing sqlite document storage backend");
                let store = DocumentStore::new(&config.url).await?;
                Ok(Self::Document(store))
            }
        }
    }

    /// A descriptive string for the active backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Redis(_) => "Redis (key-value)",
            Self::Document(_) => "SQLite (document store)",
        }
    }
}

/// Detect the storage backend type from a connection URL
///
/// # Errors
///
/// Returns [`AuthError::Storage`] if the URL scheme is not recognized
pub fn detect_storage_type(url: &str) -> AuthResult<StorageType> {
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        Ok(StorageType::Redis)
    } else if url.starts_with("sqlite:") {
        Ok(StorageType::Sqlite)
    } else {
        Err(AuthError::storage(format!(
            "unsupported storage URL format: {url}. \
             Supported formats: redis://host:port, sqlite:path/to/db.sqlite"
        )))
    }
}

#[async_trait]
impl StorageProvider for Storage {
    async fn store_client(&self, client: &Client) -> AuthResult<()> {
        match self {
            Self::Redis(store) => store.store_client(client).await,
            Self::Document(store) => store.store_client(client).await,
        }
    }

    async fn get_client(&self, client_id: &str) -> AuthResult<Option<Client>> {
        match self {
            Self::Redis(store) => store.get_client(client_id).await,
            Self::Document(store) => store.get_client(client_id).await,
        }
    }

    async fn store_auth_code(&self, record: &AuthorizationCode) -> AuthResult<()> {
        match self {
            Self::Redis(store) => store.store_auth_code(record).await,
            Self::Document(store) => store.store_auth_code(record).await,
        }
    }

    async fn get_auth_code(&self, code: &str) -> AuthResult<Option<AuthorizationCode>> {
        match self {
            Self::Redis(store) => store.get_auth_code(code).await,
            Self::Document(store) => store.get_auth_code(code).await,
        }
    }

    async fn delete_auth_code(&self, code: &str) -> AuthResult<()> {
        match self {
            Self::Redis(store) => store.delete_auth_code(code).await,
            Self::Document(store) => store.delete_auth_code(code).await,
        }
    }

    async fn health_check(&self) -> AuthResult<()> {
        match self {
            Self::Redis(store) => store.health_check().await,
            Self::Document(store) => store.health_check().await,
        }
    }
}
