// ABOUTME: Configuration types for the authorization issuer
// ABOUTME: Immutable server settings injected at construction time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

/// Environment-variable loading for server configuration
pub mod environment;

use crate::constants::{credentials, lifetimes, redis_connection, storage};
use std::time::Duration;

/// Complete server configuration. Built once at startup and read-only
/// thereafter; the signing key in particular is never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct AuthServerConfig {
    /// Persistence backend selection and tuning
    pub storage: StorageConfig,
    /// Server-wide symmetric token signing key
    pub signing_key: String,
    /// Scope allowlist; an absent request scope is always permitted
    pub allowed_scopes: Vec<String>,
    /// Code and token lifetime policy
    pub lifetimes: LifetimeConfig,
    /// Credential generation parameters
    pub credentials: CredentialConfig,
}

impl AuthServerConfig {
    /// Build a configuration with default lifetimes and credential parameters
    #[must_use]
    pub fn new(
        storage_url: impl Into<String>,
        signing_key: impl Into<String>,
        allowed_scopes: Vec<String>,
    ) -> Self {
        Self {
            storage: StorageConfig {
                url: storage_url.into(),
                ..StorageConfig::default()
            },
            signing_key: signing_key.into(),
            allowed_scopes,
            lifetimes: LifetimeConfig::default(),
            credentials: CredentialConfig::default(),
        }
    }
}

/// Persistence backend configuration. The URL scheme selects the backend:
/// `redis://` (key-value) or `sqlite:` (document store).
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend connection URL
    pub url: String,
    /// Bound applied around every storage operation
    pub operation_timeout: Duration,
    /// Connection tuning for the key-value backend
    pub redis: RedisConnectionConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_owned(),
            operation_timeout: Duration::from_secs(storage::DEFAULT_OPERATION_TIMEOUT_SECS),
            redis: RedisConnectionConfig::default(),
        }
    }
}

/// Redis connection and retry configuration
#[derive(Debug, Clone)]
pub struct RedisConnectionConfig {
    /// TCP connect timeout in seconds
    pub connection_timeout_secs: u64,
    /// Per-command response timeout in seconds
    pub response_timeout_secs: u64,
    /// Initial connection attempts before giving up
    pub initial_connection_retries: u32,
    /// Reconnection attempts handled by the connection manager
    pub reconnection_retries: usize,
    /// First retry delay in milliseconds (exponential backoff)
    pub initial_retry_delay_ms: u64,
    /// Retry delay cap in milliseconds
    pub max_retry_delay_ms: u64,
}

impl Default for RedisConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: redis_connection::DEFAULT_CONNECTION_TIMEOUT_SECS,
            response_timeout_secs: redis_connection::DEFAULT_RESPONSE_TIMEOUT_SECS,
            initial_connection_retries: redis_connection::DEFAULT_INITIAL_CONNECTION_RETRIES,
            reconnection_retries: redis_connection::DEFAULT_RECONNECTION_RETRIES,
            initial_retry_delay_ms: redis_connection::DEFAULT_INITIAL_RETRY_DELAY_MS,
            max_retry_delay_ms: redis_connection::DEFAULT_MAX_RETRY_DELAY_MS,
        }
    }
}

/// Issuance lifetime policy. Configuration constants, never request inputs.
#[derive(Debug, Clone, Copy)]
pub struct LifetimeConfig {
    /// Authorization code lifetime
    pub auth_code: Duration,
    /// Access token lifetime
    pub access_token: Duration,
}

impl Default for LifetimeConfig {
    fn default() -> Self {
        Self {
            auth_code: Duration::from_secs(lifetimes::AUTH_CODE_LIFETIME_SECS),
            access_token: Duration::from_secs(lifetimes::ACCESS_TOKEN_LIFETIME_SECS),
        }
    }
}

/// Credential generation parameters
#[derive(Debug, Clone, Copy)]
pub struct CredentialConfig {
    /// bcrypt work factor for secret derivation
    pub bcrypt_cost: u32,
    /// Secret-salt length in bytes
    pub salt_length: usize,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: credentials::DEFAULT_BCRYPT_COST,
            salt_length: credentials::DEFAULT_SALT_LENGTH,
        }
    }
}
