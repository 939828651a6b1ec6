// ABOUTME: Environment-variable driven configuration loading
// ABOUTME: Maps AUTH_* variables onto AuthServerConfig with sensible defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

use super::{
    AuthServerConfig, CredentialConfig, LifetimeConfig, RedisConnectionConfig, StorageConfig,
};
use crate::errors::{AuthError, AuthResult};
use std::env;
use std::time::Duration;

impl AuthServerConfig {
    /// Load configuration from environment variables.
    ///
    /// `AUTH_SIGNING_KEY` is required; everything else falls back to
    /// defaults. `AUTH_ALLOWED_SCOPES` is a comma-separated list.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if `AUTH_SIGNING_KEY` is unset or empty.
    pub fn from_env() -> AuthResult<Self> {
        let signing_key = env::var("AUTH_SIGNING_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AuthError::Signing("AUTH_SIGNING_KEY environment variable is not set".to_owned())
            })?;

        let allowed_scopes = env::var("AUTH_ALLOWED_SCOPES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|scope| !scope.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let defaults = StorageConfig::default();
        let storage = StorageConfig {
            url: env::var("AUTH_STORAGE_URL").unwrap_or(defaults.url),
            operation_timeout: env_duration_secs(
                "AUTH_STORAGE_TIMEOUT_SECS",
                defaults.operation_timeout,
            ),
            redis: redis_connection_from_env(),
        };

        let lifetime_defaults = LifetimeConfig::default();
        let lifetimes = LifetimeConfig {
            auth_code: env_duration_secs("AUTH_CODE_LIFETIME_SECS", lifetime_defaults.auth_code),
            access_token: env_duration_secs(
                "AUTH_TOKEN_LIFETIME_SECS",
                lifetime_defaults.access_token,
            ),
        };

        let credential_defaults = CredentialConfig::default();
        let credentials = CredentialConfig {
            bcrypt_cost: env_parsed("AUTH_BCRYPT_COST", credential_defaults.bcrypt_cost),
            salt_length: env_parsed("AUTH_SALT_LENGTH", credential_defaults.salt_length),
        };

        Ok(Self {
            storage,
            signing_key,
            allowed_scopes,
            lifetimes,
            credentials,
        })
    }
}

fn redis_connection_from_env() -> RedisConnectionConfig {
    let defaults = RedisConnectionConfig::default();
    RedisConnectionConfig {
        connection_timeout_secs: env_parsed(
            "AUTH_REDIS_CONNECTION_TIMEOUT_SECS",
            defaults.connection_timeout_secs,
        ),
        response_timeout_secs: env_parsed(
            "AUTH_REDIS_RESPONSE_TIMEOUT_SECS",
            defaults.response_timeout_secs,
        ),
        initial_connection_retries: env_parsed(
            "AUTH_REDIS_CONNECTION_RETRIES",
            defaults.initial_connection_retries,
        ),
        reconnection_retries: env_parsed(
            "AUTH_REDIS_RECONNECTION_RETRIES",
            defaults.reconnection_retries,
        ),
        initial_retry_delay_ms: env_parsed(
            "AUTH_REDIS_INITIAL_RETRY_DELAY_MS",
            defaults.initial_retry_delay_ms,
        ),
        max_retry_delay_ms: env_parsed("AUTH_REDIS_MAX_RETRY_DELAY_MS", defaults.max_retry_delay_ms),
    }
}

/// Parse an environment variable, falling back to the default on absence or
/// parse failure
fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

fn env_duration_secs(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .map_or(default, Duration::from_secs)
}
