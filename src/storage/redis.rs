// ABOUTME: Redis key-value storage backend with connection pooling
// ABOUTME: Uses native key expiry to evict authorization codes server-side
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

use super::StorageProvider;
use crate::config::RedisConnectionConfig;
use crate::constants::storage::{CLIENT_KEY_PREFIX, CODE_KEY_PREFIX};
use crate::errors::{AuthError, AuthResult};
use crate::models::{AuthorizationCode, Client};
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{error, info, warn};

/// Redis storage backend.
///
/// Uses Redis `ConnectionManager` for automatic reconnection and connection
/// pooling. Records are stored as JSON values under namespaced keys.
/// Authorization codes are written with `SETEX`, so the store itself evicts
/// them once their lifetime elapses.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis at `url`
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the connection cannot be established
    /// within the configured retry budget
    pub async fn new(url: &str, config: &RedisConnectionConfig) -> AuthResult<Self> {
        info!(
            "connecting to redis at {} (timeout={}s, response_timeout={}s, retries={})",
            url,
            config.connection_timeout_secs,
            config.response_timeout_secs,
            config.initial_connection_retries
        );

        let client = redis::Client::open(url)
            .map_err(|e| AuthError::storage(format!("failed to create redis client: {e}")))?;

        let manager = Self::connect_with_retry(&client, config).await?;

        info!("successfully connected to redis");
        Ok(Self { manager })
    }

    /// Connect with exponential backoff retry on failure
    async fn connect_with_retry(
        client: &redis::Client,
        config: &RedisConnectionConfig,
    ) -> AuthResult<ConnectionManager> {
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .set_response_timeout(Duration::from_secs(config.response_timeout_secs))
            .set_number_of_retries(config.reconnection_retries)
            .set_exponent_base(2)
            .set_max_delay(config.max_retry_delay_ms);

        let max_retries = config.initial_connection_retries;
        let mut delay_ms = config.initial_retry_delay_ms;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match ConnectionManager::new_with_config(client.clone(), manager_config.clone()).await {
                Ok(manager) => {
                    if attempt > 0 {
                        info!("redis connection established after {} retries", attempt);
                    }
                    return Ok(manager);
                }
                Err(e) => {
                    last_error = Some(e);
                    if attempt < max_retries {
                        warn!(
                            "redis connection attempt {}/{} failed, retrying in {}ms",
                            attempt + 1,
                            max_retries + 1,
                            delay_ms
                        );
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        delay_ms = (delay_ms * 2).min(config.max_retry_delay_ms);
                    }
                }
            }
        }

        Err(AuthError::storage(format!(
            "failed to connect to redis after {} attempts: {}",
            max_retries + 1,
            last_error.map_or_else(|| "unknown error".to_owned(), |e| e.to_string())
        )))
    }

    fn client_key(client_id: &str) -> String {
        format!("{CLIENT_KEY_PREFIX}{client_id}")
    }

    fn code_key(code: &str) -> String {
        format!("{CODE_KEY_PREFIX}{code}")
    }
}

#[async_trait]
impl StorageProvider for RedisStore {
    async fn store_client(&self, client: &Client) -> AuthResult<()> {
        let serialized = serde_json::to_vec(client)?;
        let mut conn = self.manager.clone();

        // Plain SET: clients never expire, and SET overwrites idempotently
        conn.set::<_, _, ()>(Self::client_key(&client.client_id), serialized)
            .await
            .map_err(|e| {
                error!("redis SET failed for client record: {}", e);
                AuthError::from(e)
            })?;

        Ok(())
    }

    async fn get_client(&self, client_id: &str) -> AuthResult<Option<Client>> {
        let mut conn = self.manager.clone();

        let data: Option<Vec<u8>> = conn.get(Self::client_key(client_id)).await.map_err(|e| {
            error!("redis GET failed for client record: {}", e);
            AuthError::from(e)
        })?;

        match data {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn store_auth_code(&self, record: &AuthorizationCode) -> AuthResult<()> {
        let serialized = serde_json::to_vec(record)?;
        let ttl_secs = u64::try_from(record.expires_in / 1000).unwrap_or(0).max(1);
        let mut conn = self.manager.clone();

        // SETEX: value and expiry in one atomic operation; Redis evicts the
        // code once its lifetime elapses
        conn.set_ex::<_, _, ()>(Self::code_key(&record.code), serialized, ttl_secs)
            .await
            .map_err(|e| {
                error!("redis SETEX failed for authorization code: {}", e);
                AuthError::from(e)
            })?;

        Ok(())
    }

    async fn get_auth_code(&self, code: &str) -> AuthResult<Option<AuthorizationCode>> {
        let mut conn = self.manager.clone();

        let data: Option<Vec<u8>> = conn.get(Self::code_key(code)).await.map_err(|e| {
            error!("redis GET failed for authorization code: {}", e);
            AuthError::from(e)
        })?;

        match data {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn delete_auth_code(&self, code: &str) -> AuthResult<()> {
        let mut conn = self.manager.clone();

        let _: () = conn.del(Self::code_key(code)).await.map_err(|e| {
            error!("redis DEL failed for authorization code: {}", e);
            AuthError::from(e)
        })?;

        Ok(())
    }

    async fn health_check(&self) -> AuthResult<()> {
        let mut conn = self.manager.clone();

        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(AuthError::from)?;

        if response == "PONG" {
            Ok(())
        } else {
            Err(AuthError::storage(format!(
                "unexpected PING response '{response}'"
            )))
        }
    }
}
