// ABOUTME: Client registry recording registrations and authorization codes
// ABOUTME: Applies a bounded timeout around every storage call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

use crate::errors::{AuthError, AuthResult};
use crate::models::{AuthorizationCode, Client};
use crate::storage::factory::Storage;
use crate::storage::StorageProvider;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Records and verifies client registrations against the configured backend.
///
/// The registry is the single choke point for persistence: every call is
/// wrapped in a timeout so a wedged store surfaces as a `Storage` error
/// instead of hanging the authorization pipeline.
#[derive(Clone)]
pub struct ClientRegistry {
    storage: Arc<Storage>,
    operation_timeout: Duration,
}

impl ClientRegistry {
    /// Create a registry over the configured storage backend
    #[must_use]
    pub fn new(storage: Arc<Storage>, operation_timeout: Duration) -> Self {
        Self {
            storage,
            operation_timeout,
        }
    }

    /// Store a client credential pair. Overwrites idempotently on duplicate
    /// `client_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the backing store is unreachable
    pub async fn register_client(&self, client: &Client) -> AuthResult<()> {
        self.bounded(self.storage.store_client(client)).await?;
        tracing::debug!(client_id = %client.client_id, "client registration stored");
        Ok(())
    }

    /// Existence check only: the secret is not validated here. Client
    /// existence alone gates authorization in this flow (documented policy
    /// choice for trusted first-party clients).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the backing store is unreachable
    pub async fn is_client_registered(&self, client_id: &str) -> AuthResult<bool> {
        let client = self.bounded(self.storage.get_client(client_id)).await?;
        Ok(client.is_some())
    }

    /// Persist an authorization code record keyed by the code value.
    ///
    /// A persistence failure makes the issued code unredeemable, so it is
    /// reported and propagated; the caller aborts issuance.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the write fails or times out
    pub async fn persist_authorization_code(&self, record: &AuthorizationCode) -> AuthResult<()> {
        self.bounded(self.storage.store_auth_code(record))
            .await
            .map_err(|e| {
                tracing::error!(
                    client_id = %record.client_id,
                    error = %e,
                    "failed to persist authorization code; issued code would be unredeemable"
                );
                e
            })
    }

    /// Fetch and delete a pending authorization code, enforcing single-use
    /// semantics. Returns `None` for unknown, expired, or already-consumed
    /// codes.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the backing store is unreachable
    pub async fn consume_authorization_code(
        &self,
        code: &str,
    ) -> AuthResult<Option<AuthorizationCode>> {
        let record = self.bounded(self.storage.get_auth_code(code)).await?;
        if record.is_some() {
            self.bounded(self.storage.delete_auth_code(code)).await?;
        }
        Ok(record)
    }

    /// Verify the backing store is reachable
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the health check fails
    pub async fn health_check(&self) -> AuthResult<()> {
        self.bounded(self.storage.health_check()).await
    }

    async fn bounded<T>(&self, operation: impl Future<Output = AuthResult<T>>) -> AuthResult<T> {
        tokio::time::timeout(self.operation_timeout, operation)
            .await
            .map_err(|_| AuthError::storage("storage operation timed out"))?
    }
}
