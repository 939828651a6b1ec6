// ABOUTME: Persistence abstraction for client registrations and authorization codes
// ABOUTME: Pluggable backend support (Redis key-value, SQLite document store) behind one trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

/// SQLite-backed document store implementation
pub mod document;
/// Storage factory for URL-based backend selection
pub mod factory;
/// Redis key-value store implementation
pub mod redis;

use crate::errors::AuthResult;
use crate::models::{AuthorizationCode, Client};
use async_trait::async_trait;

/// Core storage abstraction trait.
///
/// All backends must implement this trait to provide a consistent interface
/// for the registry layer. Individual operations are atomic per key; no
/// cross-key transaction is required by the authorization flow. Business
/// logic never branches on the backend type — everything routes through
/// whichever backend was selected at construction time.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Persist a registered client, overwriting any previous registration
    /// with the same `client_id` (idempotent, durable read-after-write)
    async fn store_client(&self, client: &Client) -> AuthResult<()>;

    /// Fetch a registered client by id
    async fn get_client(&self, client_id: &str) -> AuthResult<Option<Client>>;

    /// Persist an authorization code record keyed by the code value
    async fn store_auth_code(&self, record: &AuthorizationCode) -> AuthResult<()>;

    /// Fetch a pending authorization code record. Returns `None` for unknown
    /// or expired codes.
    async fn get_auth_code(&self, code: &str) -> AuthResult<Option<AuthorizationCode>>;

    /// Remove a consumed or expired authorization code
    async fn delete_auth_code(&self, code: &str) -> AuthResult<()>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> AuthResult<()>;
}
