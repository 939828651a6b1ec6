// ABOUTME: Main library entry point for the Vela OAuth 2.0 authorization issuer
// ABOUTME: Client registration, scope validation, and code/token issuance over pluggable storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

#![deny(unsafe_code)]

//! # Vela OAuth2 Server
//!
//! A minimal OAuth2-style authorization issuer: it registers client
//! credentials, validates authorization requests against a scope allowlist,
//! and issues short-lived authorization codes and HS256-signed access tokens,
//! returning the redirect target string for the requested response mode.
//!
//! ## Features
//!
//! - **Three response modes**: `code`, `token`, and `code_and_token`
//! - **Pluggable persistence**: Redis key-value store or SQLite document
//!   store, selected from the storage URL at construction time
//! - **Hashed-at-rest secrets**: client secrets are bcrypt-derived from the
//!   identifier plus a fresh random salt, never reversible
//! - **Deterministic validation order**: scope, then client, then issuance
//!
//! Transport is out of scope: the authorization entry point is a single
//! in-process async call, to be exposed by an external HTTP layer.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vela_oauth2_server::config::AuthServerConfig;
//! use vela_oauth2_server::models::AuthorizationRequest;
//! use vela_oauth2_server::server::AuthorizationServer;
//! use vela_oauth2_server::storage::factory::Storage;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AuthServerConfig::new(
//!         "redis://localhost:6379",
//!         "server-signing-key",
//!         vec!["orders.read".to_owned()],
//!     );
//!
//!     let storage = Arc::new(Storage::new(&config.storage).await?);
//!     let server = AuthorizationServer::new(storage, &config)?;
//!
//!     let client = server.register_client().await?;
//!     let redirect = server
//!         .authorize(AuthorizationRequest {
//!             response_type: "code".to_owned(),
//!             client_id: client.client_id,
//!             redirect_uri: "https://app.example.com/callback".to_owned(),
//!             scope: Some("orders.read".to_owned()),
//!             state: Some("af0ifjsldkj".to_owned()),
//!         })
//!         .await?;
//!
//!     println!("{redirect}");
//!     Ok(())
//! }
//! ```

/// Configuration management
pub mod config;

/// Application constants and policy defaults
pub mod constants;

/// Credential generation for client id/secret pairs and authorization codes
pub mod credentials;

/// Unified error handling with OAuth 2.0 wire-code mapping
pub mod errors;

/// Core data models
pub mod models;

/// Client registry over the configured storage backend
pub mod registry;

/// The authorization engine
pub mod server;

/// Persistence abstraction with pluggable backends
pub mod storage;

/// Signed access token issuance
pub mod token;

pub use config::AuthServerConfig;
pub use credentials::CredentialGenerator;
pub use errors::{AuthError, AuthResult};
pub use models::{AuthorizationCode, AuthorizationRequest, Client};
pub use registry::ClientRegistry;
pub use server::AuthorizationServer;
pub use token::{TokenClaims, TokenIssuer};
