// ABOUTME: Unified error handling for the authorization issuer
// ABOUTME: Defines terminal error kinds and their OAuth 2.0 wire-code mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

//! # Unified Error Handling
//!
//! Every failure the core can produce is one of the kinds below. All of them
//! are terminal for the current call; no retries happen inside the core. The
//! HTTP layer (out of scope here) maps each kind to a user-visible OAuth 2.0
//! `error` parameter via [`AuthError::error_code`].

use thiserror::Error;

/// Result type alias for convenience
pub type AuthResult<T> = Result<T, AuthError>;

/// Terminal error kinds produced by the authorization core
#[derive(Debug, Error)]
pub enum AuthError {
    /// Requested scope is not a member of the configured allowlist
    #[error("scope '{0}' is not in the configured scope allowlist")]
    InvalidScope(String),

    /// Client identifier is not registered
    #[error("client '{0}' is not registered")]
    InvalidClient(String),

    /// Response type is not one of `code`, `token`, `code_and_token`
    #[error("response_type '{0}' is not supported")]
    UnsupportedResponseType(String),

    /// Backing store unreachable, timed out, or a read/write failed
    #[error("storage backend error: {0}")]
    Storage(String),

    /// Signing key missing/invalid or token encoding failed
    #[error("token signing error: {0}")]
    Signing(String),

    /// Never-should-happen internal failure (RNG, hashing)
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// The OAuth 2.0 `error` parameter value for this kind (RFC 6749 §4.1.2.1 / §5.2)
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidScope(_) => "invalid_scope",
            Self::InvalidClient(_) => "invalid_client",
            Self::UnsupportedResponseType(_) => "unsupported_response_type",
            Self::Storage(_) => "temporarily_unavailable",
            Self::Signing(_) | Self::Internal(_) => "server_error",
        }
    }

    /// Storage error from any displayable source
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Internal error from any displayable source
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<redis::RedisError> for AuthError {
    fn from(error: redis::RedisError) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(error: sqlx::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        // Records cross the storage boundary as JSON; a codec failure is a storage failure
        Self::Storage(format!("record serialization failed: {error}"))
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        Self::Signing(error.to_string())
    }
}
