// ABOUTME: Authorization engine orchestrating validation, issuance, and redirect construction
// ABOUTME: Single-pass pipeline with deterministic error precedence and three response-type branches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

use crate::config::{AuthServerConfig, LifetimeConfig};
use crate::credentials::CredentialGenerator;
use crate::errors::{AuthError, AuthResult};
use crate::models::{AuthorizationCode, AuthorizationRequest, Client};
use crate::registry::ClientRegistry;
use crate::storage::factory::Storage;
use crate::token::TokenIssuer;
use serde_json::{json, Map};
use std::sync::Arc;

/// The authorization server core.
///
/// Each [`authorize`](Self::authorize) call is a single-pass
/// validation-then-issuance pipeline evaluated independently; no state
/// persists across calls beyond the immutable configuration and the storage
/// backend. Safe under unbounded concurrent invocation.
#[derive(Clone)]
pub struct AuthorizationServer {
    registry: ClientRegistry,
    issuer: TokenIssuer,
    generator: CredentialGenerator,
    allowed_scopes: Vec<String>,
    lifetimes: LifetimeConfig,
}

impl AuthorizationServer {
    /// Assemble the server from a storage backend and configuration
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if the configured signing key is empty
    pub fn new(storage: Arc<Storage>, config: &AuthServerConfig) -> AuthResult<Self> {
        let issuer = TokenIssuer::new(&config.signing_key)?;

        Ok(Self {
            registry: ClientRegistry::new(storage, config.storage.operation_timeout),
            issuer,
            generator: CredentialGenerator::new(&config.credentials),
            allowed_scopes: config.allowed_scopes.clone(),
            lifetimes: config.lifetimes,
        })
    }

    /// The registry backing this server
    #[must_use]
    pub const fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// The token issuer backing this server, for downstream verification
    #[must_use]
    pub const fn token_issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Generate and register a new client credential pair
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if credential generation fails or
    /// [`AuthError::Storage`] if the registration cannot be stored
    pub async fn register_client(&self) -> AuthResult<Client> {
        // bcrypt derivation is CPU-bound; keep it off the async executor
        let generator = self.generator.clone();
        let client = tokio::task::spawn_blocking(move || generator.generate_client_credentials())
            .await
            .map_err(|e| AuthError::internal(format!("credential generation task failed: {e}")))??;

        self.registry.register_client(&client).await?;
        tracing::info!(client_id = %client.client_id, "registered new client");
        Ok(client)
    }

    /// Validate an authorization request and issue the requested artifacts,
    /// returning the redirect target string.
    ///
    /// Validation order is fixed: scope check, then client check, then the
    /// response-type branch. A request with both an invalid scope and an
    /// unknown client reports the scope error. `redirect_uri`, `scope`, and
    /// `state` are echoed verbatim into every record and claim set produced.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidScope`] if a present scope is not allowlisted
    /// - [`AuthError::InvalidClient`] if the client is not registered
    /// - [`AuthError::UnsupportedResponseType`] for any unknown response type
    /// - [`AuthError::Storage`] if code persistence fails (issuance aborts:
    ///   an unpersisted code could never be redeemed)
    /// - [`AuthError::Signing`] if token signing fails
    pub async fn authorize(&self, request: AuthorizationRequest) -> AuthResult<String> {
        if let Some(scope) = &request.scope {
            if !self.allowed_scopes.iter().any(|allowed| allowed == scope) {
                tracing::warn!(scope = %scope, "authorization rejected: scope not in allowlist");
                return Err(AuthError::InvalidScope(scope.clone()));
            }
        }

        if !self
            .registry
            .is_client_registered(&request.client_id)
            .await?
        {
            tracing::warn!(client_id = %request.client_id, "authorization rejected: unknown client");
            return Err(AuthError::InvalidClient(request.client_id));
        }

        // Issuance is lazy per branch: an unsupported response type must not
        // leave any persistence or signing side effect behind
        match request.response_type.as_str() {
            "code" => self.issue_code_redirect(&request).await,
            "token" => self.issue_token_redirect(&request),
            "code_and_token" => self.issue_code_and_token_redirect(&request).await,
            other => {
                tracing::warn!(
                    response_type = %other,
                    "authorization rejected: unsupported response type"
                );
                Err(AuthError::UnsupportedResponseType(other.to_owned()))
            }
        }
    }

    /// `response_type=code`: persist a code record, echo it in the query
    async fn issue_code_redirect(&self, request: &AuthorizationRequest) -> AuthResult<String> {
        let record = self.build_code_record(request)?;
        self.registry.persist_authorization_code(&record).await?;
        tracing::debug!(client_id = %request.client_id, "issued authorization code");

        let mut redirect = format!(
            "{}?code={}&expires_in={}",
            request.redirect_uri, record.code, record.expires_in
        );
        append_echo_params(&mut redirect, request);
        Ok(redirect)
    }

    /// `response_type=token`: sign an access token, echo it in the fragment
    fn issue_token_redirect(&self, request: &AuthorizationRequest) -> AuthResult<String> {
        let token = self.sign_access_token(request)?;
        tracing::debug!(client_id = %request.client_id, "issued access token");

        let mut redirect = format!(
            "{}#access_token={}&expires_in={}",
            request.redirect_uri,
            token,
            self.token_lifetime_ms()
        );
        append_echo_params(&mut redirect, request);
        Ok(redirect)
    }

    /// `response_type=code_and_token`: code and state in the query, token,
    /// token lifetime, and scope in the fragment
    async fn issue_code_and_token_redirect(
        &self,
        request: &AuthorizationRequest,
    ) -> AuthResult<String> {
        let record = self.build_code_record(request)?;
        let token = self.sign_access_token(request)?;
        self.registry.persist_authorization_code(&record).await?;
        tracing::debug!(
            client_id = %request.client_id,
            "issued authorization code and access token"
        );

        let mut redirect = format!("{}?code={}", request.redirect_uri, record.code);
        if let Some(state) = &request.state {
            redirect.push_str(&format!("&state={state}"));
        }
        redirect.push_str(&format!(
            "#access_token={}&expires_in={}",
            token,
            self.token_lifetime_ms()
        ));
        if let Some(scope) = &request.scope {
            redirect.push_str(&format!("&scope={scope}"));
        }
        Ok(redirect)
    }

    fn build_code_record(&self, request: &AuthorizationRequest) -> AuthResult<AuthorizationCode> {
        Ok(AuthorizationCode {
            code: self.generator.generate_authorization_code()?,
            client_id: request.client_id.clone(),
            redirect_uri: request.redirect_uri.clone(),
            scope: request.scope.clone(),
            state: request.state.clone(),
            expires_in: lifetime_ms(self.lifetimes.auth_code),
        })
    }

    fn sign_access_token(&self, request: &AuthorizationRequest) -> AuthResult<String> {
        let mut payload = Map::new();
        payload.insert("redirect_uri".to_owned(), json!(request.redirect_uri));
        if let Some(scope) = &request.scope {
            payload.insert("scope".to_owned(), json!(scope));
        }
        if let Some(state) = &request.state {
            payload.insert("state".to_owned(), json!(state));
        }

        self.issuer
            .issue(&payload, &request.client_id, self.lifetimes.access_token)
    }

    fn token_lifetime_ms(&self) -> i64 {
        lifetime_ms(self.lifetimes.access_token)
    }
}

/// Append the optional `scope` and `state` echoes, in that order
fn append_echo_params(redirect: &mut String, request: &AuthorizationRequest) {
    if let Some(scope) = &request.scope {
        redirect.push_str(&format!("&scope={scope}"));
    }
    if let Some(state) = &request.state {
        redirect.push_str(&format!("&state={state}"));
    }
}

/// Wire-format lifetime: configured in seconds, emitted in milliseconds
fn lifetime_ms(lifetime: std::time::Duration) -> i64 {
    i64::try_from(lifetime.as_millis()).unwrap_or(i64::MAX)
}
