// ABOUTME: Credential generation for client id/secret pairs and authorization codes
// ABOUTME: Routes all entropy through one injectable secure-random abstraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

use crate::config::CredentialConfig;
use crate::constants::credentials::AUTH_CODE_BYTES;
use crate::errors::{AuthError, AuthResult};
use crate::models::Client;
use base64::{engine::general_purpose, Engine as _};
use ring::rand::SecureRandom as _;
use std::fmt;
use std::sync::Arc;

/// Source of cryptographically secure random bytes.
///
/// Client ids, secret salts, and authorization codes all draw from one
/// implementation of this trait so entropy guarantees stay testable and
/// mockable.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` with cryptographically secure random bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying RNG fails
    fn fill(&self, dest: &mut [u8]) -> AuthResult<()>;
}

/// Default randomness source backed by the operating system CSPRNG
pub struct SystemRandomSource;

impl RandomSource for SystemRandomSource {
    fn fill(&self, dest: &mut [u8]) -> AuthResult<()> {
        ring::rand::SystemRandom::new().fill(dest).map_err(|_| {
            tracing::error!("system RNG failure - cannot generate secure random bytes");
            AuthError::internal("system RNG failure")
        })
    }
}

/// Generator for client credentials and authorization codes
#[derive(Clone)]
pub struct CredentialGenerator {
    rng: Arc<dyn RandomSource>,
    bcrypt_cost: u32,
    salt_length: usize,
}

impl fmt::Debug for CredentialGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialGenerator")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("salt_length", &self.salt_length)
            .finish_non_exhaustive()
    }
}

impl CredentialGenerator {
    /// Create a generator backed by the system CSPRNG
    #[must_use]
    pub fn new(config: &CredentialConfig) -> Self {
        Self::with_random_source(Arc::new(SystemRandomSource), config)
    }

    /// Create a generator with an explicit randomness source
    #[must_use]
    pub fn with_random_source(rng: Arc<dyn RandomSource>, config: &CredentialConfig) -> Self {
        Self {
            rng,
            bcrypt_cost: config.bcrypt_cost,
            salt_length: config.salt_length,
        }
    }

    /// Generate a fresh client identifier/secret pair.
    ///
    /// The secret is derived by combining the identifier with a fresh random
    /// salt and running the result through bcrypt; the hash output (embedded
    /// bcrypt salt included) is the returned secret. The raw identifier is
    /// never reused as the secret and the derivation is not reversible.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the RNG or the hash fails
    pub fn generate_client_credentials(&self) -> AuthResult<Client> {
        let client_id = self.generate_client_id()?;
        let salt = self.generate_salt()?;
        let client_secret = self.derive_secret(&client_id, &salt)?;

        Ok(Client {
            client_id,
            client_secret,
        })
    }

    /// Generate a globally-unique client identifier
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the RNG fails
    pub fn generate_client_id(&self) -> AuthResult<String> {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes)?;
        let id = uuid::Builder::from_random_bytes(bytes).into_uuid();
        Ok(format!("client_{}", id.simple()))
    }

    /// Generate a fresh secret salt, base64url-encoded
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the RNG fails
    pub fn generate_salt(&self) -> AuthResult<String> {
        let mut bytes = vec![0u8; self.salt_length];
        self.rng.fill(&mut bytes)?;
        Ok(general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Derive the stored client secret from an identifier and salt
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if bcrypt hashing fails
    pub fn derive_secret(&self, client_id: &str, salt: &str) -> AuthResult<String> {
        bcrypt::hash(format!("{client_id}{salt}"), self.bcrypt_cost)
            .map_err(|e| AuthError::internal(format!("secret hashing failed: {e}")))
    }

    /// Verify an identifier+salt combination against a stored secret hash
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the stored hash is malformed
    pub fn verify_secret(client_id: &str, salt: &str, secret: &str) -> AuthResult<bool> {
        bcrypt::verify(format!("{client_id}{salt}"), secret)
            .map_err(|e| AuthError::internal(format!("secret verification failed: {e}")))
    }

    /// Generate a short, non-sequential authorization code.
    ///
    /// 16 random bytes rendered as 22 base64url characters: unsuitable for
    /// guessing, negligible collision probability across the service's
    /// lifetime. Uniqueness is delegated to entropy, not locking.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the RNG fails
    pub fn generate_authorization_code(&self) -> AuthResult<String> {
        let mut bytes = [0u8; AUTH_CODE_BYTES];
        self.rng.fill(&mut bytes)?;
        Ok(general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }
}
