// ABOUTME: Signed access token issuance with a server-wide symmetric key
// ABOUTME: HS256 JWT encoding of a claims payload plus issuer and expiry claims
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

use crate::errors::{AuthError, AuthResult};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Claims carried by an issued access token.
///
/// The token is self-contained: signature and expiry claim are the only
/// integrity/freshness guarantee, no lookup table exists. `redirect_uri`,
/// `scope`, and `state` are echoed verbatim from the originating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Redirect URI of the originating request
    pub redirect_uri: String,
    /// Granted scope, omitted when the request carried none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Opaque request state, omitted when the request carried none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Issuer, set to the requesting client id
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch)
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
}

/// Issues HS256-signed access tokens with a single server-wide key.
///
/// Symmetric signing is sufficient here: issuer and verifier share deployment
/// trust. The key is injected at construction and immutable afterwards.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    /// Create an issuer from the server signing key
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if the key is empty
    pub fn new(signing_key: &str) -> AuthResult<Self> {
        if signing_key.is_empty() {
            return Err(AuthError::Signing("signing key is empty".to_owned()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(signing_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(signing_key.as_bytes()),
        })
    }

    /// Sign `payload` plus an issuer claim set to `client_id` and an expiry
    /// claim computed from `expires_in`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if token encoding fails
    pub fn issue(
        &self,
        payload: &Map<String, Value>,
        client_id: &str,
        expires_in: Duration,
    ) -> AuthResult<String> {
        let now = Utc::now();
        let expiry = now
            + chrono::Duration::from_std(expires_in)
                .map_err(|e| AuthError::internal(format!("token lifetime out of range: {e}")))?;

        let mut claims = payload.clone();
        claims.insert("iss".to_owned(), json!(client_id));
        claims.insert("iat".to_owned(), json!(now.timestamp()));
        claims.insert("exp".to_owned(), json!(expiry.timestamp()));

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token's signature and expiry and return its claims.
    ///
    /// Not exercised by the authorization flow itself; provided for the
    /// downstream token-exchange and resource consumers.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if the signature is invalid, the token
    /// is malformed, or the expiry claim is in the past
    pub fn verify(&self, token: &str) -> AuthResult<TokenClaims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
