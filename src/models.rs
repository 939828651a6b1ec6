// ABOUTME: Core data models for client registration and authorization requests
// ABOUTME: Defines the persisted Client and AuthorizationCode records and the transient request shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

use serde::{Deserialize, Serialize};

/// A registered client credential pair.
///
/// `client_secret` is the bcrypt hash output (the embedded bcrypt salt
/// included), never the raw identifier or salt. Clients are immutable after
/// registration and never expire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Opaque unique client identifier
    pub client_id: String,
    /// Client secret, hashed at rest
    pub client_secret: String,
}

/// An authorization request. Transient: lives only for the duration of one
/// [`authorize`](crate::server::AuthorizationServer::authorize) call and is
/// never persisted.
///
/// `response_type` stays a string at this boundary so that an unknown value
/// reaches the engine and fails with `UnsupportedResponseType` instead of
/// dying in deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationRequest {
    /// Requested issuance mode: `code`, `token`, or `code_and_token`
    pub response_type: String,
    /// Client identifier
    pub client_id: String,
    /// Redirect URI the response parameters are appended to
    pub redirect_uri: String,
    /// Requested scope, validated against the server allowlist when present
    pub scope: Option<String>,
    /// Opaque state echoed back to the caller
    pub state: Option<String>,
}

/// An issued authorization code record, persisted keyed by the code value and
/// consumed exactly once by the token-exchange endpoint.
///
/// `redirect_uri`, `scope`, and `state` are echoed verbatim from the
/// originating request and must never be altered in transit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationCode {
    /// Opaque unique code value
    pub code: String,
    /// Client the code was issued to
    pub client_id: String,
    /// Redirect URI of the originating request
    pub redirect_uri: String,
    /// Scope of the originating request
    pub scope: Option<String>,
    /// State of the originating request
    pub state: Option<String>,
    /// Milliseconds until the code must be treated as expired
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_request_deserializes_minimal_shape() {
        let json = r#"{
            "response_type": "code",
            "client_id": "client_abc",
            "redirect_uri": "https://example.com/cb"
        }"#;

        let request: AuthorizationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.response_type, "code");
        assert!(request.scope.is_none());
        assert!(request.state.is_none());
    }

    #[test]
    fn authorization_code_round_trips_through_json() {
        let record = AuthorizationCode {
            code: "c0d3".to_owned(),
            client_id: "client_abc".to_owned(),
            redirect_uri: "https://example.com/cb".to_owned(),
            scope: Some("orders.read".to_owned()),
            state: None,
            expires_in: 15_000,
        };

        let json = serde_json::to_string(&record).unwrap();
        let decoded: AuthorizationCode = serde_json::from_str(&json).unwrap();
        assert_eq!(record, decoded);
    }
}
