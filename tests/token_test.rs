// ABOUTME: Unit tests for signed access token issuance
// ABOUTME: Validates claims echo, issuer identity, expiry accounting, and tamper rejection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serde_json::{json, Map};
use std::time::Duration;
use vela_oauth2_server::errors::AuthError;
use vela_oauth2_server::token::TokenIssuer;

const SIGNING_KEY: &str = "test-signing-key";

fn full_payload() -> Map<String, serde_json::Value> {
    let mut payload = Map::new();
    payload.insert(
        "redirect_uri".to_owned(),
        json!("https://app.example.com/cb"),
    );
    payload.insert("scope".to_owned(), json!("orders.read"));
    payload.insert("state".to_owned(), json!("af0ifjsldkj"));
    payload
}

#[test]
fn issued_token_echoes_payload_and_issuer() {
    let issuer = TokenIssuer::new(SIGNING_KEY).unwrap();
    let token = issuer
        .issue(&full_payload(), "client_abc", Duration::from_secs(3600))
        .unwrap();

    let claims = issuer.verify(&token).unwrap();
    assert_eq!(claims.redirect_uri, "https://app.example.com/cb");
    assert_eq!(claims.scope.as_deref(), Some("orders.read"));
    assert_eq!(claims.state.as_deref(), Some("af0ifjsldkj"));
    assert_eq!(claims.iss, "client_abc");
}

#[test]
fn expiry_claim_matches_the_requested_lifetime() {
    let issuer = TokenIssuer::new(SIGNING_KEY).unwrap();

    let token = issuer
        .issue(&full_payload(), "client_abc", Duration::from_secs(3600))
        .unwrap();
    let claims = issuer.verify(&token).unwrap();
    assert_eq!(claims.exp - claims.iat, 3600);

    let token = issuer
        .issue(&full_payload(), "client_abc", Duration::from_secs(60))
        .unwrap();
    let claims = issuer.verify(&token).unwrap();
    assert_eq!(claims.exp - claims.iat, 60);
}

#[test]
fn absent_scope_and_state_stay_absent_in_claims() {
    let issuer = TokenIssuer::new(SIGNING_KEY).unwrap();
    let mut payload = Map::new();
    payload.insert(
        "redirect_uri".to_owned(),
        json!("https://app.example.com/cb"),
    );

    let token = issuer
        .issue(&payload, "client_abc", Duration::from_secs(3600))
        .unwrap();

    let claims = issuer.verify(&token).unwrap();
    assert!(claims.scope.is_none());
    assert!(claims.state.is_none());
}

#[test]
fn tampered_token_is_rejected() {
    let issuer = TokenIssuer::new(SIGNING_KEY).unwrap();
    let token = issuer
        .issue(&full_payload(), "client_abc", Duration::from_secs(3600))
        .unwrap();

    // Corrupt the payload segment; the signature can no longer match
    let tampered = token.replacen('.', ".eyJ", 1);
    assert_ne!(tampered, token);

    assert!(matches!(
        issuer.verify(&tampered),
        Err(AuthError::Signing(_))
    ));
}

#[test]
fn token_signed_with_a_different_key_is_rejected() {
    let issuer = TokenIssuer::new(SIGNING_KEY).unwrap();
    let other = TokenIssuer::new("another-signing-key").unwrap();

    let token = issuer
        .issue(&full_payload(), "client_abc", Duration::from_secs(3600))
        .unwrap();

    assert!(matches!(other.verify(&token), Err(AuthError::Signing(_))));
}
