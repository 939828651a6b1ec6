// ABOUTME: End-to-end tests for the authorization engine over the document backend
// ABOUTME: Error precedence, exact redirect formats, persistence side effects, single-use codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Arc;
use vela_oauth2_server::config::AuthServerConfig;
use vela_oauth2_server::errors::AuthError;
use vela_oauth2_server::models::AuthorizationRequest;
use vela_oauth2_server::server::AuthorizationServer;
use vela_oauth2_server::storage::factory::Storage;

const REDIRECT_URI: &str = "https://app.example.com/cb";

async fn test_server() -> AuthorizationServer {
    let mut config = AuthServerConfig::new(
        "sqlite::memory:",
        "test-signing-key",
        vec!["orders.read".to_owned(), "orders.write".to_owned()],
    );
    // bcrypt minimum cost keeps the suite fast
    config.credentials.bcrypt_cost = 4;

    let storage = Arc::new(Storage::new(&config.storage).await.unwrap());
    AuthorizationServer::new(storage, &config).unwrap()
}

fn request(response_type: &str, client_id: &str) -> AuthorizationRequest {
    AuthorizationRequest {
        response_type: response_type.to_owned(),
        client_id: client_id.to_owned(),
        redirect_uri: REDIRECT_URI.to_owned(),
        scope: Some("orders.read".to_owned()),
        state: Some("xyz".to_owned()),
    }
}

fn extract_between<'a>(haystack: &'a str, start: &str, end: &str) -> &'a str {
    let from = haystack.find(start).unwrap() + start.len();
    let rest = &haystack[from..];
    rest.find(end).map_or(rest, |to| &rest[..to])
}

// =============================================================================
// Validation order and error kinds
// =============================================================================

#[tokio::test]
async fn invalid_scope_takes_precedence_over_invalid_client() {
    let server = test_server().await;

    // Neither the scope nor the client is valid; the scope error must win
    let mut req = request("code", "client_unknown");
    req.scope = Some("payments.write".to_owned());

    let result = server.authorize(req).await;
    assert!(matches!(result, Err(AuthError::InvalidScope(scope)) if scope == "payments.write"));
}

#[tokio::test]
async fn unregistered_client_is_rejected() {
    let server = test_server().await;

    let result = server.authorize(request("code", "client_unknown")).await;
    assert!(matches!(result, Err(AuthError::InvalidClient(id)) if id == "client_unknown"));

    // Same outcome with an absent scope
    let mut req = request("code", "client_unknown");
    req.scope = None;
    let result = server.authorize(req).await;
    assert!(matches!(result, Err(AuthError::InvalidClient(_))));
}

#[tokio::test]
async fn absent_scope_is_always_permitted() {
    let server = test_server().await;
    let client = server.register_client().await.unwrap();

    let mut req = request("code", &client.client_id);
    req.scope = None;

    assert!(server.authorize(req).await.is_ok());
}

#[tokio::test]
async fn unsupported_response_type_is_rejected() {
    let server = test_server().await;
    let client = server.register_client().await.unwrap();

    let result = server.authorize(request("id_token", &client.client_id)).await;
    assert!(matches!(
        result,
        Err(AuthError::UnsupportedResponseType(kind)) if kind == "id_token"
    ));
}

// =============================================================================
// response_type=code
// =============================================================================

#[tokio::test]
async fn code_redirect_has_exact_format_and_persists_the_record() {
    let server = test_server().await;
    let client = server.register_client().await.unwrap();

    let redirect = server
        .authorize(request("code", &client.client_id))
        .await
        .unwrap();

    let code = extract_between(&redirect, "?code=", "&").to_owned();
    assert_eq!(
        redirect,
        format!("{REDIRECT_URI}?code={code}&expires_in=15000&scope=orders.read&state=xyz")
    );

    let record = server
        .registry()
        .consume_authorization_code(&code)
        .await
        .unwrap()
        .expect("issued code must be persisted under its own value");

    assert_eq!(record.code, code);
    assert_eq!(record.client_id, client.client_id);
    assert_eq!(record.redirect_uri, REDIRECT_URI);
    assert_eq!(record.scope.as_deref(), Some("orders.read"));
    assert_eq!(record.state.as_deref(), Some("xyz"));
    assert_eq!(record.expires_in, 15_000);
}

#[tokio::test]
async fn code_redirect_omits_absent_optional_params() {
    let server = test_server().await;
    let client = server.register_client().await.unwrap();

    let mut req = request("code", &client.client_id);
    req.scope = None;
    req.state = None;

    let redirect = server.authorize(req).await.unwrap();
    let code = extract_between(&redirect, "?code=", "&").to_owned();

    assert_eq!(redirect, format!("{REDIRECT_URI}?code={code}&expires_in=15000"));
    assert!(!redirect.contains("scope"));
    assert!(!redirect.contains("state"));
}

#[tokio::test]
async fn authorization_codes_are_single_use() {
    let server = test_server().await;
    let client = server.register_client().await.unwrap();

    let redirect = server
        .authorize(request("code", &client.client_id))
        .await
        .unwrap();
    let code = extract_between(&redirect, "?code=", "&").to_owned();

    let first = server
        .registry()
        .consume_authorization_code(&code)
        .await
        .unwrap();
    assert!(first.is_some());

    let second = server
        .registry()
        .consume_authorization_code(&code)
        .await
        .unwrap();
    assert!(second.is_none());
}

// =============================================================================
// response_type=token
// =============================================================================

#[tokio::test]
async fn token_redirect_has_exact_format_and_verifiable_claims() {
    let server = test_server().await;
    let client = server.register_client().await.unwrap();

    let redirect = server
        .authorize(request("token", &client.client_id))
        .await
        .unwrap();

    let token = extract_between(&redirect, "#access_token=", "&").to_owned();
    assert_eq!(
        redirect,
        format!("{REDIRECT_URI}#access_token={token}&expires_in=3600000&scope=orders.read&state=xyz")
    );

    let claims = server.token_issuer().verify(&token).unwrap();
    assert_eq!(claims.redirect_uri, REDIRECT_URI);
    assert_eq!(claims.scope.as_deref(), Some("orders.read"));
    assert_eq!(claims.state.as_deref(), Some("xyz"));
    assert_eq!(claims.iss, client.client_id);
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[tokio::test]
async fn token_redirect_omits_absent_optional_params() {
    let server = test_server().await;
    let client = server.register_client().await.unwrap();

    let mut req = request("token", &client.client_id);
    req.scope = None;
    req.state = None;

    let redirect = server.authorize(req).await.unwrap();
    let token = extract_between(&redirect, "#access_token=", "&").to_owned();

    assert_eq!(
        redirect,
        format!("{REDIRECT_URI}#access_token={token}&expires_in=3600000")
    );

    let claims = server.token_issuer().verify(&token).unwrap();
    assert!(claims.scope.is_none());
    assert!(claims.state.is_none());
}

// =============================================================================
// response_type=code_and_token
// =============================================================================

#[tokio::test]
async fn hybrid_redirect_carries_query_code_and_fragment_token() {
    let server = test_server().await;
    let client = server.register_client().await.unwrap();

    let redirect = server
        .authorize(request("code_and_token", &client.client_id))
        .await
        .unwrap();

    let (query, fragment) = redirect.split_once('#').unwrap();
    let code = extract_between(query, "?code=", "&").to_owned();
    let token = extract_between(fragment, "access_token=", "&").to_owned();

    // Code and state travel in the query; token, lifetime, and scope in the fragment
    assert_eq!(query, format!("{REDIRECT_URI}?code={code}&state=xyz"));
    assert_eq!(
        fragment,
        format!("access_token={token}&expires_in=3600000&scope=orders.read")
    );

    // Both issuance side effects occurred
    let record = server
        .registry()
        .consume_authorization_code(&code)
        .await
        .unwrap()
        .expect("hybrid issuance must persist the code record");
    assert_eq!(record.client_id, client.client_id);
    assert_eq!(record.expires_in, 15_000);

    let claims = server.token_issuer().verify(&token).unwrap();
    assert_eq!(claims.iss, client.client_id);
    assert_eq!(claims.exp - claims.iat, 3600);
}

// =============================================================================
// Registration and construction
// =============================================================================

#[tokio::test]
async fn registered_clients_are_discoverable() {
    let server = test_server().await;
    let client = server.register_client().await.unwrap();

    assert!(server
        .registry()
        .is_client_registered(&client.client_id)
        .await
        .unwrap());
    assert!(!server
        .registry()
        .is_client_registered("client_ghost")
        .await
        .unwrap());
}

#[tokio::test]
async fn empty_signing_key_fails_construction() {
    let config = AuthServerConfig::new("sqlite::memory:", "", vec![]);
    let storage = Arc::new(Storage::new(&config.storage).await.unwrap());

    let result = AuthorizationServer::new(storage, &config);
    assert!(matches!(result, Err(AuthError::Signing(_))));
}
