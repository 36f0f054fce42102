//! Tests for the auth module

use super::*;
use base64::Engine;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn refresh_config(server: &MockServer) -> AuthConfig {
    AuthConfig::Oauth2Refresh {
        token_url: format!("{}/oauth2/v1/tokens/bearer", server.uri()),
        client_id: "client-abc".to_string(),
        client_secret: "secret-xyz".to_string(),
        refresh_token: "rt-1".to_string(),
    }
}

#[tokio::test]
async fn test_no_auth() {
    let auth = Authenticator::new(AuthConfig::None);
    let client = reqwest::Client::new();
    let req = client.get("https://example.com/api");

    let built = auth.apply(req).await.unwrap().build().unwrap();
    assert!(built.headers().get("Authorization").is_none());
}

#[tokio::test]
async fn test_bearer_token() {
    let auth = Authenticator::new(AuthConfig::Bearer {
        token: "my-bearer-token".to_string(),
    });

    let client = reqwest::Client::new();
    let req = client.get("https://example.com/api");
    let built = auth.apply(req).await.unwrap().build().unwrap();

    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer my-bearer-token"
    );
    assert!(auth.current_refresh_token().await.is_none());
}

#[tokio::test]
async fn test_refresh_uses_basic_client_auth_and_form_body() {
    let server = MockServer::start().await;
    let basic = base64::engine::general_purpose::STANDARD.encode("client-abc:secret-xyz");

    Mock::given(method("POST"))
        .and(path("/oauth2/v1/tokens/bearer"))
        .and(header("Authorization", format!("Basic {basic}").as_str()))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=rt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-1",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "rt-2",
            "x_refresh_token_expires_in": 8_726_400
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = Authenticator::new(refresh_config(&server));
    let client = reqwest::Client::new();

    let built = auth
        .apply(client.get("https://example.com/api"))
        .await
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(built.headers().get("Authorization").unwrap(), "Bearer access-1");

    // Second use is served from the cache
    let built = auth
        .apply(client.get("https://example.com/api"))
        .await
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(built.headers().get("Authorization").unwrap(), "Bearer access-1");

    assert_eq!(auth.current_refresh_token().await.as_deref(), Some("rt-2"));
}

#[tokio::test]
async fn test_clear_cache_uses_rotated_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/v1/tokens/bearer"))
        .and(body_string_contains("refresh_token=rt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-1",
            "expires_in": 3600,
            "refresh_token": "rt-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth2/v1/tokens/bearer"))
        .and(body_string_contains("refresh_token=rt-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-2",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = Authenticator::new(refresh_config(&server));
    let client = reqwest::Client::new();

    auth.apply(client.get("https://example.com/api"))
        .await
        .unwrap();
    auth.clear_cache().await;

    let built = auth
        .apply(client.get("https://example.com/api"))
        .await
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(built.headers().get("Authorization").unwrap(), "Bearer access-2");
    // No rotation in the second response, so the previous token is kept
    assert_eq!(auth.current_refresh_token().await.as_deref(), Some("rt-2"));
}

#[tokio::test]
async fn test_refresh_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/v1/tokens/bearer"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({"error": "invalid_grant"})),
        )
        .mount(&server)
        .await;

    let auth = Authenticator::new(refresh_config(&server));
    let client = reqwest::Client::new();

    let err = auth
        .apply(client.get("https://example.com/api"))
        .await
        .unwrap_err();
    assert!(err.is_auth_failure());
    assert!(err.to_string().contains("invalid_grant"));
}

#[test]
fn test_authorization_url() {
    let url = authorization_url("client-abc", "https://app.example.com/callback", "st4te").unwrap();

    assert!(url.as_str().starts_with(AUTHORIZATION_URL));
    let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
    assert_eq!(pairs["client_id"], "client-abc");
    assert_eq!(pairs["response_type"], "code");
    assert_eq!(pairs["scope"], ACCOUNTING_SCOPE);
    assert_eq!(pairs["redirect_uri"], "https://app.example.com/callback");
    assert_eq!(pairs["state"], "st4te");
}
