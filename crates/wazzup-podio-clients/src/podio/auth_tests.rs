//! Tests for Podio app-grant authentication.

use super::*;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn configured(api_url: &str) -> PodioConfig {
    PodioConfig::default()
        .with_api_url(api_url)
        .with_credentials("client-1", "client-secret", "777", "app-token")
}

mod access_token_tests {
    use super::*;

    #[test]
    fn test_fresh_token_not_expired() {
        let token = AccessToken::new("abc", 3600).unwrap();

        assert!(!token.is_expired());
        assert_eq!(token.secret(), "abc");
    }

    #[test]
    fn test_zero_lifetime_token_is_expired() {
        let token = AccessToken::new("abc", 0).unwrap();

        assert!(token.is_expired());
    }

    /// Debug output must never contain the token.
    #[test]
    fn test_debug_redacts_token() {
        let token = AccessToken::new("very-secret-token", 60).unwrap();

        let debug = format!("{:?}", token);

        assert!(!debug.contains("very-secret-token"));
        assert!(debug.contains("<REDACTED>"));
    }

    /// Lifetimes beyond the representable range are an error.
    #[test]
    fn test_out_of_range_lifetime_rejected() {
        let error = AccessToken::new("abc", i64::MAX).unwrap_err();
        assert!(matches!(error, AuthError::InvalidTokenResponse { .. }));

        let error = AccessToken::new("abc", 100_000_000_000_000).unwrap_err();
        assert!(matches!(error, AuthError::InvalidTokenResponse { .. }));
    }
}

mod check_credentials_tests {
    use super::*;

    #[test]
    fn test_all_credentials_present() {
        assert!(check_credentials(&configured("http://localhost")).is_ok());
    }

    /// Every missing credential is named.
    #[test]
    fn test_missing_credentials_listed() {
        let mut config = configured("http://localhost");
        config.client_secret = String::new();
        config.app_token = "  ".to_string();

        let error = check_credentials(&config).unwrap_err();

        assert_eq!(
            error,
            AuthError::MissingCredentials {
                missing: "client_secret, app_token".to_string()
            }
        );
    }
}

mod request_app_token_tests {
    use super::*;

    /// The app grant is posted as a form and the token parsed.
    #[tokio::test]
    async fn test_successful_token_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=app"))
            .and(body_string_contains("app_id=777"))
            .and(body_string_contains("client_id=client-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "token-1",
                "expires_in": 28800,
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let http = reqwest::Client::new();
        let token = request_app_token(&http, &configured(&server.uri()))
            .await
            .expect("token exchange should succeed");

        assert_eq!(token.secret(), "token-1");
        assert!(token.expires_at() > Utc::now() + TimeDelta::seconds(28000));
    }

    /// A missing `expires_in` falls back to one hour.
    #[tokio::test]
    async fn test_default_lifetime() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "token-2"})),
            )
            .mount(&server)
            .await;

        let http = reqwest::Client::new();
        let token = request_app_token(&http, &configured(&server.uri()))
            .await
            .unwrap();

        let remaining = token.expires_at() - Utc::now();
        assert!(remaining > TimeDelta::seconds(3500));
        assert!(remaining <= TimeDelta::seconds(DEFAULT_TOKEN_LIFETIME_SECONDS));
    }

    /// An absurd `expires_in` from Podio is reported, not trusted.
    #[tokio::test]
    async fn test_huge_expires_in_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "expires_in": 100_000_000_000_000_i64
            })))
            .mount(&server)
            .await;

        let http = reqwest::Client::new();
        let error = request_app_token(&http, &configured(&server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(error, AuthError::InvalidTokenResponse { .. }));
    }

    /// Rejections carry the status code and body.
    #[tokio::test]
    async fn test_rejected_token_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let http = reqwest::Client::new();
        let error = request_app_token(&http, &configured(&server.uri()))
            .await
            .unwrap_err();

        assert_eq!(
            error,
            AuthError::TokenRejected {
                status: 401,
                message: "invalid_grant".to_string()
            }
        );
    }

    /// Missing credentials fail before any request is made.
    #[tokio::test]
    async fn test_missing_credentials_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = PodioConfig::default().with_api_url(server.uri());
        let http = reqwest::Client::new();
        let error = request_app_token(&http, &config).await.unwrap_err();

        assert!(matches!(error, AuthError::MissingCredentials { .. }));
    }

    /// A 2xx body without a token is rejected.
    #[tokio::test]
    async fn test_invalid_token_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let http = reqwest::Client::new();
        let error = request_app_token(&http, &configured(&server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(error, AuthError::InvalidTokenResponse { .. }));
    }
}
