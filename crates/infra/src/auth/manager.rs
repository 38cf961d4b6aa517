//! OAuth 2.0 authorization-code flow with PKCE.

use dashmap::DashMap;
use learnarc_domain::{AuthConfig, LearnArcError, Result};
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info};

use super::pkce::{validate_state, PkceChallenge};
use crate::http::HttpClient;

/// An authorization URL plus the state the callback must echo.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// Identity claims fetched from the provider's userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    /// Stable subject identifier.
    pub sub: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OAuth manager: builds authorization URLs and exchanges callback codes.
///
/// Pending PKCE challenges are held in memory keyed by state; a challenge
/// is consumed on first use, so replaying a callback fails.
pub struct OAuthManager {
    config: AuthConfig,
    http_client: HttpClient,
    pending: DashMap<String, PkceChallenge>,
}

impl OAuthManager {
    pub fn new(config: AuthConfig, http_client: HttpClient) -> Self {
        Self { config, http_client, pending: DashMap::new() }
    }

    /// Generate an authorization URL for browser-based login.
    pub fn begin_authorization(&self) -> AuthorizationRequest {
        let challenge = PkceChallenge::generate();
        let state = challenge.state.clone();

        let params = [
            ("response_type", "code"),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("scope", "openid email profile"),
            ("state", state.as_str()),
            ("code_challenge", challenge.code_challenge.as_str()),
            ("code_challenge_method", challenge.challenge_method()),
        ];
        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}?{}", self.config.authorization_url, query);

        self.pending.insert(state.clone(), challenge);
        debug!(state, "authorization round trip started");

        AuthorizationRequest { url, state }
    }

    /// Exchange an authorization code for the signed-in user's identity.
    ///
    /// Validates the CSRF state, performs the token exchange with the PKCE
    /// verifier, and fetches the userinfo document.
    pub async fn exchange_code(&self, code: &str, state: &str) -> Result<UserInfo> {
        let (_, challenge) = self
            .pending
            .remove(state)
            .ok_or_else(|| LearnArcError::Auth("unknown or replayed sign-in state".into()))?;

        if !validate_state(&challenge.state, state) {
            return Err(LearnArcError::Auth("state mismatch in sign-in callback".into()));
        }

        let mut form = vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("client_id".to_string(), self.config.client_id.clone()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), self.config.redirect_uri.clone()),
            ("code_verifier".to_string(), challenge.code_verifier.clone()),
        ];
        if let Some(secret) = &self.config.client_secret {
            form.push(("client_secret".to_string(), secret.clone()));
        }

        let request =
            self.http_client.request(Method::POST, &self.config.token_url).form(&form);
        let response = self.http_client.send(request).await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LearnArcError::Auth(format!("token exchange failed ({status}): {body}")));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|err| LearnArcError::Auth(format!("invalid token response: {err}")))?;

        let user_info = self.fetch_user_info(&tokens.access_token).await?;
        info!(subject = %user_info.sub, "sign-in code exchanged");
        Ok(user_info)
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo> {
        let request = self
            .http_client
            .request(Method::GET, &self.config.userinfo_url)
            .header("Authorization", format!("Bearer {access_token}"));
        let response = self.http_client.send(request).await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(LearnArcError::Auth(format!("userinfo fetch failed ({status})")));
        }

        response
            .json::<UserInfo>()
            .await
            .map_err(|err| LearnArcError::Auth(format!("invalid userinfo response: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn manager(server: &MockServer) -> OAuthManager {
        let config = AuthConfig {
            client_id: "client-1".into(),
            client_secret: None,
            redirect_uri: "http://127.0.0.1:8080/auth/callback".into(),
            authorization_url: format!("{}/authorize", server.uri()),
            token_url: format!("{}/token", server.uri()),
            userinfo_url: format!("{}/userinfo", server.uri()),
            session_ttl_hours: 1,
        };
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .max_attempts(1)
            .build()
            .expect("http client");
        OAuthManager::new(config, http_client)
    }

    #[tokio::test]
    async fn authorization_url_carries_pkce_and_state() {
        let server = MockServer::start().await;
        let manager = manager(&server);

        let request = manager.begin_authorization();
        assert!(request.url.contains("response_type=code"));
        assert!(request.url.contains("client_id=client-1"));
        assert!(request.url.contains("code_challenge_method=S256"));
        assert!(request.url.contains(&format!("state={}", request.state)));
    }

    #[tokio::test]
    async fn exchange_round_trip_fetches_user_info() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code_verifier="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "at-123",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("Authorization", "Bearer at-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sub": "google-123",
                "email": "user@example.com",
                "name": "User Example",
                "picture": "https://img.example/avatar.png"
            })))
            .mount(&server)
            .await;

        let manager = manager(&server);
        let request = manager.begin_authorization();
        let user = manager.exchange_code("auth-code", &request.state).await.expect("exchange");

        assert_eq!(user.sub, "google-123");
        assert_eq!(user.email, "user@example.com");
        assert_eq!(user.picture.as_deref(), Some("https://img.example/avatar.png"));
    }

    #[tokio::test]
    async fn unknown_state_is_rejected() {
        let server = MockServer::start().await;
        let manager = manager(&server);

        let err = manager.exchange_code("code", "forged-state").await.expect_err("should fail");
        assert!(matches!(err, LearnArcError::Auth(_)));
    }

    #[tokio::test]
    async fn callback_replay_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST")).and(path("/token")).respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "at-123" })),
        )
        .mount(&server)
        .await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sub": "s" })))
            .mount(&server)
            .await;

        let manager = manager(&server);
        let request = manager.begin_authorization();
        manager.exchange_code("code", &request.state).await.expect("first exchange");

        let err =
            manager.exchange_code("code", &request.state).await.expect_err("replay rejected");
        assert!(matches!(err, LearnArcError::Auth(_)));
    }

    #[tokio::test]
    async fn failed_token_exchange_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let manager = manager(&server);
        let request = manager.begin_authorization();
        let err = manager.exchange_code("bad", &request.state).await.expect_err("should fail");
        assert!(matches!(err, LearnArcError::Auth(_)));
    }
}
