//! Google implementation of [`IdentityProvider`].

use async_trait::async_trait;
use tracing::{debug, error, warn};
use url::Url;

use crate::{
    AuthError, AuthResult, ClientSecrets, IdentityProvider, TokenInfo, TokenResponse, UserInfo,
    GOOGLE_PROVIDER, POSTMESSAGE_REDIRECT_URI,
};

const TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/tokeninfo";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/userinfo";
const REVOKE_URL: &str = "https://accounts.google.com/o/oauth2/revoke";

/// Endpoints used besides the token endpoint from the client secrets.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub token_url: Url,
    pub tokeninfo_url: Url,
    pub userinfo_url: Url,
    pub revoke_url: Url,
}

impl GoogleEndpoints {
    /// Google's public endpoints, with the token endpoint taken from the
    /// client secrets.
    pub fn from_secrets(secrets: &ClientSecrets) -> AuthResult<Self> {
        Ok(Self {
            token_url: parse_url(&secrets.web.token_uri)?,
            tokeninfo_url: parse_url(TOKENINFO_URL)?,
            userinfo_url: parse_url(USERINFO_URL)?,
            revoke_url: parse_url(REVOKE_URL)?,
        })
    }
}

fn parse_url(raw: &str) -> AuthResult<Url> {
    Url::parse(raw).map_err(|e| AuthError::Configuration(format!("Invalid URL {}: {}", raw, e)))
}

/// Talks to Google's OAuth2 endpoints over HTTP.
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    client: reqwest::Client,
    secrets: ClientSecrets,
    endpoints: GoogleEndpoints,
}

impl GoogleProvider {
    /// Creates a provider using Google's public endpoints.
    pub fn new(secrets: ClientSecrets) -> AuthResult<Self> {
        let endpoints = GoogleEndpoints::from_secrets(&secrets)?;
        Ok(Self::with_endpoints(secrets, endpoints))
    }

    pub fn with_endpoints(secrets: ClientSecrets, endpoints: GoogleEndpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            secrets,
            endpoints,
        }
    }

    pub fn client_id(&self) -> &str {
        self.secrets.client_id()
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        GOOGLE_PROVIDER
    }

    async fn exchange_code(&self, code: &str) -> AuthResult<TokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.secrets.web.client_id.as_str()),
            ("client_secret", self.secrets.web.client_secret.as_str()),
            ("redirect_uri", POSTMESSAGE_REDIRECT_URI),
        ];

        let response = self
            .client
            .post(self.endpoints.token_url.clone())
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!("Token request failed: {}", e);
                AuthError::ExchangeFailed
            })?;

        if !response.status().is_success() {
            // Don't log the body, it may echo the client secret
            warn!(status = %response.status(), "Token endpoint rejected the authorization code");
            return Err(AuthError::ExchangeFailed);
        }

        response.json().await.map_err(|e| {
            error!("Failed to parse token response: {}", e);
            AuthError::ExchangeFailed
        })
    }

    async fn token_info(&self, access_token: &str) -> AuthResult<TokenInfo> {
        // Google answers 400 with an `error` field for bad tokens, so the
        // status is not checked here.
        let response = self
            .client
            .get(self.endpoints.tokeninfo_url.clone())
            .query(&[("access_token", access_token)])
            .send()
            .await?;

        debug!(status = %response.status(), "Token info response");

        response.json().await.map_err(|e| {
            error!("Failed to parse token info response: {}", e);
            AuthError::Provider("Invalid token info response".to_string())
        })
    }

    async fn user_info(&self, access_token: &str) -> AuthResult<UserInfo> {
        let response = self
            .client
            .get(self.endpoints.userinfo_url.clone())
            .query(&[("access_token", access_token), ("alt", "json")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            error!(status = %status, "User info endpoint returned error");
            return Err(AuthError::Provider(format!(
                "User info request failed with status {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            error!("Failed to parse user info response: {}", e);
            AuthError::Provider("Invalid user info response".to_string())
        })
    }

    async fn revoke_token(&self, access_token: &str) -> AuthResult<()> {
        let response = self
            .client
            .get(self.endpoints.revoke_url.clone())
            .query(&[("token", access_token)])
            .send()
            .await
            .map_err(|e| {
                warn!("Revoke request failed: {}", e);
                AuthError::RevokeFailed
            })?;

        if response.status() != reqwest::StatusCode::OK {
            warn!(status = %response.status(), "Revoke endpoint refused the token");
            return Err(AuthError::RevokeFailed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets() -> ClientSecrets {
        ClientSecrets::from_json(
            r#"{"web": {"client_id": "client-123", "client_secret": "s3cret",
                        "token_uri": "https://oauth2.example.com/token"}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_endpoints_from_secrets() {
        let endpoints = GoogleEndpoints::from_secrets(&secrets()).unwrap();
        assert_eq!(endpoints.token_url.as_str(), "https://oauth2.example.com/token");
        assert_eq!(endpoints.tokeninfo_url.as_str(), TOKENINFO_URL);
        assert_eq!(endpoints.revoke_url.host_str(), Some("accounts.google.com"));
    }

    #[test]
    fn test_invalid_token_uri() {
        let mut secrets = secrets();
        secrets.web.token_uri = "not a url".to_string();
        let err = GoogleProvider::new(secrets).unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }

    #[test]
    fn test_provider_tag() {
        let provider = GoogleProvider::new(secrets()).unwrap();
        assert_eq!(provider.name(), "google");
        assert_eq!(provider.client_id(), "client-123");
    }
}
