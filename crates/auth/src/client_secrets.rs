//! OAuth2 client-secrets document.
//!
//! The document is the JSON file a provider console hands out for a web
//! client, e.g.
//!
//! ```json
//! {"web": {"client_id": "...", "client_secret": "...",
//!          "auth_uri": "...", "token_uri": "..."}}
//! ```

use std::{fmt, path::Path};

use serde::Deserialize;

use crate::{AuthError, AuthResult};

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Top level of the client-secrets document.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    /// Web application client.
    pub web: WebClientSecrets,
}

/// Credentials of a web application client.
#[derive(Clone, Deserialize)]
pub struct WebClientSecrets {
    /// OAuth2 client ID
    pub client_id: String,

    /// OAuth2 client secret
    pub client_secret: String,

    /// Authorization endpoint
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,

    /// Token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for WebClientSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebClientSecrets")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ClientSecrets {
    /// Parses the document from a JSON string.
    pub fn from_json(json: &str) -> AuthResult<Self> {
        let secrets: Self = serde_json::from_str(json)
            .map_err(|e| AuthError::Configuration(format!("Invalid client secrets: {}", e)))?;

        if secrets.web.client_id.is_empty() {
            return Err(AuthError::Configuration(
                "client_id is empty in client secrets".to_string(),
            ));
        }
        Ok(secrets)
    }

    /// Reads and parses the document from a file.
    pub fn from_file(path: impl AsRef<Path>) -> AuthResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AuthError::Configuration(format!(
                "Failed to read client secrets {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// The registered client ID.
    pub fn client_id(&self) -> &str {
        &self.web.client_id
    }
}
