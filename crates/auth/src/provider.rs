//! Identity provider seam.

use async_trait::async_trait;
use serde::Deserialize;

use crate::AuthResult;

/// Token response from the provider's token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The access token
    pub access_token: String,

    /// The ID token (JWT containing user claims)
    #[serde(default)]
    pub id_token: Option<String>,
}

/// Result of introspecting an access token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenInfo {
    /// Set when the provider considers the token invalid.
    #[serde(default)]
    pub error: Option<String>,

    /// Subject the token was issued for.
    #[serde(default)]
    pub user_id: Option<String>,

    /// Client ID the token was issued to.
    #[serde(default)]
    pub issued_to: Option<String>,
}

/// Profile fields from the user-info endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    /// User's display name
    #[serde(default)]
    pub name: String,

    /// User's email address
    pub email: String,

    /// URL to user's profile picture
    #[serde(default)]
    pub picture: Option<String>,
}

/// The calls the login flow makes against an identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short tag stored in the session, e.g. `"google"`.
    fn name(&self) -> &'static str;

    /// Exchanges a one-time authorization code for tokens.
    ///
    /// Fails with [`AuthError::ExchangeFailed`](crate::AuthError::ExchangeFailed)
    /// when the provider rejects the code.
    async fn exchange_code(&self, code: &str) -> AuthResult<TokenResponse>;

    /// Introspects an access token. A provider-side rejection is reported in
    /// [`TokenInfo::error`], not as an `Err`.
    async fn token_info(&self, access_token: &str) -> AuthResult<TokenInfo>;

    /// Fetches the profile of the token's owner.
    async fn user_info(&self, access_token: &str) -> AuthResult<UserInfo>;

    /// Revokes an access token.
    ///
    /// Fails with [`AuthError::RevokeFailed`](crate::AuthError::RevokeFailed)
    /// when the provider does not confirm the revocation.
    async fn revoke_token(&self, access_token: &str) -> AuthResult<()>;
}
