//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while verifying or revoking an identity.
///
/// The display text of the login-flow variants is the message returned to
/// the browser.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The callback state does not match the one issued for the session.
    #[error("Invalid state parameter.")]
    InvalidState,

    /// The provider rejected the authorization code.
    #[error("Failed to upgrade the authorization code.")]
    ExchangeFailed,

    /// The provider reported an error when introspecting the access token.
    #[error("{0}")]
    TokenInvalid(String),

    /// The access token was issued for a different user.
    #[error("Token's user ID doesn't match given user ID.")]
    SubjectMismatch,

    /// The access token was issued to a different client.
    #[error("Token's client ID does not match app's.")]
    ClientMismatch,

    /// The session is already logged in as this subject.
    #[error("Current user is already connected.")]
    AlreadyConnected,

    /// Logout was requested without an access token.
    #[error("Current user not connected.")]
    NotConnected,

    /// The provider did not revoke the token.
    #[error("Failed to revoke token for given user.")]
    RevokeFailed,

    /// The identity token could not be decoded.
    #[error("Malformed identity token: {0}")]
    MalformedIdToken(String),

    /// The provider answered with something unusable.
    #[error("Provider error: {0}")]
    Provider(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        AuthError::MalformedIdToken(e.to_string())
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
