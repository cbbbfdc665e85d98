//! Authorization-code verification.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{AuthError, AuthResult, IdentityProvider, UserInfo};

/// Claims read from the provider's identity token.
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenClaims {
    /// Subject (stable user identifier at the provider)
    pub sub: String,
}

/// An access token that passed every check of [`IdentityVerifier::verify_code`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub access_token: String,
    /// Subject from the identity token.
    pub subject: String,
}

/// Reads the claims of an identity token.
///
/// The token came straight from the provider's token endpoint over TLS and
/// the access token is checked against the token-info endpoint afterwards,
/// so only the payload is decoded here.
pub fn decode_id_token(id_token: &str) -> AuthResult<IdTokenClaims> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<IdTokenClaims>(
        id_token,
        &DecodingKey::from_secret(&[]),
        &validation,
    )?;
    Ok(data.claims)
}

/// Runs the provider side of the login flow.
#[derive(Clone)]
pub struct IdentityVerifier {
    provider: Arc<dyn IdentityProvider>,
    client_id: String,
}

impl IdentityVerifier {
    pub fn new(provider: Arc<dyn IdentityProvider>, client_id: impl Into<String>) -> Self {
        Self {
            provider,
            client_id: client_id.into(),
        }
    }

    /// Tag of the underlying provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Exchanges `code` and checks the resulting access token.
    ///
    /// The checks run in order and the first failure wins:
    /// 1. the code exchange succeeds and yields an identity token
    /// 2. token info reports no error
    /// 3. the token's user matches the identity token's subject
    /// 4. the token was issued to this client
    pub async fn verify_code(&self, code: &str) -> AuthResult<VerifiedToken> {
        let tokens = self.provider.exchange_code(code).await?;
        let Some(id_token) = tokens.id_token.as_deref() else {
            warn!("Token response carried no id_token");
            return Err(AuthError::ExchangeFailed);
        };

        let info = self.provider.token_info(&tokens.access_token).await?;
        if let Some(error) = info.error {
            warn!(error = %error, "Token info reported an error");
            return Err(AuthError::TokenInvalid(error));
        }

        let claims = decode_id_token(id_token)?;

        if info.user_id.as_deref() != Some(claims.sub.as_str()) {
            return Err(AuthError::SubjectMismatch);
        }
        if info.issued_to.as_deref() != Some(self.client_id.as_str()) {
            return Err(AuthError::ClientMismatch);
        }

        debug!(subject = %claims.sub, "Authorization code verified");

        Ok(VerifiedToken {
            access_token: tokens.access_token,
            subject: claims.sub,
        })
    }

    /// Fetches the profile behind a verified token.
    pub async fn fetch_profile(&self, token: &VerifiedToken) -> AuthResult<UserInfo> {
        self.provider.user_info(&token.access_token).await
    }

    /// Revokes an access token at the provider.
    pub async fn revoke(&self, access_token: &str) -> AuthResult<()> {
        self.provider.revoke_token(access_token).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use jsonwebtoken::{EncodingKey, Header};
    use serde::Serialize;

    use super::*;
    use crate::{TokenInfo, TokenResponse};

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        email: &'a str,
    }

    fn id_token(sub: &str) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &TestClaims {
                sub,
                email: "ann@example.com",
            },
            &EncodingKey::from_secret(b"provider-key"),
        )
        .unwrap()
    }

    struct FakeProvider {
        accept_code: bool,
        id_token_sub: String,
        info: TokenInfo,
        revoked: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn valid() -> Self {
            Self {
                accept_code: true,
                id_token_sub: "sub-1".to_string(),
                info: TokenInfo {
                    user_id: Some("sub-1".to_string()),
                    issued_to: Some("client-123".to_string()),
                    ..Default::default()
                },
                revoked: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn exchange_code(&self, _code: &str) -> AuthResult<TokenResponse> {
            if !self.accept_code {
                return Err(AuthError::ExchangeFailed);
            }
            Ok(TokenResponse {
                access_token: "access-1".to_string(),
                id_token: Some(id_token(&self.id_token_sub)),
            })
        }

        async fn token_info(&self, _access_token: &str) -> AuthResult<TokenInfo> {
            Ok(self.info.clone())
        }

        async fn user_info(&self, _access_token: &str) -> AuthResult<UserInfo> {
            Ok(UserInfo {
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                picture: None,
            })
        }

        async fn revoke_token(&self, access_token: &str) -> AuthResult<()> {
            self.revoked.lock().unwrap().push(access_token.to_string());
            Ok(())
        }
    }

    fn verifier(provider: FakeProvider) -> IdentityVerifier {
        IdentityVerifier::new(Arc::new(provider), "client-123")
    }

    #[test]
    fn test_decode_id_token_skips_signature() {
        let claims = decode_id_token(&id_token("sub-42")).unwrap();
        assert_eq!(claims.sub, "sub-42");

        let err = decode_id_token("not-a-jwt").unwrap_err();
        assert!(matches!(err, AuthError::MalformedIdToken(_)));
    }

    #[tokio::test]
    async fn test_verify_code_success() {
        let verifier = verifier(FakeProvider::valid());
        let token = verifier.verify_code("one-time-code").await.unwrap();
        assert_eq!(token.access_token, "access-1");
        assert_eq!(token.subject, "sub-1");

        let profile = verifier.fetch_profile(&token).await.unwrap();
        assert_eq!(profile.email, "ann@example.com");
    }

    #[tokio::test]
    async fn test_verify_code_rejected_exchange() {
        let mut provider = FakeProvider::valid();
        provider.accept_code = false;
        let err = verifier(provider).verify_code("bad").await.unwrap_err();
        assert!(matches!(err, AuthError::ExchangeFailed));
    }

    #[tokio::test]
    async fn test_verify_code_token_info_error() {
        let mut provider = FakeProvider::valid();
        provider.info.error = Some("invalid_token".to_string());
        let err = verifier(provider).verify_code("code").await.unwrap_err();
        assert_eq!(err.to_string(), "invalid_token");
    }

    #[tokio::test]
    async fn test_verify_code_subject_mismatch() {
        let mut provider = FakeProvider::valid();
        provider.id_token_sub = "someone-else".to_string();
        let err = verifier(provider).verify_code("code").await.unwrap_err();
        assert!(matches!(err, AuthError::SubjectMismatch));
    }

    #[tokio::test]
    async fn test_verify_code_client_mismatch() {
        let mut provider = FakeProvider::valid();
        provider.info.issued_to = Some("other-client".to_string());
        let err = verifier(provider).verify_code("code").await.unwrap_err();
        assert!(matches!(err, AuthError::ClientMismatch));
        assert_eq!(err.to_string(), "Token's client ID does not match app's.");
    }

    #[tokio::test]
    async fn test_revoke_passes_token_through() {
        let provider = Arc::new(FakeProvider::valid());
        let verifier = IdentityVerifier::new(provider.clone(), "client-123");
        verifier.revoke("access-1").await.unwrap();
        assert_eq!(*provider.revoked.lock().unwrap(), vec!["access-1".to_string()]);
    }
}
