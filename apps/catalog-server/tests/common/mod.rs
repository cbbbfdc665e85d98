//! Shared helpers for router-level tests.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use auth::{
    AuthError, AuthResult, IdentityProvider, IdentityVerifier, TokenInfo, TokenResponse, UserInfo,
};
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use catalog_server::{config::Config, create_app, create_state, state::AppState};
use catalog_store::{CatalogStore, MemoryCatalogStore};
use jsonwebtoken::{EncodingKey, Header};
use serde::Serialize;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

pub const CLIENT_ID: &str = "test-client.apps.googleusercontent.com";

#[derive(Serialize)]
struct IdClaims {
    sub: String,
}

/// Identity provider whose answers are set by the test.
pub struct ScriptedProvider {
    pub accept_code: AtomicBool,
    pub revoke_ok: AtomicBool,
    pub subject: Mutex<String>,
    pub token_info: Mutex<TokenInfo>,
    pub profile: Mutex<UserInfo>,
    pub exchange_calls: AtomicUsize,
    pub revoked: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(name: &str, email: &str, subject: &str) -> Self {
        Self {
            accept_code: AtomicBool::new(true),
            revoke_ok: AtomicBool::new(true),
            subject: Mutex::new(subject.to_string()),
            token_info: Mutex::new(TokenInfo {
                user_id: Some(subject.to_string()),
                issued_to: Some(CLIENT_ID.to_string()),
                ..Default::default()
            }),
            profile: Mutex::new(UserInfo {
                name: name.to_string(),
                email: email.to_string(),
                picture: Some(format!("https://example.com/{}.png", subject)),
            }),
            exchange_calls: AtomicUsize::new(0),
            revoked: Mutex::new(Vec::new()),
        }
    }

    /// Makes the next logins come from a different account.
    pub fn switch_user(&self, name: &str, email: &str, subject: &str) {
        *self.subject.lock().unwrap() = subject.to_string();
        self.token_info.lock().unwrap().user_id = Some(subject.to_string());
        let mut profile = self.profile.lock().unwrap();
        profile.name = name.to_string();
        profile.email = email.to_string();
    }

    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    fn access_token(&self) -> String {
        format!("access-{}", self.subject.lock().unwrap())
    }
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn exchange_code(&self, _code: &str) -> AuthResult<TokenResponse> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        if !self.accept_code.load(Ordering::SeqCst) {
            return Err(AuthError::ExchangeFailed);
        }

        let claims = IdClaims {
            sub: self.subject.lock().unwrap().clone(),
        };
        let id_token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"provider-signing-key"),
        )
        .unwrap();

        Ok(TokenResponse {
            access_token: self.access_token(),
            id_token: Some(id_token),
        })
    }

    async fn token_info(&self, _access_token: &str) -> AuthResult<TokenInfo> {
        Ok(self.token_info.lock().unwrap().clone())
    }

    async fn user_info(&self, _access_token: &str) -> AuthResult<UserInfo> {
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn revoke_token(&self, access_token: &str) -> AuthResult<()> {
        if !self.revoke_ok.load(Ordering::SeqCst) {
            return Err(AuthError::RevokeFailed);
        }
        self.revoked.lock().unwrap().push(access_token.to_string());
        Ok(())
    }
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn assert_redirect_to(&self, path: &str) {
        assert!(
            self.status.is_redirection(),
            "expected redirect, got {}: {}",
            self.status,
            self.body
        );
        assert_eq!(self.location(), Some(path));
    }
}

/// One browser talking to the app, carrying its session cookie.
pub struct TestApp {
    pub state: Arc<AppState<MemoryCatalogStore>>,
    pub provider: Arc<ScriptedProvider>,
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_provider(ScriptedProvider::new("Ann", "ann@example.com", "sub-ann"))
    }

    pub fn with_provider(provider: ScriptedProvider) -> Self {
        Self::with_config(Config::new("test-secret-key"), provider)
    }

    pub fn with_config(config: Config, provider: ScriptedProvider) -> Self {
        let provider = Arc::new(provider);
        let verifier = IdentityVerifier::new(provider.clone(), CLIENT_ID);
        let state = create_state(config, MemoryCatalogStore::new(), verifier);
        let router = create_app(state.clone(), MemoryStore::default());

        Self {
            state,
            provider,
            router,
            cookie: None,
        }
    }

    /// Another browser against the same app, with no session yet.
    pub fn new_browser(&self) -> Self {
        Self {
            state: self.state.clone(),
            provider: self.provider.clone(),
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// The `name=value` pair of the session cookie, if one was set.
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Another browser that presents the given session cookie.
    pub fn browser_with_cookie(&self, cookie: &str) -> Self {
        let mut browser = self.new_browser();
        browser.cookie = Some(cookie.to_string());
        browser
    }

    pub fn store(&self) -> &MemoryCatalogStore {
        &self.state.store
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn get_with_referer(&mut self, uri: &str, referer: &str) -> TestResponse {
        let request = Request::builder()
            .uri(uri)
            .header(header::REFERER, referer)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_body(&mut self, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/octet-stream; charset=utf-8")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Opens the login page and returns the state token it embeds.
    pub async fn login_state(&mut self) -> String {
        let page = self.get("/login").await;
        assert_eq!(page.status, StatusCode::OK);
        state_from_login_page(&page.body)
    }

    /// Runs the whole sign-in flow with the provider's current account.
    pub async fn login(&mut self) -> TestResponse {
        let state = self.login_state().await;
        self.post_body(&format!("/gconnect?state={}", state), "one-time-code")
            .await
    }

    /// Logs in and returns the local user id.
    pub async fn login_user(&mut self) -> i64 {
        let response = self.login().await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        let email = self.provider.profile.lock().unwrap().email.clone();
        self.store().get_user_by_email(&email).await.unwrap().id
    }
}

pub fn state_from_login_page(body: &str) -> String {
    let start = body.find("data-state=\"").unwrap() + "data-state=\"".len();
    let len = body[start..].find('"').unwrap();
    body[start..start + len].to_string()
}
