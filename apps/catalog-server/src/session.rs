//! Login state and flash messages kept in the server-side session.

use auth::UserInfo;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{ServerError, ServerResult};

/// Key for storing the login record in the session.
pub const LOGIN_SESSION_KEY: &str = "login";

/// Key for storing pending flash messages in the session.
pub const FLASH_KEY: &str = "_flashes";

/// Per-browser login record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSession {
    /// Anti-forgery token issued by the login page.
    pub state: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    /// Tag of the provider the user logged in with.
    pub provider: Option<String>,
    pub access_token: Option<String>,
    /// Subject id at the provider.
    pub gplus_id: Option<String>,
    /// Local user id.
    pub user_id: Option<i64>,
}

impl LoginSession {
    /// Reads the login record, or an empty one for a fresh session.
    pub async fn load(session: &Session) -> ServerResult<Self> {
        Ok(session
            .get::<Self>(LOGIN_SESSION_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Writes the login record back.
    pub async fn save(&self, session: &Session) -> ServerResult<()> {
        session.insert(LOGIN_SESSION_KEY, self).await?;
        Ok(())
    }

    /// True when both a username and a local user id are present.
    pub fn is_logged_in(&self) -> bool {
        self.username.is_some() && self.user_id.is_some()
    }

    /// The local user id of a logged-in session.
    pub fn logged_in_user_id(&self) -> Option<i64> {
        if self.is_logged_in() {
            self.user_id
        } else {
            None
        }
    }

    /// True when a provider login is recorded.
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// True when the session already holds a token for `subject`.
    pub fn is_connected_as(&self, subject: &str) -> bool {
        self.access_token.is_some() && self.gplus_id.as_deref() == Some(subject)
    }

    /// Records a completed provider login.
    pub fn connect(
        &mut self,
        provider: &str,
        access_token: String,
        subject: String,
        profile: &UserInfo,
        user_id: i64,
    ) {
        self.provider = Some(provider.to_string());
        self.access_token = Some(access_token);
        self.gplus_id = Some(subject);
        self.username = Some(profile.name.clone());
        self.email = Some(profile.email.clone());
        self.picture = profile.picture.clone();
        self.user_id = Some(user_id);
    }

    /// Forgets the logged-in identity. The state token is left alone.
    pub fn clear_identity(&mut self) {
        self.username = None;
        self.email = None;
        self.picture = None;
        self.provider = None;
        self.access_token = None;
        self.gplus_id = None;
        self.user_id = None;
    }
}

/// Queues a message for the next rendered page.
pub async fn push_flash(session: &Session, message: impl Into<String>) -> ServerResult<()> {
    let mut flashes = session
        .get::<Vec<String>>(FLASH_KEY)
        .await?
        .unwrap_or_default();
    flashes.push(message.into());
    session.insert(FLASH_KEY, flashes).await?;
    Ok(())
}

/// Removes and returns the queued messages.
pub async fn take_flashes(session: &Session) -> ServerResult<Vec<String>> {
    Ok(session
        .remove::<Vec<String>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}

/// Returns the login record and user id, or flashes a notice and fails with
/// [`ServerError::LoginRequired`].
///
/// `action` completes the notice, e.g. "create" gives
/// "You need to be logged in to create an item".
pub async fn require_login(session: &Session, action: &str) -> ServerResult<(LoginSession, i64)> {
    let login = LoginSession::load(session).await?;
    match login.logged_in_user_id() {
        Some(user_id) => Ok((login, user_id)),
        None => {
            push_flash(
                session,
                format!("You need to be logged in to {} an item", action),
            )
            .await?;
            Err(ServerError::LoginRequired)
        }
    }
}
