//! Login and logout endpoints.

use std::sync::Arc;

use auth::{AuthError, generate_state_token};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use catalog_store::CatalogStore;
use entities::NewUser;
use serde::Deserialize;
use tower_sessions::Session;

use super::page_context;
use crate::error::{ServerResult, json_message};
use crate::session::{LoginSession, push_flash};
use crate::state::AppState;
use crate::views;

/// Query parameters of the login callback.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub state: Option<String>,
}

/// Issues a fresh state token and renders the login page.
pub async fn show_login<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
) -> ServerResult<Html<String>> {
    let mut login = LoginSession::load(&session).await?;
    let token = generate_state_token();
    login.state = Some(token.clone());
    login.save(&session).await?;

    let ctx = page_context(&session, &login).await?;
    Ok(Html(views::login_page(&ctx, &token, state.client_id())))
}

/// Receives the one-time code from the sign-in script and logs the user in.
///
/// A successful login moves the session to a fresh id.
pub async fn gconnect<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
    Query(query): Query<ConnectQuery>,
    code: String,
) -> ServerResult<Response> {
    let mut login = LoginSession::load(&session).await?;

    if query.state.is_none() || query.state != login.state {
        tracing::warn!("Login callback with a mismatched state token");
        return Err(AuthError::InvalidState.into());
    }

    let token = state.verifier.verify_code(code.trim()).await?;

    if login.is_connected_as(&token.subject) {
        return Ok(json_message(
            StatusCode::OK,
            AuthError::AlreadyConnected.to_string(),
        ));
    }

    let profile = state.verifier.fetch_profile(&token).await?;

    let user_id = match state.store.get_user_by_email(&profile.email).await {
        Ok(user) => user.id,
        Err(e) if e.is_not_found() => {
            let user = state
                .store
                .create_user(NewUser {
                    name: profile.name.clone(),
                    email: profile.email.clone(),
                    picture: profile.picture.clone(),
                })
                .await?;
            tracing::info!(user_id = user.id, "Created user on first login");
            user.id
        }
        Err(e) => return Err(e.into()),
    };

    login.connect(
        state.verifier.provider_name(),
        token.access_token,
        token.subject,
        &profile,
        user_id,
    );
    session.cycle_id().await?;
    login.save(&session).await?;

    tracing::info!(user_id, provider = state.verifier.provider_name(), "User logged in");

    push_flash(&session, format!("you are now logged in as {}", profile.name)).await?;
    Ok(Html(views::welcome_fragment(&profile.name, profile.picture.as_deref())).into_response())
}

/// Revokes the session's access token at the provider and forgets the login.
///
/// On a failed revocation the session is left as it was.
pub async fn gdisconnect<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
) -> ServerResult<Response> {
    let mut login = LoginSession::load(&session).await?;
    let access_token = login.access_token.clone().ok_or(AuthError::NotConnected)?;

    if let Err(e) = state.verifier.revoke(&access_token).await {
        tracing::warn!(error = %e, "Token revocation failed");
        return Err(AuthError::RevokeFailed.into());
    }

    login.clear_identity();
    session.cycle_id().await?;
    login.save(&session).await?;

    tracing::info!("User disconnected");
    Ok(json_message(StatusCode::OK, "Successfully disconnected."))
}

/// Logs out from any page and returns to the catalog.
pub async fn disconnect<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
) -> ServerResult<Redirect> {
    let mut login = LoginSession::load(&session).await?;

    if !login.has_provider() {
        push_flash(&session, "You were not logged in").await?;
        return Ok(Redirect::to("/"));
    }

    if let Some(access_token) = login.access_token.as_deref() {
        if let Err(e) = state.verifier.revoke(access_token).await {
            tracing::warn!(error = %e, "Token revocation failed, logging out locally");
        }
    }

    login.clear_identity();
    session.cycle_id().await?;
    login.save(&session).await?;

    push_flash(&session, "You have successfully been logged out.").await?;
    Ok(Redirect::to("/"))
}
