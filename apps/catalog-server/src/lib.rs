//! Catalog Server
//!
//! Serves the item catalog as HTML pages and JSON documents, with Google
//! sign-in for the users who add, edit and delete items.

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod views;

use std::sync::Arc;

use auth::IdentityVerifier;
use axum::Router;
use catalog_store::CatalogStore;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::config::{Config, SESSION_COOKIE_NAME};
use crate::state::{AppState, create_shared_state};

/// Creates the application router with all routes configured.
pub fn create_app<S, SS>(state: Arc<AppState<S>>, session_store: SS) -> Router
where
    S: CatalogStore + 'static,
    SS: SessionStore + Clone,
{
    let session_layer = SessionManagerLayer::new(session_store)
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(state.config.secure_cookies)
        .with_signed(state.config.session_key());

    api::create_router()
        .with_state(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state with the given configuration, store and verifier.
pub fn create_state<S: CatalogStore>(
    config: Config,
    store: S,
    verifier: IdentityVerifier,
) -> Arc<AppState<S>> {
    create_shared_state(config, store, verifier)
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
