//! Application state.

use std::sync::Arc;

use auth::IdentityVerifier;
use catalog_store::CatalogStore;

use crate::config::Config;

/// Shared application state.
pub struct AppState<S: CatalogStore> {
    /// Server configuration.
    pub config: Config,
    /// Catalog store.
    pub store: S,
    /// Verifies login callbacks against the identity provider.
    pub verifier: IdentityVerifier,
}

impl<S: CatalogStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S, verifier: IdentityVerifier) -> Self {
        Self {
            config,
            store,
            verifier,
        }
    }

    /// OAuth client ID embedded in the login page.
    pub fn client_id(&self) -> &str {
        self.verifier.client_id()
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config, store and verifier.
pub fn create_shared_state<S: CatalogStore>(
    config: Config,
    store: S,
    verifier: IdentityVerifier,
) -> SharedState<S> {
    Arc::new(AppState::new(config, store, verifier))
}
