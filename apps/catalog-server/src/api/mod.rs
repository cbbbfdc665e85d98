//! HTTP endpoints.

pub mod auth;
pub mod catalog;
pub mod items;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use catalog_store::CatalogStore;
use tower_sessions::Session;

use crate::error::ServerResult;
use crate::session::{LoginSession, take_flashes};
use crate::state::AppState;
use crate::views::PageContext;

/// Creates the router with all endpoints.
pub fn create_router<S: CatalogStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Catalog pages
        .route("/", get(catalog::show_catalog))
        .route("/catalog/", get(catalog::show_catalog))
        .route("/catalog.json", get(catalog::catalog_json))
        .route("/{resource}", get(catalog::item_json))
        .route("/catalog/{category_name}/", get(catalog::show_category))
        .route("/catalog/{category_name}/Items/", get(catalog::show_category))
        .route(
            "/catalog/{category_name}/{item_name}/{item_id}",
            get(catalog::show_item),
        )
        // Item management
        .route(
            "/catalog/new-item",
            get(items::new_item_form).post(items::create_item),
        )
        .route(
            "/catalog/edit/{item_id}",
            get(items::edit_item_form).post(items::edit_item),
        )
        .route(
            "/catalog/delete/{item_id}",
            get(items::delete_item_form).post(items::delete_item),
        )
        // Login and logout
        .route("/login", get(auth::show_login))
        .route("/catalog/login", get(auth::show_login))
        .route("/gconnect", post(auth::gconnect))
        .route("/disconnect", get(auth::disconnect))
        .route("/gdisconnect", get(auth::gdisconnect))
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Collects the flash messages and login status for a page render.
pub(crate) async fn page_context(session: &Session, login: &LoginSession) -> ServerResult<PageContext> {
    Ok(PageContext {
        flashes: take_flashes(session).await?,
        logged_in: login.is_logged_in(),
    })
}
