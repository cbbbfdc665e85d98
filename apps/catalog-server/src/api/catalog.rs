//! Public catalog pages and JSON endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use catalog_store::{CatalogStore, RECENT_ITEMS_LIMIT};
use entities::{CatalogJson, ItemDocument};
use serde_json::json;
use tower_sessions::Session;

use super::page_context;
use crate::error::{ServerError, ServerResult};
use crate::session::LoginSession;
use crate::state::AppState;
use crate::views;

/// Body of `/item_<id>.json` when the item does not exist.
pub const MISSING_ITEM_MESSAGE: &str = "No item with that id exists in the catalog";

/// Lists every category and the most recent items.
pub async fn show_catalog<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
) -> ServerResult<Html<String>> {
    let categories = state.store.list_categories().await?;
    let recent = state.store.list_recent_items(RECENT_ITEMS_LIMIT).await?;

    let login = LoginSession::load(&session).await?;
    let ctx = page_context(&session, &login).await?;
    Ok(Html(views::catalog_page(&ctx, &categories, &recent)))
}

/// Dumps every category with its items.
pub async fn catalog_json<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<CatalogJson>> {
    let mut categories = state.store.list_categories().await?;
    categories.sort_by_key(|c| c.id);
    let items = state.store.list_items().await?;

    let catalog = CatalogJson::build(&categories, &items);
    tracing::debug!(
        categories = catalog.category.len(),
        items = catalog.item_count(),
        "Serving catalog JSON"
    );
    Ok(Json(catalog))
}

/// Parses `item_<id>.json`. The id part is returned unparsed.
fn item_json_id(resource: &str) -> Option<&str> {
    resource.strip_prefix("item_")?.strip_suffix(".json")
}

/// Dumps one item, served from `/item_<id>.json`.
pub async fn item_json<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(resource): Path<String>,
) -> ServerResult<Response> {
    let raw_id = item_json_id(&resource)
        .ok_or_else(|| ServerError::NotFound(format!("No route for /{}", resource)))?;

    let missing = || (StatusCode::NOT_FOUND, Json(json!({ "error": MISSING_ITEM_MESSAGE }))).into_response();

    let Ok(item_id) = raw_id.parse::<i64>() else {
        return Ok(missing());
    };

    match state.store.get_item(item_id).await {
        Ok(item) => Ok(Json(ItemDocument::from(&item)).into_response()),
        Err(e) if e.is_not_found() => Ok(missing()),
        Err(e) => Err(e.into()),
    }
}

/// Lists the items of one category.
pub async fn show_category<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
    Path(category_name): Path<String>,
) -> ServerResult<Html<String>> {
    let categories = state.store.list_categories().await?;
    let category = state.store.get_category_by_name(&category_name).await?;
    let items = state.store.list_items_in_category(category.id).await?;

    let login = LoginSession::load(&session).await?;
    let ctx = page_context(&session, &login).await?;
    Ok(Html(views::category_page(
        &ctx,
        &category_name,
        &categories,
        &items,
    )))
}

/// Shows one item. The owner also gets edit and delete links.
pub async fn show_item<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
    Path((category_name, _item_name, item_id)): Path<(String, String, i64)>,
) -> ServerResult<Html<String>> {
    let item = state.store.get_item(item_id).await?;

    let login = LoginSession::load(&session).await?;
    let owns_item = login.logged_in_user_id() == Some(item.user_id);
    let ctx = page_context(&session, &login).await?;
    Ok(Html(views::item_page(&ctx, &category_name, &item, owns_item)))
}
