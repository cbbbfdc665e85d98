//! Item management: create, edit and delete.
//!
//! Every route here needs a logged-in session; edit and delete also need the
//! session's user to own the item.

use std::sync::Arc;

use axum::{
    Form,
    extract::{Path, State},
    http::{HeaderMap, header::REFERER},
    response::{Html, Redirect},
};
use catalog_store::{CatalogStore, CatalogStoreError};
use entities::{Item, ItemChanges, NewItem};
use serde::Deserialize;
use tower_sessions::Session;

use super::page_context;
use crate::error::{ServerError, ServerResult};
use crate::session::{LoginSession, push_flash, require_login};
use crate::state::AppState;
use crate::views;

const NEW_ITEM_PATH: &str = "/catalog/new-item";

/// Submitted item form.
#[derive(Debug, Default, Deserialize)]
pub struct ItemForm {
    #[serde(rename = "item-name", default)]
    pub name: String,
    #[serde(rename = "item-description", default)]
    pub description: String,
    #[serde(rename = "categories-list", default)]
    pub category: String,
}

fn ensure_owner(item: &Item, user_id: i64, action: &str) -> ServerResult<()> {
    if item.is_owned_by(user_id) {
        Ok(())
    } else {
        Err(ServerError::Forbidden(format!(
            "You are not authorized to {} this item",
            action
        )))
    }
}

/// A submitted category id that names no category is a client error.
fn unknown_category(error: CatalogStoreError) -> ServerError {
    match error {
        CatalogStoreError::ForeignKeyViolation(msg) => {
            ServerError::InvalidRequest(format!("Unknown category: {}", msg))
        }
        other => other.into(),
    }
}

/// Loads an item the logged-in user may change.
async fn load_owned_item<S: CatalogStore>(
    state: &AppState<S>,
    session: &Session,
    item_id: i64,
    action: &str,
) -> ServerResult<(Item, LoginSession)> {
    let (login, user_id) = require_login(session, action).await?;
    let item = state.store.get_item(item_id).await?;
    ensure_owner(&item, user_id, action)?;
    Ok((item, login))
}

/// Renders the new-item form.
pub async fn new_item_form<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
) -> ServerResult<Html<String>> {
    let (login, _) = require_login(&session, "create").await?;
    let categories = state.store.list_categories().await?;

    let ctx = page_context(&session, &login).await?;
    Ok(Html(views::new_item_form(&ctx, &categories)))
}

/// Creates an item owned by the logged-in user.
pub async fn create_item<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
    Form(form): Form<ItemForm>,
) -> ServerResult<Redirect> {
    let (_, user_id) = require_login(&session, "create").await?;

    if form.name.is_empty() {
        push_flash(&session, "An item needs a name").await?;
        return Ok(Redirect::to(NEW_ITEM_PATH));
    }

    let category_id: i64 = form.category.trim().parse().map_err(|_| {
        ServerError::InvalidRequest(format!("Invalid category id: {:?}", form.category))
    })?;

    let item = state
        .store
        .create_item(NewItem::new(form.name, category_id, user_id).with_description(form.description))
        .await
        .map_err(unknown_category)?;

    tracing::info!(item_id = item.id, user_id, "Item created");

    push_flash(&session, format!("{} has been added to the catalog!", item.name)).await?;
    Ok(Redirect::to("/"))
}

/// Renders the edit form.
pub async fn edit_item_form<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
    Path(item_id): Path<i64>,
) -> ServerResult<Html<String>> {
    let (item, login) = load_owned_item(&state, &session, item_id, "edit").await?;
    let categories = state.store.list_categories().await?;

    let ctx = page_context(&session, &login).await?;
    Ok(Html(views::edit_item_form(&ctx, &item, &categories)))
}

/// Applies the non-empty submitted fields and goes to the item page.
pub async fn edit_item<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
    Path(item_id): Path<i64>,
    Form(form): Form<ItemForm>,
) -> ServerResult<Redirect> {
    load_owned_item(&state, &session, item_id, "edit").await?;

    let changes = ItemChanges::from_submission(&form.name, &form.description, &form.category)
        .map_err(|_| {
            ServerError::InvalidRequest(format!("Invalid category id: {:?}", form.category))
        })?;

    let item = state
        .store
        .update_item(item_id, changes)
        .await
        .map_err(unknown_category)?;
    let category = state.store.get_category(item.category_id).await?;

    tracing::info!(item_id, "Item edited");

    push_flash(&session, "Item has been edited!").await?;
    Ok(Redirect::to(&views::item_path(&category.name, &item)))
}

/// Asks for confirmation before deleting.
pub async fn delete_item_form<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
    Path(item_id): Path<i64>,
    headers: HeaderMap,
) -> ServerResult<Html<String>> {
    let (item, login) = load_owned_item(&state, &session, item_id, "delete").await?;

    let cancel_url = match headers.get(REFERER).and_then(|v| v.to_str().ok()) {
        Some(referer) => referer.to_string(),
        None => {
            let category = state.store.get_category(item.category_id).await?;
            views::item_path(&category.name, &item)
        }
    };

    let ctx = page_context(&session, &login).await?;
    Ok(Html(views::delete_confirm_page(&ctx, &item, &cancel_url)))
}

/// Deletes the item and goes back to the catalog.
pub async fn delete_item<S: CatalogStore>(
    State(state): State<Arc<AppState<S>>>,
    session: Session,
    Path(item_id): Path<i64>,
) -> ServerResult<Redirect> {
    let (item, _) = load_owned_item(&state, &session, item_id, "delete").await?;
    state.store.delete_item(item.id).await?;

    tracing::info!(item_id, "Item deleted");

    push_flash(&session, format!("{} has been removed!", item.name)).await?;
    Ok(Redirect::to("/"))
}
