//! In-memory catalog store implementation for testing.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use entities::{Category, Item, ItemChanges, NewItem, NewUser, User};
use tokio::sync::RwLock;

use crate::{CatalogStore, CatalogStoreError, CatalogStoreResult};

/// In-memory catalog store for testing purposes.
///
/// IDs are handed out from per-table sequences starting at 1, like an
/// autoincrement primary key.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    users: Arc<RwLock<BTreeMap<i64, User>>>,
    categories: Arc<RwLock<BTreeMap<i64, Category>>>,
    items: Arc<RwLock<BTreeMap<i64, Item>>>,
    user_seq: AtomicI64,
    category_seq: AtomicI64,
    item_seq: AtomicI64,
}

impl MemoryCatalogStore {
    /// Creates a new in-memory catalog store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn check_references(&self, category_id: i64, user_id: Option<i64>) -> CatalogStoreResult<()> {
        if !self.categories.read().await.contains_key(&category_id) {
            return Err(CatalogStoreError::ForeignKeyViolation(format!(
                "category {} does not exist",
                category_id
            )));
        }
        if let Some(user_id) = user_id {
            if !self.users.read().await.contains_key(&user_id) {
                return Err(CatalogStoreError::ForeignKeyViolation(format!(
                    "user {} does not exist",
                    user_id
                )));
            }
        }
        Ok(())
    }
}

fn next_id(seq: &AtomicI64) -> i64 {
    seq.fetch_add(1, Ordering::SeqCst) + 1
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: NewUser) -> CatalogStoreResult<User> {
        let user = user.into_user(next_id(&self.user_seq));
        self.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> CatalogStoreResult<User> {
        let users = self.users.read().await;
        users
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogStoreError::not_found("User", id))
    }

    async fn get_user_by_email(&self, email: &str) -> CatalogStoreResult<User> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| CatalogStoreError::not_found("User", email))
    }

    // =========================================================================
    // Category operations
    // =========================================================================

    async fn create_category(&self, name: &str) -> CatalogStoreResult<Category> {
        let category = Category::new(next_id(&self.category_seq), name);
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: i64) -> CatalogStoreResult<Category> {
        let categories = self.categories.read().await;
        categories
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogStoreError::not_found("Category", id))
    }

    async fn get_category_by_name(&self, name: &str) -> CatalogStoreResult<Category> {
        let categories = self.categories.read().await;
        categories
            .values()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| CatalogStoreError::not_found("Category", name))
    }

    async fn list_categories(&self) -> CatalogStoreResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut result: Vec<Category> = categories.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(result)
    }

    // =========================================================================
    // Item operations
    // =========================================================================

    async fn create_item(&self, item: NewItem) -> CatalogStoreResult<Item> {
        self.check_references(item.category_id, Some(item.user_id))
            .await?;
        let item = item.into_item(next_id(&self.item_seq));
        self.items.write().await.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_item(&self, id: i64) -> CatalogStoreResult<Item> {
        let items = self.items.read().await;
        items
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogStoreError::not_found("Item", id))
    }

    async fn list_items(&self) -> CatalogStoreResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    async fn list_items_in_category(&self, category_id: i64) -> CatalogStoreResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|i| i.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn list_recent_items(&self, limit: u32) -> CatalogStoreResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items.values().rev().take(limit as usize).cloned().collect())
    }

    async fn update_item(&self, id: i64, changes: ItemChanges) -> CatalogStoreResult<Item> {
        if let Some(category_id) = changes.category_id {
            self.check_references(category_id, None).await?;
        }

        let mut items = self.items.write().await;
        let item = items
            .get_mut(&id)
            .ok_or_else(|| CatalogStoreError::not_found("Item", id))?;
        changes.apply(item);
        Ok(item.clone())
    }

    async fn delete_item(&self, id: i64) -> CatalogStoreResult<()> {
        let mut items = self.items.write().await;
        if items.remove(&id).is_none() {
            return Err(CatalogStoreError::not_found("Item", id));
        }
        Ok(())
    }
}
