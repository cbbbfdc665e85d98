//! Catalog store trait definitions.

use async_trait::async_trait;
use entities::{Category, Item, ItemChanges, NewItem, NewUser, User};

use crate::CatalogStoreResult;

/// Trait for catalog storage operations.
///
/// Exact lookups fail with [`CatalogStoreError::NotFound`] when no row
/// matches. Every mutating call commits on its own.
///
/// [`CatalogStoreError::NotFound`]: crate::CatalogStoreError::NotFound
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user.
    async fn create_user(&self, user: NewUser) -> CatalogStoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: i64) -> CatalogStoreResult<User>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, email: &str) -> CatalogStoreResult<User>;

    // =========================================================================
    // Category operations
    // =========================================================================

    /// Creates a new category.
    async fn create_category(&self, name: &str) -> CatalogStoreResult<Category>;

    /// Gets a category by ID.
    async fn get_category(&self, id: i64) -> CatalogStoreResult<Category>;

    /// Gets a category by name. With duplicate names the lowest ID wins.
    async fn get_category_by_name(&self, name: &str) -> CatalogStoreResult<Category>;

    /// Lists all categories ordered by name.
    async fn list_categories(&self) -> CatalogStoreResult<Vec<Category>>;

    // =========================================================================
    // Item operations
    // =========================================================================

    /// Creates a new item.
    async fn create_item(&self, item: NewItem) -> CatalogStoreResult<Item>;

    /// Gets an item by ID.
    async fn get_item(&self, id: i64) -> CatalogStoreResult<Item>;

    /// Lists all items ordered by ID.
    async fn list_items(&self) -> CatalogStoreResult<Vec<Item>>;

    /// Lists the items of one category ordered by ID.
    async fn list_items_in_category(&self, category_id: i64) -> CatalogStoreResult<Vec<Item>>;

    /// Lists the most recently created items, newest first.
    async fn list_recent_items(&self, limit: u32) -> CatalogStoreResult<Vec<Item>>;

    /// Applies a partial update to an item and returns the stored result.
    async fn update_item(&self, id: i64, changes: ItemChanges) -> CatalogStoreResult<Item>;

    /// Deletes an item.
    async fn delete_item(&self, id: i64) -> CatalogStoreResult<()>;
}
