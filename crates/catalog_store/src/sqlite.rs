//! SQLite catalog store.

use std::str::FromStr;

use async_trait::async_trait;
use entities::{Category, Item, ItemChanges, NewItem, NewUser, User};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{
    CatalogStore, CatalogStoreError, CatalogStoreResult, CategoryRow, ItemRow, UserRow,
    SCHEMA_STATEMENTS,
};

/// Catalog store backed by a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteCatalogStore {
    pool: Pool<Sqlite>,
}

impl SqliteCatalogStore {
    /// Wraps an existing pool. Call [`init`](Self::init) before use.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Opens the database at `database_url`, creating the file and the
    /// schema when missing.
    pub async fn connect(database_url: &str) -> CatalogStoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.init().await?;
        Ok(store)
    }

    /// Opens a private in-memory database. Every connection to `:memory:` is
    /// a separate database, so the pool holds exactly one.
    pub async fn in_memory() -> CatalogStoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.init().await?;
        Ok(store)
    }

    /// Creates the catalog tables if they do not exist yet.
    pub async fn init(&self) -> CatalogStoreResult<()> {
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::debug!("Catalog schema ready");
        Ok(())
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

/// Maps constraint failures on writes to the store's own error.
fn write_error(e: sqlx::Error, context: &str) -> CatalogStoreError {
    let is_fk = e
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation());
    if is_fk {
        CatalogStoreError::ForeignKeyViolation(context.to_string())
    } else {
        CatalogStoreError::Database(e)
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn create_user(&self, user: NewUser) -> CatalogStoreResult<User> {
        let id = sqlx::query(r#"INSERT INTO "user" (name, email, picture) VALUES (?, ?, ?)"#)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.picture)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        tracing::info!(user_id = id, "User created");
        Ok(user.into_user(id))
    }

    async fn get_user(&self, id: i64) -> CatalogStoreResult<User> {
        let row: Option<UserRow> =
            sqlx::query_as(r#"SELECT id, name, email, picture FROM "user" WHERE id = ?"#)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::from)
            .ok_or_else(|| CatalogStoreError::not_found("User", id))
    }

    async fn get_user_by_email(&self, email: &str) -> CatalogStoreResult<User> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"SELECT id, name, email, picture FROM "user" WHERE email = ? ORDER BY id LIMIT 1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::from)
            .ok_or_else(|| CatalogStoreError::not_found("User", email))
    }

    async fn create_category(&self, name: &str) -> CatalogStoreResult<Category> {
        let id = sqlx::query("INSERT INTO category (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Category::new(id, name))
    }

    async fn get_category(&self, id: i64) -> CatalogStoreResult<Category> {
        let row: Option<CategoryRow> = sqlx::query_as("SELECT id, name FROM category WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Category::from)
            .ok_or_else(|| CatalogStoreError::not_found("Category", id))
    }

    async fn get_category_by_name(&self, name: &str) -> CatalogStoreResult<Category> {
        let row: Option<CategoryRow> =
            sqlx::query_as("SELECT id, name FROM category WHERE name = ? ORDER BY id LIMIT 1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Category::from)
            .ok_or_else(|| CatalogStoreError::not_found("Category", name))
    }

    async fn list_categories(&self) -> CatalogStoreResult<Vec<Category>> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT id, name FROM category ORDER BY name, id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn create_item(&self, item: NewItem) -> CatalogStoreResult<Item> {
        let id = sqlx::query(
            "INSERT INTO item (name, description, category_id, user_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.category_id)
        .bind(item.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            write_error(
                e,
                &format!(
                    "category {} or user {} does not exist",
                    item.category_id, item.user_id
                ),
            )
        })?
        .last_insert_rowid();

        tracing::info!(item_id = id, category_id = item.category_id, "Item created");
        Ok(item.into_item(id))
    }

    async fn get_item(&self, id: i64) -> CatalogStoreResult<Item> {
        let row: Option<ItemRow> = sqlx::query_as(
            "SELECT id, name, description, category_id, user_id FROM item WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Item::from)
            .ok_or_else(|| CatalogStoreError::not_found("Item", id))
    }

    async fn list_items(&self) -> CatalogStoreResult<Vec<Item>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, name, description, category_id, user_id FROM item ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn list_items_in_category(&self, category_id: i64) -> CatalogStoreResult<Vec<Item>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, name, description, category_id, user_id FROM item \
             WHERE category_id = ? ORDER BY id",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn list_recent_items(&self, limit: u32) -> CatalogStoreResult<Vec<Item>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, name, description, category_id, user_id FROM item \
             ORDER BY id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn update_item(&self, id: i64, changes: ItemChanges) -> CatalogStoreResult<Item> {
        let result = sqlx::query(
            "UPDATE item SET \
             name = COALESCE(?, name), \
             description = COALESCE(?, description), \
             category_id = COALESCE(?, category_id) \
             WHERE id = ?",
        )
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.category_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &format!("category {:?} does not exist", changes.category_id)))?;

        if result.rows_affected() == 0 {
            return Err(CatalogStoreError::not_found("Item", id));
        }

        tracing::info!(item_id = id, "Item updated");
        self.get_item(id).await
    }

    async fn delete_item(&self, id: i64) -> CatalogStoreResult<()> {
        let result = sqlx::query("DELETE FROM item WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogStoreError::not_found("Item", id));
        }

        tracing::info!(item_id = id, "Item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_owner() -> (SqliteCatalogStore, User) {
        let store = SqliteCatalogStore::in_memory().await.unwrap();
        let user = store
            .create_user(NewUser::new("Ann", "ann@example.com"))
            .await
            .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let store = SqliteCatalogStore::in_memory().await.unwrap();
        store.init().await.unwrap();
        assert!(store.list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_lookups() {
        let (store, user) = store_with_owner().await;

        assert_eq!(store.get_user(user.id).await.unwrap(), user);
        assert_eq!(store.get_user_by_email("ann@example.com").await.unwrap(), user);
        assert!(store
            .get_user_by_email("bob@example.com")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_item_lifecycle() {
        let (store, user) = store_with_owner().await;
        let soccer = store.create_category("Soccer").await.unwrap();
        let hockey = store.create_category("Hockey").await.unwrap();

        let item = store
            .create_item(NewItem::new("Ball", soccer.id, user.id).with_description("Size 4"))
            .await
            .unwrap();
        assert_eq!(store.get_item(item.id).await.unwrap(), item);

        // Only the description changes
        let changes = ItemChanges::from_submission("", "Size 5", "").unwrap();
        let updated = store.update_item(item.id, changes).await.unwrap();
        assert_eq!(updated.name, "Ball");
        assert_eq!(updated.description.as_deref(), Some("Size 5"));
        assert_eq!(updated.category_id, soccer.id);

        let changes = ItemChanges::from_submission("Puck", "Rubber", &hockey.id.to_string()).unwrap();
        let updated = store.update_item(item.id, changes).await.unwrap();
        assert_eq!(updated.name, "Puck");
        assert_eq!(updated.category_id, hockey.id);
        assert!(store.list_items_in_category(soccer.id).await.unwrap().is_empty());

        store.delete_item(item.id).await.unwrap();
        assert!(store.get_item(item.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let (store, user) = store_with_owner().await;

        let err = store
            .create_item(NewItem::new("Ball", 404, user.id))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogStoreError::ForeignKeyViolation(_)));
        assert!(store.list_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let (store, _) = store_with_owner().await;
        let changes = ItemChanges::from_submission("Ball", "", "").unwrap();
        assert!(store.update_item(1, changes).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_listing_order() {
        let (store, user) = store_with_owner().await;
        let soccer = store.create_category("Soccer").await.unwrap();
        store.create_category("Baseball").await.unwrap();
        for name in ["Ball", "Cleats", "Shin Guards"] {
            store
                .create_item(NewItem::new(name, soccer.id, user.id))
                .await
                .unwrap();
        }

        let categories: Vec<_> = store
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(categories, vec!["Baseball", "Soccer"]);

        let recent: Vec<_> = store
            .list_recent_items(2)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(recent, vec!["Shin Guards", "Cleats"]);
    }
}
