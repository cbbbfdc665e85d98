//! SQLite schema and row types.

use entities::{Category, Item, User};
use sqlx::FromRow;

/// Statements that create the catalog tables when they are missing.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "user" (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(80) NOT NULL,
        email VARCHAR(80) NOT NULL,
        picture VARCHAR(80)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS category (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(80) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS item (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(80) NOT NULL,
        description VARCHAR(250),
        category_id INTEGER NOT NULL REFERENCES category (id),
        user_id INTEGER NOT NULL REFERENCES "user" (id)
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS idx_user_email ON "user" (email)"#,
    "CREATE INDEX IF NOT EXISTS idx_item_category_id ON item (category_id)",
];

/// Database row for User
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            picture: row.picture,
        }
    }
}

/// Database row for Category
#[derive(Debug, FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
        }
    }
}

/// Database row for Item
#[derive(Debug, FromRow)]
pub struct ItemRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub user_id: i64,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            name: row.name,
            description: row.description,
            category_id: row.category_id,
            user_id: row.user_id,
        }
    }
}
