//! Persistence for the catalog.
//!
//! This crate provides the [`CatalogStore`] abstraction over users,
//! categories and items, with an in-memory backend for tests and a SQLite
//! backend for deployments.

mod error;
mod memory;
mod schema;
mod seed;
mod sqlite;
mod traits;

pub use error::*;
pub use memory::*;
pub use schema::*;
pub use seed::*;
pub use sqlite::*;
pub use traits::*;

/// Number of items shown in the "latest items" listing.
pub const RECENT_ITEMS_LIMIT: u32 = 5;
