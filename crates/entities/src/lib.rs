//! Core entity definitions for the catalog application.
//!
//! This crate defines the three persisted record types (users, categories and
//! items), the input types used to create and change them, and the JSON views
//! served by the read-only endpoints.

mod category;
mod item;
mod user;

pub use category::*;
pub use item::*;
pub use user::*;
