//! Category entity definitions.

use serde::{Deserialize, Serialize};

use crate::{Item, ItemJson};

/// A named group of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub id: i64,
    /// Category name, unique by convention.
    pub name: String,
}

impl Category {
    /// Creates a category with a known identifier.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A category with its items, as served by `/catalog.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryJson {
    pub category_id: i64,
    pub category_name: String,
    pub category_items: Vec<ItemJson>,
}

impl CategoryJson {
    /// Builds the view from a category and the items that belong to it.
    ///
    /// Items of other categories are skipped.
    pub fn new<'a>(category: &Category, items: impl IntoIterator<Item = &'a Item>) -> Self {
        Self {
            category_id: category.id,
            category_name: category.name.clone(),
            category_items: items
                .into_iter()
                .filter(|item| item.category_id == category.id)
                .map(ItemJson::from)
                .collect(),
        }
    }
}

/// The full catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogJson {
    pub category: Vec<CategoryJson>,
}

impl CatalogJson {
    /// Nests every item under its category, keeping the input order of both.
    pub fn build(categories: &[Category], items: &[Item]) -> Self {
        Self {
            category: categories
                .iter()
                .map(|category| CategoryJson::new(category, items))
                .collect(),
        }
    }

    /// Total number of items in the document.
    pub fn item_count(&self) -> usize {
        self.category.iter().map(|c| c.category_items.len()).sum()
    }
}
