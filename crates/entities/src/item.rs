//! Item entity definitions.

use std::num::ParseIntError;

use serde::{Deserialize, Serialize};

/// An item in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier.
    pub id: i64,
    /// Item name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Owning category.
    pub category_id: i64,
    /// The user that created the item.
    pub user_id: i64,
}

impl Item {
    /// Returns true if the given user created this item.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Fields for an item that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub user_id: i64,
}

impl NewItem {
    /// Creates a new item without a description.
    pub fn new(name: impl Into<String>, category_id: i64, user_id: i64) -> Self {
        Self {
            name: name.into(),
            description: None,
            category_id,
            user_id,
        }
    }

    /// Sets the description. An empty description is stored as none.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// Attaches the generated identifier.
    pub fn into_item(self, id: i64) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
            category_id: self.category_id,
            user_id: self.user_id,
        }
    }
}

/// A partial update of an item. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
}

impl ItemChanges {
    /// Builds changes from submitted form values, where an empty value means
    /// "keep the current one".
    pub fn from_submission(
        name: &str,
        description: &str,
        category: &str,
    ) -> Result<Self, ParseIntError> {
        let category_id = match category.trim() {
            "" => None,
            value => Some(value.parse()?),
        };

        Ok(Self {
            name: non_empty(name),
            description: non_empty(description),
            category_id,
        })
    }

    /// Applies the changes to an item in place.
    pub fn apply(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(description) = &self.description {
            item.description = Some(description.clone());
        }
        if let Some(category_id) = self.category_id {
            item.category_id = category_id;
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// JSON view of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemJson {
    pub item_id: i64,
    pub item_name: String,
    pub item_description: Option<String>,
    pub category_id: i64,
}

impl From<&Item> for ItemJson {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.id,
            item_name: item.name.clone(),
            item_description: item.description.clone(),
            category_id: item.category_id,
        }
    }
}

/// The document served by `/item_<id>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDocument {
    pub item: ItemJson,
}

impl From<&Item> for ItemDocument {
    fn from(item: &Item) -> Self {
        Self {
            item: ItemJson::from(item),
        }
    }
}
