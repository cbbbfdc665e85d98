//! User-related entity definitions.

use serde::{Deserialize, Serialize};

/// A user known to the catalog, keyed externally by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address reported by the identity provider.
    pub email: String,
    /// Profile picture URL.
    pub picture: Option<String>,
}

/// Fields for a user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

impl NewUser {
    /// Creates a new user record without a picture.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            picture: None,
        }
    }

    /// Sets the picture URL.
    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    /// Attaches the generated identifier.
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            picture: self.picture,
        }
    }
}
