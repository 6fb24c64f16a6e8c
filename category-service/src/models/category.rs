use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

/// A category as persisted in the `categories` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    pub fn new(name: String, description: Option<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name,
            description,
        }
    }

    /// Applies the present fields of `changes`, leaving the rest untouched.
    pub fn apply(&mut self, changes: CategoryChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
    }
}

/// Partial field set for an update. `None` means "keep the stored value";
/// `description: Some(None)` removes the stored description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    /// `$set` / `$unset` operators for this change set. Empty operators are omitted,
    /// MongoDB rejects them.
    pub fn to_update_document(&self) -> Document {
        let mut set = Document::new();
        let mut unset = Document::new();

        if let Some(name) = &self.name {
            set.insert("name", name.as_str());
        }
        match &self.description {
            Some(Some(description)) => {
                set.insert("description", description.as_str());
            }
            Some(None) => {
                unset.insert("description", "");
            }
            None => {}
        }

        let mut update = Document::new();
        if !set.is_empty() {
            update.insert("$set", set);
        }
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }
        update
    }
}
