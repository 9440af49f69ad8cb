use serde::{Deserialize, Serialize};

/// A single to-do entry belonging to one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    /// Opaque identifier, fixed at creation
    pub id: String,
    /// Display text (never blank)
    pub text: String,
    pub completed: bool,
    /// Id of the category this item is filed under
    pub category_id: String,
}

impl ChecklistItem {
    /// Create a new, not yet completed item
    pub fn new(id: String, text: String, category_id: String) -> Self {
        ChecklistItem {
            id,
            text,
            completed: false,
            category_id,
        }
    }

    pub fn checkbox_char(&self) -> char {
        if self.completed { 'x' } else { ' ' }
    }
}

/// Replacement values for an item's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub text: String,
    pub category_id: String,
}

impl ItemPatch {
    pub fn from_item(item: &ChecklistItem) -> Self {
        ItemPatch {
            text: item.text.clone(),
            category_id: item.category_id.clone(),
        }
    }
}
