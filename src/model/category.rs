use serde::{Deserialize, Serialize};

/// A named grouping for checklist items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Opaque identifier, fixed at creation
    pub id: String,
    /// Display name (never blank)
    pub name: String,
    /// Optional free-form time label, e.g. `08:30`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl Category {
    pub fn new(id: String, name: String, time: Option<String>) -> Self {
        Category { id, name, time }
    }

    /// Name with the time label appended, as shown in pickers: `Morning (08:30)`
    pub fn label(&self) -> String {
        match &self.time {
            Some(t) => format!("{} ({})", self.name, t),
            None => self.name.clone(),
        }
    }
}

/// Replacement values for a category's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: String,
    pub time: Option<String>,
}

impl CategoryPatch {
    /// Start a patch from the category's current values.
    pub fn from_category(category: &Category) -> Self {
        CategoryPatch {
            name: category.name.clone(),
            time: category.time.clone(),
        }
    }
}
