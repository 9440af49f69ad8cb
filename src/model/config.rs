use serde::{Deserialize, Serialize};

/// Configuration from checklist.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Names of the two persisted records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_categories_key")]
    pub categories_key: String,
    #[serde(default = "default_items_key")]
    pub items_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            categories_key: default_categories_key(),
            items_key: default_items_key(),
        }
    }
}

/// The category seeded into an empty checklist, and the fallback id
/// used when an item is added with no categories present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_category_id")]
    pub category_id: String,
    #[serde(default = "default_category_name")]
    pub category_name: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            category_id: default_category_id(),
            category_name: default_category_name(),
        }
    }
}

impl ChecklistConfig {
    /// Replace values that trim to empty with the built-in defaults.
    pub fn normalized(mut self) -> Self {
        fill_blank(&mut self.storage.categories_key, default_categories_key);
        fill_blank(&mut self.storage.items_key, default_items_key);
        fill_blank(&mut self.defaults.category_id, default_category_id);
        fill_blank(&mut self.defaults.category_name, default_category_name);
        self
    }
}

fn fill_blank(value: &mut String, default: fn() -> String) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        *value = default();
    } else if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

pub const DEFAULT_CATEGORY_ID: &str = "default";
pub const DEFAULT_CATEGORY_NAME: &str = "General";

fn default_categories_key() -> String {
    "checklist-categories".to_string()
}

fn default_items_key() -> String {
    "checklist-items".to_string()
}

fn default_category_id() -> String {
    DEFAULT_CATEGORY_ID.to_string()
}

fn default_category_name() -> String {
    DEFAULT_CATEGORY_NAME.to_string()
}
