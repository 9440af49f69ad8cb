use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::category::Category;
use crate::model::item::ChecklistItem;

/// Structured result from `cl check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A consistency error (the loader will repair or reject it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// The category collection is empty
    #[serde(rename = "no_categories")]
    NoCategories,
    /// An item refers to a category id that doesn't exist
    #[serde(rename = "orphaned_item")]
    OrphanedItem { item_id: String, category_id: String },
    /// Two or more categories share an id
    #[serde(rename = "duplicate_category_id")]
    DuplicateCategoryId { category_id: String, count: usize },
    /// Two or more items share an id
    #[serde(rename = "duplicate_item_id")]
    DuplicateItemId { item_id: String, count: usize },
}

/// A non-critical issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    #[serde(rename = "blank_category_name")]
    BlankCategoryName { category_id: String },
    #[serde(rename = "blank_item_text")]
    BlankItemText { item_id: String },
    /// Category has no items (it can never show as complete)
    #[serde(rename = "empty_category")]
    EmptyCategory { category_id: String },
}

/// Validate raw collections as they were stored.
///
/// This is a read-only operation and runs before any load-time repair, so
/// it reports exactly what the loader would have to fix. `None` means the
/// category record was never written; the loader seeds it, so only a
/// stored empty list counts as `NoCategories`.
pub fn check_store(categories: Option<&[Category]>, items: &[ChecklistItem]) -> CheckResult {
    let mut result = CheckResult::default();

    if categories.is_some_and(|c| c.is_empty()) {
        result.errors.push(CheckError::NoCategories);
    }
    let categories = categories.unwrap_or_default();

    for (id, count) in duplicates(categories.iter().map(|c| c.id.as_str())) {
        result.errors.push(CheckError::DuplicateCategoryId {
            category_id: id,
            count,
        });
    }
    for (id, count) in duplicates(items.iter().map(|i| i.id.as_str())) {
        result
            .errors
            .push(CheckError::DuplicateItemId { item_id: id, count });
    }

    let category_ids: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    for item in items {
        if !category_ids.contains(item.category_id.as_str()) {
            result.errors.push(CheckError::OrphanedItem {
                item_id: item.id.clone(),
                category_id: item.category_id.clone(),
            });
        }
        if item.text.trim().is_empty() {
            result.warnings.push(CheckWarning::BlankItemText {
                item_id: item.id.clone(),
            });
        }
    }

    let used: HashSet<&str> = items.iter().map(|i| i.category_id.as_str()).collect();
    for category in categories {
        if category.name.trim().is_empty() {
            result.warnings.push(CheckWarning::BlankCategoryName {
                category_id: category.id.clone(),
            });
        }
        if !used.contains(category.id.as_str()) {
            result.warnings.push(CheckWarning::EmptyCategory {
                category_id: category.id.clone(),
            });
        }
    }

    result.valid = result.errors.is_empty();
    result
}

/// Ids appearing more than once, in order of first appearance.
fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for id in ids {
        let count = counts.entry(id).or_insert(0);
        if *count == 0 {
            order.push(id);
        }
        *count += 1;
    }
    order
        .into_iter()
        .filter_map(|id| {
            let count = counts[id];
            (count > 1).then(|| (id.to_string(), count))
        })
        .collect()
}
