use serde::Serialize;

use crate::model::category::Category;
use crate::model::item::ChecklistItem;
use crate::ops::store::Store;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct CategoryJson<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<&'a str>,
    pub completed: bool,
    pub done: usize,
    pub total: usize,
}

#[derive(Serialize)]
pub struct CategoryListingJson<'a> {
    #[serde(flatten)]
    pub category: CategoryJson<'a>,
    pub items: Vec<&'a ChecklistItem>,
}

pub fn category_to_json<'a>(store: &Store, category: &'a Category) -> CategoryJson<'a> {
    let (done, total) = store.category_progress(&category.id);
    CategoryJson {
        id: &category.id,
        name: &category.name,
        time: category.time.as_deref(),
        completed: store.is_category_completed(&category.id),
        done,
        total,
    }
}

pub fn listing_to_json<'a>(store: &'a Store, filter: Option<&str>) -> Vec<CategoryListingJson<'a>> {
    store
        .categories()
        .iter()
        .filter(|c| filter.is_none_or(|f| c.id == f))
        .map(|c| CategoryListingJson {
            category: category_to_json(store, c),
            items: store.items_by_category(&c.id),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `[x] 1718000000001  Buy milk`
pub fn format_item_line(item: &ChecklistItem) -> String {
    format!("[{}] {}  {}", item.checkbox_char(), item.id, item.text)
}

/// `== Morning (08:30) [c1] 1/2 ==`, with a trailing check when complete
pub fn format_category_header(store: &Store, category: &Category) -> String {
    let (done, total) = store.category_progress(&category.id);
    let mark = if store.is_category_completed(&category.id) {
        " ✓"
    } else {
        ""
    };
    format!(
        "== {} [{}] {}/{} =={}",
        category.label(),
        category.id,
        done,
        total,
        mark
    )
}

/// Full listing: every category header followed by its items.
pub fn format_listing(store: &Store, filter: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    for category in store
        .categories()
        .iter()
        .filter(|c| filter.is_none_or(|f| c.id == f))
    {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format_category_header(store, category));
        let items = store.items_by_category(&category.id);
        if items.is_empty() {
            lines.push("  (no items)".to_string());
        }
        for item in items {
            lines.push(format!("  {}", format_item_line(item)));
        }
    }
    lines
}

/// One line per category: `c1  Morning (08:30)  1/2`
pub fn format_category_line(store: &Store, category: &Category) -> String {
    let (done, total) = store.category_progress(&category.id);
    format!("{}  {}  {}/{}", category.id, category.label(), done, total)
}
