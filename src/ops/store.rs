//! The checklist store: sole owner of the category and item collections.
//!
//! Every mutation goes through a method here. Rejected input (blank text,
//! unknown ids, deleting the last category) leaves both collections exactly
//! as they were and is reported through the return value only.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use crate::model::category::{Category, CategoryPatch};
use crate::model::config::DefaultsConfig;
use crate::model::item::{ChecklistItem, ItemPatch};
use crate::model::snapshot::Snapshot;
use crate::ops::ids::{IdGenerator, TimestampIds};

/// What `Store::from_parts` had to change to make loaded data consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repair {
    /// The category collection was empty and the default category was seeded
    pub seeded_default: bool,
    /// Ids of categories dropped because an earlier category already used them
    pub dropped_categories: Vec<String>,
    /// Ids of items whose category did not exist, now moved to the fallback
    pub reassigned_items: Vec<String>,
}

impl Repair {
    pub fn is_empty(&self) -> bool {
        !self.seeded_default
            && self.dropped_categories.is_empty()
            && self.reassigned_items.is_empty()
    }
}

pub struct Store {
    defaults: DefaultsConfig,
    categories: Vec<Category>,
    items: Vec<ChecklistItem>,
    ids: Box<dyn IdGenerator>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("defaults", &self.defaults)
            .field("categories", &self.categories)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// A fresh store holding only the default category.
    pub fn new(defaults: DefaultsConfig) -> Self {
        let seed = default_category(&defaults);
        Store {
            defaults,
            categories: vec![seed],
            items: Vec::new(),
            ids: Box::new(TimestampIds::new()),
        }
    }

    /// Build a store from previously persisted collections, restoring the
    /// invariants if the data violates them.
    pub fn from_parts(
        defaults: DefaultsConfig,
        mut categories: Vec<Category>,
        mut items: Vec<ChecklistItem>,
    ) -> (Self, Repair) {
        let mut repair = Repair::default();

        if categories.is_empty() {
            warn!("no categories stored; seeding default category");
            categories.push(default_category(&defaults));
            repair.seeded_default = true;
        }

        // First occurrence of an id wins; its items stay with it
        let mut seen = HashSet::new();
        categories.retain(|c| {
            if seen.insert(c.id.clone()) {
                return true;
            }
            warn!(category = %c.id, name = %c.name, "duplicate category id; dropping");
            repair.dropped_categories.push(c.id.clone());
            false
        });

        let fallback = categories[0].id.clone();
        for item in &mut items {
            if !categories.iter().any(|c| c.id == item.category_id) {
                warn!(
                    item = %item.id,
                    category = %item.category_id,
                    fallback = %fallback,
                    "item refers to a missing category; reassigning"
                );
                item.category_id = fallback.clone();
                repair.reassigned_items.push(item.id.clone());
            }
        }

        let store = Store {
            defaults,
            categories,
            items,
            ids: Box::new(TimestampIds::new()),
        };
        (store, repair)
    }

    /// Replace the id source (tests use `SequentialIds`).
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.set_id_generator(ids);
        self
    }

    pub fn set_id_generator(&mut self, ids: impl IdGenerator + 'static) {
        self.ids = Box::new(ids);
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&ChecklistItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// An owned copy of both collections.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            categories: self.categories.clone(),
            items: self.items.clone(),
        }
    }

    /// Items filed under `category_id`, in collection order.
    pub fn items_by_category(&self, category_id: &str) -> Vec<&ChecklistItem> {
        self.items
            .iter()
            .filter(|i| i.category_id == category_id)
            .collect()
    }

    /// True when the category has items and all of them are completed.
    /// An empty category is never complete.
    pub fn is_category_completed(&self, category_id: &str) -> bool {
        let mut any = false;
        for item in self.items.iter().filter(|i| i.category_id == category_id) {
            if !item.completed {
                return false;
            }
            any = true;
        }
        any
    }

    /// `(completed, total)` item counts for a category.
    pub fn category_progress(&self, category_id: &str) -> (usize, usize) {
        self.items
            .iter()
            .filter(|i| i.category_id == category_id)
            .fold((0, 0), |(done, total), i| {
                (done + usize::from(i.completed), total + 1)
            })
    }

    /// Category new items land in when none is chosen: the first one, or the
    /// configured default id if the collection is somehow empty.
    pub fn fallback_category_id(&self) -> String {
        self.categories
            .first()
            .map(|c| c.id.clone())
            .unwrap_or_else(|| self.defaults.category_id.clone())
    }

    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    /// Append a category. Returns `None` if `name` is blank.
    pub fn add_category(&mut self, name: &str, time: Option<&str>) -> Option<Category> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let categories = &self.categories;
        let id = self
            .ids
            .next_id(&|id: &str| categories.iter().any(|c| c.id == id));
        let category = Category::new(id, name.to_string(), normalize_time(time));
        debug!(id = %category.id, name = %category.name, "category added");
        self.categories.push(category.clone());
        Some(category)
    }

    /// Replace a category's name and time in place.
    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> bool {
        let name = patch.name.trim();
        if name.is_empty() {
            return false;
        }
        let Some(category) = self.categories.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        category.name = name.to_string();
        category.time = normalize_time(patch.time.as_deref());
        debug!(id, "category updated");
        true
    }

    /// Remove a category, moving its items to the first other category.
    /// Refuses to remove the last remaining category.
    pub fn delete_category(&mut self, id: &str) -> bool {
        if self.categories.len() <= 1 {
            return false;
        }
        let Some(pos) = self.categories.iter().position(|c| c.id == id) else {
            return false;
        };
        // At least two categories remain here, so another position exists
        let fallback = self.categories[if pos == 0 { 1 } else { 0 }].id.clone();

        let mut moved = 0usize;
        for item in self.items.iter_mut().filter(|i| i.category_id == id) {
            item.category_id = fallback.clone();
            moved += 1;
        }
        self.categories.remove(pos);
        debug!(id, fallback = %fallback, moved, "category deleted");
        true
    }

    /// Set `completed` on every item in the category. Returns how many items
    /// actually changed.
    pub fn toggle_category(&mut self, category_id: &str, completed: bool) -> usize {
        let mut changed = 0usize;
        for item in self
            .items
            .iter_mut()
            .filter(|i| i.category_id == category_id)
        {
            if item.completed != completed {
                item.completed = completed;
                changed += 1;
            }
        }
        if changed > 0 {
            debug!(category_id, completed, changed, "category toggled");
        }
        changed
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    /// Append an item. A missing or blank `category_id` files it under the
    /// fallback category; an unknown one is rejected.
    pub fn add_item(&mut self, text: &str, category_id: Option<&str>) -> Option<ChecklistItem> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let category_id = match category_id.map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) if self.category(c).is_some() => c.to_string(),
            Some(_) => return None,
            None => self.fallback_category_id(),
        };
        let items = &self.items;
        let id = self.ids.next_id(&|id: &str| items.iter().any(|i| i.id == id));
        let item = ChecklistItem::new(id, text.to_string(), category_id);
        debug!(id = %item.id, category_id = %item.category_id, "item added");
        self.items.push(item.clone());
        Some(item)
    }

    /// Replace an item's text and category in place.
    pub fn update_item(&mut self, id: &str, patch: ItemPatch) -> bool {
        let text = patch.text.trim();
        if text.is_empty() || self.category(&patch.category_id).is_none() {
            return false;
        }
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        item.text = text.to_string();
        item.category_id = patch.category_id;
        debug!(id, "item updated");
        true
    }

    pub fn delete_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        let removed = self.items.len() != before;
        if removed {
            debug!(id, "item deleted");
        }
        removed
    }

    pub fn toggle_item(&mut self, id: &str) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        item.completed = !item.completed;
        debug!(id, completed = item.completed, "item toggled");
        true
    }
}

fn default_category(defaults: &DefaultsConfig) -> Category {
    Category::new(
        defaults.category_id.clone(),
        defaults.category_name.clone(),
        None,
    )
}

/// Blank time labels are stored as absent.
fn normalize_time(time: Option<&str>) -> Option<String> {
    time.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
