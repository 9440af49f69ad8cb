use super::category::Category;
use super::item::ChecklistItem;

/// An owned copy of both collections, for comparing state before and after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub categories: Vec<Category>,
    pub items: Vec<ChecklistItem>,
}
