use crate::io::storage::{KeyValueStore, StorageError};
use crate::model::category::Category;
use crate::model::config::StorageConfig;
use crate::model::item::ChecklistItem;

/// Both records as read from storage. `None` means the record is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredRecords {
    pub categories: Option<Vec<Category>>,
    pub items: Option<Vec<ChecklistItem>>,
}

/// Read and decode the category and item records.
pub fn load_records<S: KeyValueStore + ?Sized>(
    kv: &S,
    config: &StorageConfig,
) -> Result<StoredRecords, StorageError> {
    Ok(StoredRecords {
        categories: load_record(kv, &config.categories_key)?,
        items: load_record(kv, &config.items_key)?,
    })
}

fn load_record<S, T>(kv: &S, key: &str) -> Result<Option<Vec<T>>, StorageError>
where
    S: KeyValueStore + ?Sized,
    T: serde::de::DeserializeOwned,
{
    let Some(text) = kv.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StorageError::Decode {
            key: key.to_string(),
            source,
        })
}

/// Encode a collection the way it is stored.
pub fn encode_record<T: serde::Serialize>(
    key: &str,
    records: &[T],
) -> Result<String, StorageError> {
    serde_json::to_string(records).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })
}

/// Overwrite both records with the given collections.
pub fn save_records<S: KeyValueStore + ?Sized>(
    kv: &mut S,
    config: &StorageConfig,
    categories: &[Category],
    items: &[ChecklistItem],
) -> Result<(), StorageError> {
    let categories_json = encode_record(&config.categories_key, categories)?;
    let items_json = encode_record(&config.items_key, items)?;
    kv.set(&config.categories_key, &categories_json)?;
    kv.set(&config.items_key, &items_json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_records_load_as_none() {
        let kv = MemoryStore::new();
        let records = load_records(&kv, &StorageConfig::default()).unwrap();
        assert_eq!(records, StoredRecords::default());
    }

    #[test]
    fn reads_stored_json() {
        let kv = MemoryStore::new()
            .with_record(
                "checklist-categories",
                r#"[{"id":"default","name":"General"},{"id":"1718000000000","name":"Morning","time":"08:30"}]"#,
            )
            .with_record(
                "checklist-items",
                r#"[{"id":"1718000000001","text":"Stretch","completed":true,"categoryId":"1718000000000"}]"#,
            );
        let records = load_records(&kv, &StorageConfig::default()).unwrap();
        let categories = records.categories.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].time.as_deref(), Some("08:30"));
        let items = records.items.unwrap();
        assert!(items[0].completed);
        assert_eq!(items[0].category_id, "1718000000000");
    }

    #[test]
    fn corrupt_record_names_its_key() {
        let kv = MemoryStore::new().with_record("checklist-items", "not json {{{");
        let err = load_records(&kv, &StorageConfig::default()).unwrap_err();
        assert!(matches!(err, StorageError::Decode { ref key, .. } if key == "checklist-items"));
    }

    #[test]
    fn save_then_load_is_identity() {
        let mut kv = MemoryStore::new();
        let config = StorageConfig::default();
        let categories = vec![
            Category::new("default".into(), "General".into(), None),
            Category::new("c2".into(), "Evening".into(), Some("21:00".into())),
        ];
        let mut done = ChecklistItem::new("i2".into(), "Lock door".into(), "c2".into());
        done.completed = true;
        let items = vec![
            ChecklistItem::new("i1".into(), "Read".into(), "default".into()),
            done,
        ];
        save_records(&mut kv, &config, &categories, &items).unwrap();
        let records = load_records(&kv, &config).unwrap();
        assert_eq!(records.categories, Some(categories));
        assert_eq!(records.items, Some(items));
    }

    #[test]
    fn custom_keys_are_honored() {
        let mut kv = MemoryStore::new();
        let config = StorageConfig {
            categories_key: "cats".into(),
            items_key: "todo".into(),
        };
        save_records(&mut kv, &config, &[], &[]).unwrap();
        assert_eq!(kv.record("cats"), Some("[]"));
        assert_eq!(kv.record("todo"), Some("[]"));
        assert_eq!(kv.record("checklist-items"), None);
    }
}
