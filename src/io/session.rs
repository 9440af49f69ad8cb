//! A store bound to its persistence backend.
//!
//! After every mutation that changes state, both collections are written
//! back in full. A failed write never touches the in-memory state: it is
//! logged, the unsaved records go to the recovery log (when a data
//! directory is known), and the error is held for the caller.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::io::checklist_io::{encode_record, load_records, save_records};
use crate::io::recovery::{RecoveryEntry, log_recovery};
use crate::io::storage::{KeyValueStore, StorageError};
use crate::model::category::{Category, CategoryPatch};
use crate::model::config::{ChecklistConfig, StorageConfig};
use crate::model::item::{ChecklistItem, ItemPatch};
use crate::model::snapshot::Snapshot;
use crate::ops::ids::IdGenerator;
use crate::ops::store::{Repair, Store};

/// How the session came up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenReport {
    /// No category record existed; the default category was seeded
    pub seeded: bool,
    /// Loaded data had to be repaired
    pub repair: Repair,
}

#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
    kv: S,
    storage: StorageConfig,
    store: Store,
    recovery_dir: Option<PathBuf>,
    persist_error: Option<StorageError>,
}

impl<S: KeyValueStore> Session<S> {
    /// Load both records and build the store. If the category record is
    /// absent (or loaded data needed repair) the result is written back
    /// immediately. `recovery_dir` receives unsaved records if any write,
    /// including that first one, fails.
    pub fn open(
        kv: S,
        config: &ChecklistConfig,
        recovery_dir: Option<&Path>,
    ) -> Result<(Self, OpenReport), StorageError> {
        let records = load_records(&kv, &config.storage)?;
        let mut report = OpenReport::default();

        let store = match (records.categories, records.items) {
            (None, None) => {
                report.seeded = true;
                Store::new(config.defaults.clone())
            }
            (categories, items) => {
                report.seeded = categories.is_none();
                let (store, repair) = Store::from_parts(
                    config.defaults.clone(),
                    categories.unwrap_or_default(),
                    items.unwrap_or_default(),
                );
                report.repair = repair;
                store
            }
        };

        let mut session = Session {
            kv,
            storage: config.storage.clone(),
            store,
            recovery_dir: recovery_dir.map(Path::to_path_buf),
            persist_error: None,
        };
        if report.seeded || !report.repair.is_empty() {
            debug!(seeded = report.seeded, "writing back initial state");
            session.persist();
        }
        Ok((session, report))
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.store.set_id_generator(ids);
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn backend(&self) -> &S {
        &self.kv
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// The most recent write failure, if any, clearing it.
    pub fn take_persist_error(&mut self) -> Option<StorageError> {
        self.persist_error.take()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn add_category(&mut self, name: &str, time: Option<&str>) -> Option<Category> {
        let added = self.store.add_category(name, time);
        self.persist_if(added.is_some());
        added
    }

    pub fn add_item(&mut self, text: &str, category_id: Option<&str>) -> Option<ChecklistItem> {
        let added = self.store.add_item(text, category_id);
        self.persist_if(added.is_some());
        added
    }

    pub fn update_category(&mut self, id: &str, patch: CategoryPatch) -> bool {
        let applied = self.store.update_category(id, patch);
        self.persist_if(applied)
    }

    pub fn update_item(&mut self, id: &str, patch: ItemPatch) -> bool {
        let applied = self.store.update_item(id, patch);
        self.persist_if(applied)
    }

    pub fn delete_category(&mut self, id: &str) -> bool {
        let applied = self.store.delete_category(id);
        self.persist_if(applied)
    }

    pub fn delete_item(&mut self, id: &str) -> bool {
        let applied = self.store.delete_item(id);
        self.persist_if(applied)
    }

    pub fn toggle_item(&mut self, id: &str) -> bool {
        let applied = self.store.toggle_item(id);
        self.persist_if(applied)
    }

    pub fn toggle_category(&mut self, category_id: &str, completed: bool) -> usize {
        let changed = self.store.toggle_category(category_id, completed);
        self.persist_if(changed > 0);
        changed
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn persist_if(&mut self, changed: bool) -> bool {
        if changed {
            self.persist();
        }
        changed
    }

    fn persist(&mut self) {
        let result = save_records(
            &mut self.kv,
            &self.storage,
            self.store.categories(),
            self.store.items(),
        );
        if let Err(e) = result {
            warn!(error = %e, "could not save checklist; in-memory state kept");
            if let Some(dir) = &self.recovery_dir {
                self.log_unsaved(dir, &e);
            }
            self.persist_error = Some(e);
        }
    }

    fn log_unsaved(&self, dir: &Path, error: &StorageError) {
        let records = [
            (
                &self.storage.categories_key,
                encode_record(&self.storage.categories_key, self.store.categories()),
            ),
            (
                &self.storage.items_key,
                encode_record(&self.storage.items_key, self.store.items()),
            ),
        ];
        for (key, encoded) in records {
            let Ok(body) = encoded else { continue };
            log_recovery(
                dir,
                RecoveryEntry {
                    timestamp: Utc::now(),
                    description: "record write failed".to_string(),
                    fields: vec![
                        ("Key".to_string(), key.clone()),
                        ("Error".to_string(), error.to_string()),
                    ],
                    body,
                },
            );
        }
    }
}
