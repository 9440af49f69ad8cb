//! Persisting a checklist and reopening it yields the same collections.

use checklist::io::config_io::read_config;
use checklist::io::session::Session;
use checklist::io::storage::FileStore;
use checklist::model::{CategoryPatch, ChecklistConfig};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn open(dir: &std::path::Path) -> Session<FileStore> {
    let config = read_config(dir).unwrap();
    Session::open(FileStore::new(dir), &config, Some(dir)).unwrap().0
}

#[test]
fn reopened_session_matches_saved_state() {
    let tmp = TempDir::new().unwrap();

    let mut session = open(tmp.path());
    let morning = session.add_category("Morning", Some("08:30")).unwrap();
    let evening = session.add_category("Evening", None).unwrap();
    let stretch = session.add_item("Stretch", Some(morning.id.as_str())).unwrap();
    session.add_item("Read", Some(evening.id.as_str())).unwrap();
    session.add_item("Water plants", None).unwrap();
    session.toggle_item(&stretch.id);
    session.update_category(
        &evening.id,
        CategoryPatch {
            name: "Night".into(),
            time: Some("22:00".into()),
        },
    );
    assert!(session.take_persist_error().is_none());
    let saved = session.snapshot();

    let reopened = open(tmp.path());
    assert_eq!(reopened.snapshot(), saved);
}

#[test]
fn deleting_a_category_persists_reassignment() {
    let tmp = TempDir::new().unwrap();

    let mut session = open(tmp.path());
    let work = session.add_category("Work", None).unwrap();
    let item = session.add_item("Expenses", Some(work.id.as_str())).unwrap();
    assert!(session.delete_category(&work.id));

    let reopened = open(tmp.path());
    let reloaded = reopened.store().item(&item.id).unwrap();
    assert_eq!(reloaded.category_id, "default");
    assert_eq!(reopened.store().categories().len(), 1);
}

#[test]
fn reads_records_written_by_earlier_versions() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("checklist-categories.json"),
        r#"[{"id":"default","name":"General"},{"id":"1717171717171","name":"Gym","time":"18:00"}]"#,
    )
    .unwrap();
    std::fs::write(
        tmp.path().join("checklist-items.json"),
        r#"[{"id":"1717171717172","text":"Shoes","completed":false,"categoryId":"1717171717171"}]"#,
    )
    .unwrap();

    let session = open(tmp.path());
    let store = session.store();
    assert_eq!(store.categories()[1].label(), "Gym (18:00)");
    assert_eq!(store.items_by_category("1717171717171").len(), 1);
    assert_eq!(ChecklistConfig::default(), read_config(tmp.path()).unwrap());
}
