//! Integration tests for the `cl` CLI.
//!
//! Each test creates a temp directory, runs `cl` as a subprocess,
//! and verifies stdout and/or the stored records.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `cl` binary.
fn cl_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cl"))
}

/// Create a checklist with two categories and three items.
fn create_test_checklist(root: &Path) {
    let data_dir = root.join(".checklist");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(
        data_dir.join("checklist-categories.json"),
        r#"[{"id":"c1","name":"Work"},{"id":"c2","name":"Home","time":"18:00"}]"#,
    )
    .unwrap();
    fs::write(
        data_dir.join("checklist-items.json"),
        r#"[
  {"id":"i1","text":"Send report","completed":false,"categoryId":"c1"},
  {"id":"i2","text":"Water plants","completed":false,"categoryId":"c2"},
  {"id":"i3","text":"Take out trash","completed":true,"categoryId":"c2"}
]"#,
    )
    .unwrap();
}

/// Run `cl` with the given args in the given directory, returning (stdout, stderr, success).
fn run_cl(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(cl_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run cl");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `cl` expecting success, return stdout.
fn run_cl_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_cl(dir, args);
    if !success {
        panic!(
            "cl {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn read_json(root: &Path, record: &str) -> serde_json::Value {
    let path = root.join(".checklist").join(format!("{}.json", record));
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[test]
fn test_init_seeds_general_category() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_cl_ok(tmp.path(), &["init"]);
    assert!(out.contains("Initialized checklist"));
    assert!(out.contains("General (default)"));

    let categories = read_json(tmp.path(), "checklist-categories");
    assert_eq!(categories, serde_json::json!([{"id": "default", "name": "General"}]));

    let (_, stderr, success) = run_cl(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_missing_checklist_is_an_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_cl(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.contains("cl init"));
}

#[test]
fn test_discovers_checklist_from_subdirectory() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    let nested = tmp.path().join("src/deep");
    fs::create_dir_all(&nested).unwrap();
    let out = run_cl_ok(&nested, &["list"]);
    assert!(out.contains("Send report"));
}

#[test]
fn test_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let elsewhere = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    let dir = tmp.path().to_string_lossy().to_string();
    let out = run_cl_ok(elsewhere.path(), &["-C", &dir, "categories"]);
    assert!(out.contains("c1  Work  0/1"));
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_list_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    let out = run_cl_ok(tmp.path(), &["list"]);
    assert!(out.contains("== Work [c1] 0/1 =="));
    assert!(out.contains("== Home (18:00) [c2] 1/2 =="));
    assert!(out.contains("[ ] i1  Send report"));
    assert!(out.contains("[x] i3  Take out trash"));
}

#[test]
fn test_list_single_category() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    let out = run_cl_ok(tmp.path(), &["list", "c2"]);
    assert!(out.contains("Water plants"));
    assert!(!out.contains("Send report"));

    let (_, stderr, success) = run_cl(tmp.path(), &["list", "nope"]);
    assert!(!success);
    assert!(stderr.contains("category not found"));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    let out = run_cl_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["id"], "c1");
    assert_eq!(arr[0]["items"][0]["id"], "i1");
    assert_eq!(arr[1]["done"], 1);
    assert_eq!(arr[1]["total"], 2);
    assert_eq!(arr[1]["completed"], false);
}

// ---------------------------------------------------------------------------
// Item commands
// ---------------------------------------------------------------------------

#[test]
fn test_add_item_to_category() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    let out = run_cl_ok(tmp.path(), &["add", "Buy milk", "--category", "c2", "--json"]);
    let added: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(added["text"], "Buy milk");
    assert_eq!(added["completed"], false);
    assert_eq!(added["categoryId"], "c2");

    let items = read_json(tmp.path(), "checklist-items");
    assert_eq!(items.as_array().unwrap().len(), 4);
    assert_eq!(items[3]["text"], "Buy milk");
}

#[test]
fn test_add_item_defaults_to_first_category() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    run_cl_ok(tmp.path(), &["add", "Call back"]);
    let items = read_json(tmp.path(), "checklist-items");
    assert_eq!(items[3]["categoryId"], "c1");
}

#[test]
fn test_add_rejects_blank_text_and_unknown_category() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    let (_, stderr, success) = run_cl(tmp.path(), &["add", "   "]);
    assert!(!success);
    assert!(stderr.contains("cannot be empty"));

    let (_, stderr, success) = run_cl(tmp.path(), &["add", "Task", "--category", "zz"]);
    assert!(!success);
    assert!(stderr.contains("category not found: zz"));

    assert_eq!(read_json(tmp.path(), "checklist-items").as_array().unwrap().len(), 3);
}

#[test]
fn test_toggle_and_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    let out = run_cl_ok(tmp.path(), &["toggle", "i1"]);
    assert!(out.contains("[x] i1"));
    assert_eq!(read_json(tmp.path(), "checklist-items")[0]["completed"], true);

    run_cl_ok(tmp.path(), &["rm", "i1"]);
    let items = read_json(tmp.path(), "checklist-items");
    assert_eq!(items.as_array().unwrap().len(), 2);

    let (_, stderr, success) = run_cl(tmp.path(), &["toggle", "i1"]);
    assert!(!success);
    assert!(stderr.contains("item not found"));
}

#[test]
fn test_edit_item() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    run_cl_ok(tmp.path(), &["edit", "i1", "--text", "Send final report", "--category", "c2"]);
    let items = read_json(tmp.path(), "checklist-items");
    assert_eq!(items[0]["text"], "Send final report");
    assert_eq!(items[0]["categoryId"], "c2");

    let (_, _, success) = run_cl(tmp.path(), &["edit", "i1", "--text", " "]);
    assert!(!success);
    assert_eq!(read_json(tmp.path(), "checklist-items")[0]["text"], "Send final report");
}

// ---------------------------------------------------------------------------
// Category commands
// ---------------------------------------------------------------------------

#[test]
fn test_category_add_and_edit() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    let id = run_cl_ok(tmp.path(), &["category", "add", "Groceries", "--time", "10:00"])
        .trim()
        .to_string();
    let categories = read_json(tmp.path(), "checklist-categories");
    assert_eq!(categories[2]["id"], id.as_str());
    assert_eq!(categories[2]["name"], "Groceries");
    assert_eq!(categories[2]["time"], "10:00");

    run_cl_ok(tmp.path(), &["category", "edit", &id, "--name", "Shopping", "--clear-time"]);
    let categories = read_json(tmp.path(), "checklist-categories");
    assert_eq!(categories[2]["name"], "Shopping");
    assert!(categories[2].get("time").is_none());

    let (_, _, success) = run_cl(tmp.path(), &["category", "add", "  "]);
    assert!(!success);
    assert_eq!(read_json(tmp.path(), "checklist-categories").as_array().unwrap().len(), 3);
}

#[test]
fn test_category_rm_moves_items() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    let out = run_cl_ok(tmp.path(), &["category", "rm", "c2"]);
    assert!(out.contains("moved 2 item(s) to c1"));

    let categories = read_json(tmp.path(), "checklist-categories");
    assert_eq!(categories, serde_json::json!([{"id": "c1", "name": "Work"}]));
    let items = read_json(tmp.path(), "checklist-items");
    for item in items.as_array().unwrap() {
        assert_eq!(item["categoryId"], "c1");
    }

    let (_, stderr, success) = run_cl(tmp.path(), &["category", "rm", "c1"]);
    assert!(!success);
    assert!(stderr.contains("last category"));
}

#[test]
fn test_category_done_and_undone() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    let out = run_cl_ok(tmp.path(), &["category", "done", "c2"]);
    assert!(out.contains("completed 1 item(s)"));
    let items = read_json(tmp.path(), "checklist-items");
    assert_eq!(items[0]["completed"], false);
    assert_eq!(items[1]["completed"], true);
    assert_eq!(items[2]["completed"], true);

    let out = run_cl_ok(tmp.path(), &["list", "c2"]);
    assert!(out.contains("2/2 == ✓"));

    run_cl_ok(tmp.path(), &["category", "undone", "c2"]);
    let items = read_json(tmp.path(), "checklist-items");
    assert_eq!(items[1]["completed"], false);
    assert_eq!(items[2]["completed"], false);
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

#[test]
fn test_check_clean_data() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    let out = run_cl_ok(tmp.path(), &["check"]);
    assert!(out.contains("ok: 2 categories, 3 items"));
}

#[test]
fn test_check_reports_orphans_then_load_repairs() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_checklist(tmp.path());
    fs::write(
        tmp.path().join(".checklist/checklist-items.json"),
        r#"[{"id":"i9","text":"Lost","completed":false,"categoryId":"gone"}]"#,
    )
    .unwrap();

    let (stdout, _, success) = run_cl(tmp.path(), &["check", "--json"]);
    assert!(!success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["valid"], false);
    assert_eq!(parsed["errors"][0]["type"], "orphaned_item");

    // Any other command loads, repairs and writes back
    run_cl_ok(tmp.path(), &["list"]);
    assert_eq!(read_json(tmp.path(), "checklist-items")[0]["categoryId"], "c1");
    run_cl_ok(tmp.path(), &["check"]);
}

#[test]
fn test_check_unwritten_records_are_valid() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".checklist")).unwrap();
    let out = run_cl_ok(tmp.path(), &["check"]);
    assert!(out.contains("ok: 0 categories, 0 items"));
}

#[test]
fn test_check_stored_empty_category_list_is_an_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data_dir = tmp.path().join(".checklist");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("checklist-categories.json"), "[]").unwrap();

    let (stdout, _, success) = run_cl(tmp.path(), &["check", "--json"]);
    assert!(!success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["errors"][0]["type"], "no_categories");
}
