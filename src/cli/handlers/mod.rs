mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::checklist_io;
use crate::io::config_io;
use crate::io::session::Session;
use crate::io::storage::FileStore;
use crate::model::category::CategoryPatch;
use crate::model::item::ItemPatch;
use crate::ops::check;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let base = base_dir(cli.dir.as_deref())?;

    match cli.command {
        Commands::Init(args) => cmd_init(args, &base),

        // Read commands
        Commands::List(args) => cmd_list(&base, args, json),
        Commands::Categories => cmd_categories(&base, json),
        Commands::Check => cmd_check(&base, json),

        // Write commands
        Commands::Add(args) => cmd_add(&base, args, json),
        Commands::Edit(args) => cmd_edit(&base, args),
        Commands::Rm(args) => cmd_rm(&base, args),
        Commands::Toggle(args) => cmd_toggle(&base, args),
        Commands::Category(cmd) => match cmd.action {
            CategoryAction::Add(args) => cmd_category_add(&base, args, json),
            CategoryAction::Edit(args) => cmd_category_edit(&base, args),
            CategoryAction::Rm(args) => cmd_category_rm(&base, args),
            CategoryAction::Done(args) => cmd_category_mark(&base, args, true),
            CategoryAction::Undone(args) => cmd_category_mark(&base, args, false),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn base_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(d) => Ok(std::fs::canonicalize(d)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", d, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

fn find_data_dir(base: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    config_io::discover_data_dir(base).ok_or_else(|| {
        format!(
            "no {} directory found (run `cl init` first)",
            config_io::DATA_DIR_NAME
        )
        .into()
    })
}

fn open_session(base: &Path) -> Result<Session<FileStore>, Box<dyn std::error::Error>> {
    let data_dir = find_data_dir(base)?;
    let config = config_io::read_config(&data_dir)?;
    // Repairs are reported by the store's own warnings
    let (session, _report) =
        Session::open(FileStore::new(&data_dir), &config, Some(&data_dir))?;
    Ok(session)
}

/// Surface a failed write, whether from a mutation or the write-back at open.
fn finish(session: &mut Session<FileStore>) -> CmdResult {
    match session.take_persist_error() {
        Some(e) => Err(format!("checklist not saved: {}", e).into()),
        None => Ok(()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(base: &Path, args: ListArgs, json: bool) -> CmdResult {
    let mut session = open_session(base)?;
    let store = session.store();
    let filter = args.category.as_deref();
    if let Some(id) = filter
        && store.category(id).is_none()
    {
        return Err(format!("category not found: {}", id).into());
    }

    if json {
        print_json(&listing_to_json(store, filter))?;
    } else {
        for line in format_listing(store, filter) {
            println!("{}", line);
        }
    }
    finish(&mut session)
}

fn cmd_categories(base: &Path, json: bool) -> CmdResult {
    let mut session = open_session(base)?;
    let store = session.store();
    if json {
        let categories: Vec<_> = store
            .categories()
            .iter()
            .map(|c| category_to_json(store, c))
            .collect();
        print_json(&categories)?;
    } else {
        for category in store.categories() {
            println!("{}", format_category_line(store, category));
        }
    }
    finish(&mut session)
}

/// Validate the raw records, before any load-time repair.
fn cmd_check(base: &Path, json: bool) -> CmdResult {
    let data_dir = find_data_dir(base)?;
    let config = config_io::read_config(&data_dir)?;
    let records = checklist_io::load_records(&FileStore::new(&data_dir), &config.storage)?;
    let items = records.items.unwrap_or_default();
    let result = check::check_store(records.categories.as_deref(), &items);

    if json {
        print_json(&result)?;
    } else {
        for error in &result.errors {
            println!("error: {}", describe_error(error));
        }
        for warning in &result.warnings {
            println!("warning: {}", describe_warning(warning));
        }
        if result.valid {
            println!(
                "ok: {} categories, {} items",
                records.categories.as_ref().map_or(0, Vec::len),
                items.len()
            );
        }
    }

    if result.valid {
        Ok(())
    } else {
        Err(format!("{} error(s) found", result.errors.len()).into())
    }
}

fn describe_error(error: &check::CheckError) -> String {
    match error {
        check::CheckError::NoCategories => "no categories stored".to_string(),
        check::CheckError::OrphanedItem {
            item_id,
            category_id,
        } => format!("item {} refers to missing category {}", item_id, category_id),
        check::CheckError::DuplicateCategoryId { category_id, count } => {
            format!("category id {} used {} times", category_id, count)
        }
        check::CheckError::DuplicateItemId { item_id, count } => {
            format!("item id {} used {} times", item_id, count)
        }
    }
}

fn describe_warning(warning: &check::CheckWarning) -> String {
    match warning {
        check::CheckWarning::BlankCategoryName { category_id } => {
            format!("category {} has a blank name", category_id)
        }
        check::CheckWarning::BlankItemText { item_id } => {
            format!("item {} has blank text", item_id)
        }
        check::CheckWarning::EmptyCategory { category_id } => {
            format!("category {} has no items", category_id)
        }
    }
}

// ---------------------------------------------------------------------------
// Item handlers
// ---------------------------------------------------------------------------

fn cmd_add(base: &Path, args: AddArgs, json: bool) -> CmdResult {
    let mut session = open_session(base)?;
    let item = session
        .add_item(&args.text, args.category.as_deref())
        .ok_or_else(|| match args.category.as_deref() {
            Some(c) if !c.trim().is_empty() && !args.text.trim().is_empty() => {
                format!("category not found: {}", c)
            }
            _ => "item text cannot be empty".to_string(),
        })?;
    finish(&mut session)?;
    if json {
        print_json(&item)
    } else {
        println!("{}", item.id);
        Ok(())
    }
}

fn cmd_edit(base: &Path, args: EditArgs) -> CmdResult {
    if args.text.is_none() && args.category.is_none() {
        return Err("nothing to change (use --text and/or --category)".into());
    }
    let mut session = open_session(base)?;
    let current = session
        .store()
        .item(&args.id)
        .ok_or_else(|| format!("item not found: {}", args.id))?;
    let mut patch = ItemPatch::from_item(current);
    if let Some(text) = args.text {
        patch.text = text;
    }
    if let Some(category) = args.category {
        if session.store().category(&category).is_none() {
            return Err(format!("category not found: {}", category).into());
        }
        patch.category_id = category;
    }
    if !session.update_item(&args.id, patch) {
        return Err("item text cannot be empty".into());
    }
    finish(&mut session)?;
    println!("updated {}", args.id);
    Ok(())
}

fn cmd_rm(base: &Path, args: IdArg) -> CmdResult {
    let mut session = open_session(base)?;
    if !session.delete_item(&args.id) {
        return Err(format!("item not found: {}", args.id).into());
    }
    finish(&mut session)?;
    println!("deleted {}", args.id);
    Ok(())
}

fn cmd_toggle(base: &Path, args: IdArg) -> CmdResult {
    let mut session = open_session(base)?;
    if !session.toggle_item(&args.id) {
        return Err(format!("item not found: {}", args.id).into());
    }
    finish(&mut session)?;
    if let Some(item) = session.store().item(&args.id) {
        println!("{}", format_item_line(item));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Category handlers
// ---------------------------------------------------------------------------

fn cmd_category_add(base: &Path, args: CategoryAddArgs, json: bool) -> CmdResult {
    let mut session = open_session(base)?;
    let category = session
        .add_category(&args.name, args.time.as_deref())
        .ok_or("category name cannot be empty")?;
    finish(&mut session)?;
    if json {
        print_json(&category)
    } else {
        println!("{}", category.id);
        Ok(())
    }
}

fn cmd_category_edit(base: &Path, args: CategoryEditArgs) -> CmdResult {
    if args.name.is_none() && args.time.is_none() && !args.clear_time {
        return Err("nothing to change (use --name, --time or --clear-time)".into());
    }
    let mut session = open_session(base)?;
    let current = session
        .store()
        .category(&args.id)
        .ok_or_else(|| format!("category not found: {}", args.id))?;
    let mut patch = CategoryPatch::from_category(current);
    if let Some(name) = args.name {
        patch.name = name;
    }
    if args.clear_time {
        patch.time = None;
    } else if let Some(time) = args.time {
        patch.time = Some(time);
    }
    if !session.update_category(&args.id, patch) {
        return Err("category name cannot be empty".into());
    }
    finish(&mut session)?;
    println!("updated {}", args.id);
    Ok(())
}

fn cmd_category_rm(base: &Path, args: IdArg) -> CmdResult {
    let mut session = open_session(base)?;
    if session.store().category(&args.id).is_none() {
        return Err(format!("category not found: {}", args.id).into());
    }
    let moved = session.store().items_by_category(&args.id).len();
    if !session.delete_category(&args.id) {
        return Err("cannot delete the last category".into());
    }
    finish(&mut session)?;
    println!("deleted {}", args.id);
    if moved > 0 {
        let target = session.store().fallback_category_id();
        println!("moved {} item(s) to {}", moved, target);
    }
    Ok(())
}

fn cmd_category_mark(base: &Path, args: IdArg, completed: bool) -> CmdResult {
    let mut session = open_session(base)?;
    if session.store().category(&args.id).is_none() {
        return Err(format!("category not found: {}", args.id).into());
    }
    let changed = session.toggle_category(&args.id, completed);
    finish(&mut session)?;
    println!(
        "{} {} item(s)",
        if completed { "completed" } else { "reopened" },
        changed
    );
    Ok(())
}
