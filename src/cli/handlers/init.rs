use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE, CONFIG_TEMPLATE, DATA_DIR_NAME};
use crate::io::session::Session;
use crate::io::storage::FileStore;

pub fn cmd_init(args: InitArgs, base: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = base.join(DATA_DIR_NAME);

    if data_dir.is_dir() && !args.force {
        return Err(format!(
            "checklist already exists in {} (use --force to rewrite {})",
            data_dir.display(),
            CONFIG_FILE
        )
        .into());
    }

    // Note an enclosing checklist that this one will shadow
    if let Some(parent) = base.parent()
        && let Some(outer) = config_io::discover_data_dir(parent)
    {
        eprintln!("Note: enclosing checklist found at {}", outer.display());
    }

    fs::create_dir_all(&data_dir)?;
    fs::write(data_dir.join(CONFIG_FILE), CONFIG_TEMPLATE)?;

    // Opening seeds the default category when no records exist yet
    let config = config_io::read_config(&data_dir)?;
    let (mut session, report) =
        Session::open(FileStore::new(&data_dir), &config, Some(&data_dir))?;
    if let Some(e) = session.take_persist_error() {
        return Err(e.into());
    }

    println!("Initialized checklist in {}", data_dir.display());
    if report.seeded {
        println!(
            "  category: {} ({})",
            config.defaults.category_name, config.defaults.category_id
        );
    }
    Ok(())
}
