use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::ChecklistConfig;

/// Name of the directory holding a checklist's records and config.
pub const DATA_DIR_NAME: &str = ".checklist";

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "checklist.toml";

pub const CONFIG_TEMPLATE: &str = r##"# checklist configuration. Every value is optional.

[storage]
# Record names; each record is stored as <name>.json next to this file.
categories_key = "checklist-categories"
items_key = "checklist-items"

[defaults]
# The category seeded into an empty checklist.
category_id = "default"
category_name = "General"
"##;

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read `checklist.toml` from the data directory. A missing file yields
/// the defaults.
pub fn read_config(data_dir: &Path) -> Result<ChecklistConfig, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ChecklistConfig::default());
        }
        Err(source) => return Err(ConfigError::ReadError { path, source }),
    };
    let config: ChecklistConfig =
        toml::from_str(&text).map_err(|source| ConfigError::ParseError { path, source })?;
    Ok(config.normalized())
}

/// Walk up from `start` looking for a `.checklist/` directory.
pub fn discover_data_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
