mod config;
mod database;
mod store;

pub use config::Config;
pub use database::Database;
pub use store::{MemoryStore, PersistedDocument, SqliteStore, StateStore};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, `~/.config/pomotick[-dev]/`.
///
/// `POMOTICK_DATA_DIR` overrides the location entirely (used by tests and
/// scripting); `POMOTICK_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf> {
    let dir = if let Ok(dir) = std::env::var("POMOTICK_DATA_DIR") {
        PathBuf::from(dir)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");
        let env = std::env::var("POMOTICK_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("pomotick-dev")
        } else {
            base_dir.join("pomotick")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
