//! The persistence port.
//!
//! The engine depends on storage only through [`StateStore`]: load the whole
//! persisted document, save the whole persisted document. Atomicity is the
//! store's problem; the document is small enough that there is nothing to
//! journal.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use super::database::Database;
use crate::error::Result;
use crate::settings::Settings;
use crate::stats::Statistics;
use crate::timer::TimerEngine;

const STATE_KEY: &str = "engine_state";

/// The document the engine persists.
///
/// Every field is independently optional on load; missing fields fall back
/// to defaults so a document written by an older build still restores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDocument {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub timer_state: TimerEngine,
    #[serde(default)]
    pub statistics: Statistics,
}

/// Port through which the engine loads and saves its document.
pub trait StateStore {
    /// Load the persisted document, or `None` on first run.
    fn load(&self) -> Result<Option<PersistedDocument>>;

    /// Atomically replace the persisted document.
    fn save(&self, doc: &PersistedDocument) -> Result<()>;
}

/// [`StateStore`] backed by the SQLite kv table.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the store at the default data directory.
    pub fn open() -> Result<Self> {
        Ok(Self {
            db: Database::open()?,
        })
    }

    /// In-memory store (for tests).
    pub fn open_memory() -> Result<Self> {
        Ok(Self {
            db: Database::open_memory()?,
        })
    }
}

impl StateStore for SqliteStore {
    fn load(&self) -> Result<Option<PersistedDocument>> {
        match self.db.kv_get(STATE_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, doc: &PersistedDocument) -> Result<()> {
        let json = serde_json::to_string(doc)?;
        self.db.kv_set(STATE_KEY, &json)
    }
}

/// Volatile [`StateStore`] for tests and one-off runs.
#[derive(Default)]
pub struct MemoryStore {
    doc: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store, simulating a previous run.
    pub fn with_document(doc: &PersistedDocument) -> Self {
        let store = Self::new();
        *store.doc.borrow_mut() = serde_json::to_string(doc).ok();
        store
    }

    /// Pre-seed the store with raw JSON, simulating an older or partial
    /// document.
    pub fn with_raw(json: &str) -> Self {
        let store = Self::new();
        *store.doc.borrow_mut() = Some(json.to_string());
        store
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<PersistedDocument>> {
        match self.doc.borrow().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, doc: &PersistedDocument) -> Result<()> {
        *self.doc.borrow_mut() = Some(serde_json::to_string(doc)?);
        Ok(())
    }
}
