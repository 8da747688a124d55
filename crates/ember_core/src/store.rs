//! State Store
//!
//! Persistence boundary: one serialized record per user identity, keyed by
//! user id. Three backends share the contract: an in-memory map for tests,
//! a JSON file per user with atomic writes, and a SQLite table for
//! deployments that want a durable single-writer record store. Concurrent
//! writers resolve last-writer-wins in every backend.
//!
//! A missing or unreadable record loads as `None`: the engine falls back to
//! zeroed defaults rather than failing the caller.

use crate::error::EngineError;
use crate::state::PersistedState;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Keyed load/save contract for per-user engagement state.
pub trait StateStore {
    /// Load a user's record. `None` when absent or unreadable.
    fn load(&self, user_id: &str) -> Result<Option<PersistedState>, EngineError>;

    /// Save a user's record, replacing any previous one.
    fn save(&self, user_id: &str, state: &PersistedState) -> Result<(), EngineError>;
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn load(&self, user_id: &str) -> Result<Option<PersistedState>, EngineError> {
        (**self).load(user_id)
    }

    fn save(&self, user_id: &str, state: &PersistedState) -> Result<(), EngineError> {
        (**self).save(user_id, state)
    }
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn load(&self, user_id: &str) -> Result<Option<PersistedState>, EngineError> {
        (**self).load(user_id)
    }

    fn save(&self, user_id: &str, state: &PersistedState) -> Result<(), EngineError> {
        (**self).save(user_id, state)
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// HashMap-backed store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, PersistedState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, HashMap<String, PersistedState>> {
        match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl StateStore for MemoryStore {
    fn load(&self, user_id: &str) -> Result<Option<PersistedState>, EngineError> {
        Ok(self.records().get(user_id).cloned())
    }

    fn save(&self, user_id: &str, state: &PersistedState) -> Result<(), EngineError> {
        self.records().insert(user_id.to_string(), state.clone());
        Ok(())
    }
}

// ============================================================================
// JSON file backend
// ============================================================================

/// One pretty-printed JSON file per user under a data directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn user_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", user_id))
    }
}

/// Write atomically via temp file + rename so the record is never partial.
fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)
}

impl StateStore for JsonFileStore {
    fn load(&self, user_id: &str) -> Result<Option<PersistedState>, EngineError> {
        let path = self.user_path(user_id);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(user = user_id, error = %e, "corrupt state record, ignoring");
                Ok(None)
            }
        }
    }

    fn save(&self, user_id: &str, state: &PersistedState) -> Result<(), EngineError> {
        let data = serde_json::to_string_pretty(state)?;
        atomic_write(&self.user_path(user_id), data.as_bytes())?;
        Ok(())
    }
}

// ============================================================================
// SQLite backend
// ============================================================================

/// SQLite-backed record store: one row per user, WAL journaling,
/// `INSERT OR REPLACE` so the last writer wins.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database at `path`.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS engagement_state (
                user_id TEXT PRIMARY KEY,
                updated_at INTEGER NOT NULL,
                payload TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    /// In-memory database, for tests.
    pub fn open_in_memory() -> Result<Self, EngineError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS engagement_state (
                user_id TEXT PRIMARY KEY,
                updated_at INTEGER NOT NULL,
                payload TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn })
    }
}

impl StateStore for SqliteStore {
    fn load(&self, user_id: &str) -> Result<Option<PersistedState>, EngineError> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM engagement_state WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };
        match serde_json::from_str(&payload) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(user = user_id, error = %e, "corrupt state row, ignoring");
                Ok(None)
            }
        }
    }

    fn save(&self, user_id: &str, state: &PersistedState) -> Result<(), EngineError> {
        let payload = serde_json::to_string(state)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO engagement_state (user_id, updated_at, payload)
             VALUES (?1, ?2, ?3)",
            params![user_id, Utc::now().timestamp(), payload],
        )?;
        Ok(())
    }
}
