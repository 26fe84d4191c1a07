// toner-stock-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Toner Collection
// Description: Durable TonerCollection backed by SQLite WAL.
// Purpose: Persist toner documents keyed by identifier.
// Dependencies: toner-stock-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`TonerCollection`] using `SQLite`. Each
//! record is stored as a JSON document in a row keyed by its identifier; the
//! `UNIQUE` constraint on that key is what rejects duplicate inserts. Rows keep
//! an insertion sequence so listings come back in store-native order. Reads
//! check document size, JSON well-formedness, and that the row key matches the
//! document's `id`, and fail closed otherwise. Schema validation of the
//! documents is left to the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use toner_stock_core::StoreError;
use toner_stock_core::TonerCollection;
use toner_stock_core::TonerId;
use toner_stock_core::TonerRecord;
use toner_stock_core::core::record::FIELD_ID;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum stored document size accepted by the store.
pub const MAX_DOCUMENT_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` toner collection.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a config for the given path with default tuning.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored document is not well-formed.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Unique key violation.
    #[error("sqlite store conflict: {0}")]
    Conflict(String),
    /// Document exceeded the size limit.
    #[error("sqlite store document too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual document size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::Conflict(message) => Self::Conflict(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "document exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed toner collection with WAL support.
#[derive(Clone)]
pub struct SqliteTonerCollection {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteTonerCollection {
    /// Opens an `SQLite`-backed toner collection.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

impl TonerCollection for SqliteTonerCollection {
    fn find_all(&self) -> Result<Vec<Value>, StoreError> {
        self.load_all().map_err(StoreError::from)
    }

    fn find_by_id(&self, id: &TonerId) -> Result<Option<Value>, StoreError> {
        self.load_one(id).map_err(StoreError::from)
    }

    fn insert(&self, record: &TonerRecord) -> Result<(), StoreError> {
        self.insert_document(record).map_err(StoreError::from)
    }

    fn update_by_id(&self, id: &TonerId, record: &TonerRecord) -> Result<u64, StoreError> {
        self.replace_document(id, record).map_err(StoreError::from)
    }
}

impl SqliteTonerCollection {
    /// Loads every stored document in insertion order.
    fn load_all(&self) -> Result<Vec<Value>, SqliteStoreError> {
        let rows = {
            let guard = self
                .connection
                .lock()
                .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
            let mut statement = guard
                .prepare("SELECT id, length(document), document FROM toners ORDER BY seq")
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let rows = statement
                .query_map(params![], |row| {
                    let id: String = row.get(0)?;
                    let length: i64 = row.get(1)?;
                    let bytes: Vec<u8> = row.get(2)?;
                    Ok((id, length, bytes))
                })
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            drop(statement);
            drop(guard);
            rows
        };
        rows.into_iter()
            .map(|(id, length, bytes)| {
                check_document_length(&id, length)?;
                decode_document(&id, &bytes)
            })
            .collect()
    }

    /// Loads the document stored under the identifier.
    fn load_one(&self, id: &TonerId) -> Result<Option<Value>, SqliteStoreError> {
        let row = {
            let guard = self
                .connection
                .lock()
                .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
            let length: Option<i64> = guard
                .query_row(
                    "SELECT length(document) FROM toners WHERE id = ?1",
                    params![id.as_str()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let row = match length {
                None => None,
                Some(length) => {
                    check_document_length(id.as_str(), length)?;
                    let bytes: Vec<u8> = guard
                        .query_row(
                            "SELECT document FROM toners WHERE id = ?1",
                            params![id.as_str()],
                            |row| row.get(0),
                        )
                        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
                    Some(bytes)
                }
            };
            drop(guard);
            row
        };
        row.map(|bytes| decode_document(id.as_str(), &bytes)).transpose()
    }

    /// Inserts a new document row.
    fn insert_document(&self, record: &TonerRecord) -> Result<(), SqliteStoreError> {
        let bytes = encode_document(record)?;
        let saved_at = unix_millis();
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        guard
            .execute(
                "INSERT INTO toners (id, document, updated_at) VALUES (?1, ?2, ?3)",
                params![record.id.as_str(), bytes, saved_at],
            )
            .map_err(|err| map_write_error(&record.id, &err))?;
        drop(guard);
        Ok(())
    }

    /// Replaces the document stored under the identifier.
    fn replace_document(
        &self,
        id: &TonerId,
        record: &TonerRecord,
    ) -> Result<u64, SqliteStoreError> {
        let bytes = encode_document(record)?;
        let saved_at = unix_millis();
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let affected = guard
            .execute(
                "UPDATE toners SET id = ?1, document = ?2, updated_at = ?3 WHERE id = ?4",
                params![record.id.as_str(), bytes, saved_at, id.as_str()],
            )
            .map_err(|err| map_write_error(&record.id, &err))?;
        drop(guard);
        u64::try_from(affected)
            .map_err(|_| SqliteStoreError::Invalid("affected row count overflow".to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS toners (
                    seq INTEGER PRIMARY KEY AUTOINCREMENT,
                    id TEXT NOT NULL UNIQUE,
                    document BLOB NOT NULL,
                    updated_at INTEGER NOT NULL
                );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Serializes a record into document bytes, enforcing the size limit.
fn encode_document(record: &TonerRecord) -> Result<Vec<u8>, SqliteStoreError> {
    let bytes =
        serde_json::to_vec(record).map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
    if bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_DOCUMENT_BYTES,
            actual_bytes: bytes.len(),
        });
    }
    Ok(bytes)
}

/// Rejects stored documents whose length is negative or over the limit.
fn check_document_length(id: &str, length: i64) -> Result<(), SqliteStoreError> {
    let length = usize::try_from(length).map_err(|_| {
        SqliteStoreError::Invalid(format!("negative document length for toner {id}"))
    })?;
    if length > MAX_DOCUMENT_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_DOCUMENT_BYTES,
            actual_bytes: length,
        });
    }
    Ok(())
}

/// Parses stored bytes and checks the row key against the document `id`.
fn decode_document(id: &str, bytes: &[u8]) -> Result<Value, SqliteStoreError> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|err| SqliteStoreError::Corrupt(format!("toner {id}: {err}")))?;
    if document.get(FIELD_ID).and_then(Value::as_str) != Some(id) {
        return Err(SqliteStoreError::Corrupt(format!(
            "toner {id}: id mismatch between key and document"
        )));
    }
    Ok(document)
}

/// Maps write failures, turning unique-key violations into conflicts.
fn map_write_error(id: &TonerId, err: &rusqlite::Error) -> SqliteStoreError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => {
            SqliteStoreError::Conflict(format!("duplicate toner id {id}"))
        }
        _ => SqliteStoreError::Db(err.to_string()),
    }
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
