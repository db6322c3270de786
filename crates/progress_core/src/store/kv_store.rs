//! Key-value store contract and SQLite implementation.

use crate::db::DbError;
use log::{debug, error, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of the underlying medium or of JSON (de)serialization.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialize { key: String, source: serde_json::Error },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize { key, source } => {
                write!(f, "failed to serialize value for key `{key}`: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw string key-value storage.
///
/// Typed access goes through `load_or` and `save`, which swallow failures
/// after logging them.
pub trait KeyValueStore {
    fn read_raw(&self, key: &str) -> StoreResult<Option<String>>;
    fn write_raw(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Returns whether an entry was removed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Loads and deserializes the value under `key`.
    ///
    /// Returns `default` when the entry is missing, the read fails, or the
    /// stored JSON does not deserialize into `T`.
    fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T
    where
        Self: Sized,
    {
        let raw = match self.read_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("event=store_load module=store status=miss key={key}");
                return default;
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error error_code=read_failed key={key} error={err}"
                );
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(
                    "event=store_load module=store status=ok key={key} bytes={}",
                    raw.len()
                );
                value
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error error_code=decode_failed key={key} error={err}"
                );
                default
            }
        }
    }

    /// Serializes and writes `value` under `key`.
    ///
    /// Returns `false` when the write did not happen. In-memory state may
    /// then diverge from durable state until the next successful save.
    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool
    where
        Self: Sized,
    {
        let result = serde_json::to_string(value)
            .map_err(|source| StoreError::Serialize {
                key: key.to_string(),
                source,
            })
            .and_then(|raw| self.write_raw(key, &raw).map(|()| raw.len()));

        match result {
            Ok(bytes) => {
                debug!("event=store_save module=store status=ok key={key} bytes={bytes}");
                true
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error error_code=write_failed key={key} error={err}"
                );
                false
            }
        }
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKvStore<'_> {
    fn read_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}
