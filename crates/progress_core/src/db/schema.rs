//! Schema setup for the key-value table.
//!
//! The store needs a single table, so there is one schema version rather
//! than a migration chain. `PRAGMA user_version` is 0 for a fresh file and
//! `SCHEMA_VERSION` once the table exists.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;

const KV_SCHEMA: &str = include_str!("kv_schema.sql");

/// Creates the key-value table on a fresh database and checks the version
/// of an existing one.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    match found {
        SCHEMA_VERSION => Ok(()),
        0 => {
            let tx = conn.transaction()?;
            tx.execute_batch(KV_SCHEMA)?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tx.commit()?;
            info!("event=db_schema module=db status=created version={SCHEMA_VERSION}");
            Ok(())
        }
        other => Err(DbError::UnsupportedSchemaVersion {
            db_version: other,
            latest_supported: SCHEMA_VERSION,
        }),
    }
}
