//! SQLite implementation of the signing-info store.
//!
//! Persistent backend for slashing bookkeeping, using rusqlite with bundled
//! SQLite.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use genesis_export_core::{ConsAddress, ExportContext, SigningInfo};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{SigningInfoCursor, SigningInfoStore};

/// SQLite-based signing-info store.
///
/// Thread-safe via internal Mutex.
pub struct SqliteSigningInfoStore {
    conn: Mutex<Connection>,
}

impl SqliteSigningInfoStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::LockPoisoned(format!("sqlite connection: {}", e)))
    }

    /// Number of stored signing infos.
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM signing_infos", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

// Helper to convert a row to SigningInfo
fn row_to_signing_info(row: &rusqlite::Row<'_>) -> rusqlite::Result<SigningInfo> {
    let address: Vec<u8> = row.get("address")?;
    Ok(SigningInfo {
        address: ConsAddress::from_bytes(address),
        start_height: row.get("start_height")?,
        index_offset: row.get("index_offset")?,
        jailed_until_ms: row.get("jailed_until_ms")?,
        tombstoned: row.get("tombstoned")?,
        missed_blocks_counter: row.get("missed_blocks_counter")?,
    })
}

impl SigningInfoStore for SqliteSigningInfoStore {
    fn signing_info_cursor(&self, _ctx: &ExportContext) -> Result<SigningInfoCursor> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT address, start_height, index_offset, jailed_until_ms, tombstoned, missed_blocks_counter
             FROM signing_infos ORDER BY address",
        )?;

        let records = stmt
            .query_map([], row_to_signing_info)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(SigningInfoCursor::new(records))
    }

    fn get_signing_info(
        &self,
        _ctx: &ExportContext,
        address: &ConsAddress,
    ) -> Result<Option<SigningInfo>> {
        let conn = self.conn()?;
        let info = conn
            .query_row(
                "SELECT address, start_height, index_offset, jailed_until_ms, tombstoned, missed_blocks_counter
                 FROM signing_infos WHERE address = ?1",
                params![address.as_bytes()],
                row_to_signing_info,
            )
            .optional()?;
        Ok(info)
    }

    fn set_signing_info(
        &self,
        _ctx: &ExportContext,
        address: &ConsAddress,
        info: &SigningInfo,
    ) -> Result<()> {
        if &info.address != address {
            return Err(StoreError::InvalidData(format!(
                "signing info for {} stored under {}",
                info.address, address
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO signing_infos (
                address, start_height, index_offset, jailed_until_ms,
                tombstoned, missed_blocks_counter, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(address) DO UPDATE SET
                start_height = excluded.start_height,
                index_offset = excluded.index_offset,
                jailed_until_ms = excluded.jailed_until_ms,
                tombstoned = excluded.tombstoned,
                missed_blocks_counter = excluded.missed_blocks_counter,
                updated_at = excluded.updated_at",
            params![
                address.as_bytes(),
                info.start_height,
                info.index_offset,
                info.jailed_until_ms,
                info.tombstoned,
                info.missed_blocks_counter,
                migration::now_millis(),
            ],
        )?;

        Ok(())
    }
}
