//! DuckDB-backed record store.

use crate::error::{StorageError, StorageResult};
use crate::record::{RecordStore, StorageRecord};
use duckdb::{Connection, params};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

const MEMORY_LIMIT: &str = "128MB";
const THREADS: u32 = 1;

/// Persists records in a single `records` table.
///
/// Ids come from the `record_ids` sequence as the column default, and each
/// append is one `INSERT … RETURNING id` under the connection mutex, so
/// appends are serialized and each row lands whole.
#[derive(Clone)]
pub struct DuckDbRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbRecordStore {
    /// Opens or creates a record store at the given path.
    ///
    /// Fails if another process holds the database. A write-ahead log that
    /// DuckDB cannot replay is moved aside (never deleted) and the open is
    /// retried once.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = open_with_wal_recovery(path)?;
        apply_resource_limits(&conn)?;
        initialize_record_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory record store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_record_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Location of the write-ahead log DuckDB keeps next to `path`.
    pub fn wal_path(path: &Path) -> PathBuf {
        let mut wal = OsString::from(path.as_os_str());
        wal.push(".wal");
        PathBuf::from(wal)
    }

    /// Acquire the connection lock, recovering from poison left by a panic
    /// in another request.
    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("DuckDbRecordStore recovering from poisoned mutex");
            poisoned.into_inner()
        })
    }

    /// Flush the WAL into the main database file.
    pub fn checkpoint(&self) -> StorageResult<()> {
        self.lock_conn().execute_batch("CHECKPOINT")?;
        Ok(())
    }
}

impl RecordStore for DuckDbRecordStore {
    fn append(&self, storage_blob: &str, blind_index: &str) -> StorageResult<u64> {
        let conn = self.lock_conn();
        let id: i64 = conn.query_row(
            "INSERT INTO records (storage_blob, blind_index) VALUES (?, ?) RETURNING id",
            params![storage_blob, blind_index],
            |row| row.get(0),
        )?;
        to_record_id(id)
    }

    fn scan_equal(&self, blind_index: &str) -> StorageResult<Vec<StorageRecord>> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare(
            "SELECT id, storage_blob, blind_index FROM records WHERE blind_index = ? ORDER BY id",
        )?;

        let rows = stmt
            .query_map(params![blind_index], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, storage_blob, blind_index)| {
                Ok(StorageRecord {
                    id: to_record_id(id)?,
                    storage_blob,
                    blind_index,
                })
            })
            .collect()
    }

    fn len(&self) -> StorageResult<usize> {
        let conn = self.lock_conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|_| StorageError::OutOfRange(count))
    }
}

fn open_with_wal_recovery(path: &Path) -> StorageResult<Connection> {
    let first_err = match Connection::open(path) {
        Ok(conn) => return Ok(conn),
        Err(err) => err,
    };

    let wal = DuckDbRecordStore::wal_path(path);
    if !is_wal_replay_failure(&first_err.to_string()) || !wal.exists() {
        return Err(first_err.into());
    }

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let mut aside = OsString::from(wal.as_os_str());
    aside.push(format!(".corrupt-{stamp}"));
    let aside = PathBuf::from(aside);

    tracing::warn!(
        error = %first_err,
        "DuckDB could not replay its WAL, moving {} to {} and retrying",
        wal.display(),
        aside.display()
    );
    std::fs::rename(&wal, &aside)?;

    Ok(Connection::open(path)?)
}

/// Whether an open error came from replaying the WAL. Lock conflicts mean
/// another process owns the WAL and must never count.
pub(crate) fn is_wal_replay_failure(message: &str) -> bool {
    !message.contains("Could not set lock") && message.contains("replaying WAL")
}

fn apply_resource_limits(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(&format!(
        "PRAGMA memory_limit='{MEMORY_LIMIT}'; PRAGMA threads={THREADS};"
    ))?;
    Ok(())
}

fn to_record_id(id: i64) -> StorageResult<u64> {
    u64::try_from(id).map_err(|_| StorageError::OutOfRange(id))
}

fn initialize_record_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        r#"
        CREATE SEQUENCE IF NOT EXISTS record_ids START 1;
        CREATE TABLE IF NOT EXISTS records (
            id BIGINT PRIMARY KEY DEFAULT nextval('record_ids'),
            storage_blob VARCHAR NOT NULL,
            blind_index VARCHAR NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_records_blind_index ON records(blind_index);
        "#,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_conflicts_are_not_wal_failures() {
        let msg = "IO Error: Could not set lock on file \"records.duckdb\": Conflicting lock \
                   is held in /usr/bin/securebridge-server (PID 5396)";
        assert!(!is_wal_replay_failure(msg));
    }

    #[test]
    fn replay_errors_are_wal_failures() {
        let msg = "IO Error: Failure while replaying WAL file \"records.duckdb.wal\": \
                   unexpected end of file";
        assert!(is_wal_replay_failure(msg));
    }

    #[test]
    fn wal_path_appends_suffix() {
        assert_eq!(
            DuckDbRecordStore::wal_path(Path::new("/data/records.duckdb")),
            PathBuf::from("/data/records.duckdb.wal")
        );
        assert_eq!(
            DuckDbRecordStore::wal_path(Path::new("records")),
            PathBuf::from("records.wal")
        );
    }
}
