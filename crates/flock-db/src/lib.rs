pub mod error;
pub mod migrations;
pub mod models;
pub mod queries;

pub use error::DbError;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

/// Environment variable naming the SQLite database path.
pub const DB_PATH_ENV: &str = "FLOCK_DB_PATH";

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        Self::init(conn, &path.display().to_string())
    }

    /// In-memory database with the same pragmas and schema as [`Database::open`].
    /// Used by tests, where every case starts from a fresh store.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, ":memory:")
    }

    /// Open the database named by `FLOCK_DB_PATH`, loading `.env` first if
    /// one is present. Falls back to `flock.db` in the working directory.
    pub fn open_from_env() -> Result<Self, DbError> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(DB_PATH_ENV).unwrap_or_else(|_| "flock.db".into());
        Self::open(Path::new(&path))
    }

    fn init(conn: Connection, label: &str) -> Result<Self, DbError> {
        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        // Required for ON DELETE CASCADE on messages and follows
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", label);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        let conn = self.conn.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_from_env_honors_db_path() {
        let path = std::env::temp_dir().join(format!("flock-test-{}.db", std::process::id()));
        unsafe { std::env::set_var(DB_PATH_ENV, &path) };

        let db = Database::open_from_env().unwrap();
        assert_eq!(db.user_count().unwrap(), 0);
        assert!(path.exists());

        drop(db);
        for suffix in ["", "-wal", "-shm"] {
            let mut p = path.clone().into_os_string();
            p.push(suffix);
            let _ = std::fs::remove_file(p);
        }
    }
}
