use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::{CartError, Result};
use crate::storage::Storage;

pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    #[cfg(feature = "app")]
    pub fn new(app_handle: &tauri::AppHandle, config: &crate::config::CartConfig) -> Result<Self> {
        use tauri::Manager;

        let app_dir = app_handle
            .path()
            .app_data_dir()
            .map_err(|e| CartError::Storage(e.to_string()))?;

        std::fs::create_dir_all(&app_dir)?;

        Self::open(app_dir.join(&config.database_file))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub fn initialize(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            "
            -- Local storage entries (cart, last order)
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            ",
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| CartError::Storage(e.to_string()))
    }
}

impl Storage for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(feature = "app")]
pub trait DatabaseExt {
    fn db(&self) -> &Database;
}

#[cfg(feature = "app")]
impl DatabaseExt for tauri::AppHandle {
    fn db(&self) -> &Database {
        use tauri::Manager;
        self.state::<Database>().inner()
    }
}
