// src/repositories/preference_repository.rs

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use rusqlite::{params, OptionalExtension};

use crate::db::{create_connection_pool, get_connection, initialize_database, ConnectionPool};
use crate::error::AppResult;

/// Durable key/value storage for serialized preference documents
pub trait PreferenceRepository: Send + Sync {
    fn load(&self, key: &str) -> AppResult<Option<String>>;
    fn save(&self, key: &str, value: &str) -> AppResult<()>;
}

pub struct SqlitePreferenceRepository {
    pool: Arc<ConnectionPool>,
}

impl SqlitePreferenceRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `path` and make sure the schema exists
    pub fn open(path: &Path) -> AppResult<Self> {
        let pool = Arc::new(create_connection_pool(path)?);
        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
        }
        Ok(Self::new(pool))
    }
}

impl PreferenceRepository for SqlitePreferenceRepository {
    fn load(&self, key: &str) -> AppResult<Option<String>> {
        let conn = get_connection(&self.pool)?;

        let value = conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> AppResult<()> {
        let conn = get_connection(&self.pool)?;

        conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value, updated_at)
             VALUES (?1, ?2, datetime('now'))",
            params![key, value],
        )?;

        Ok(())
    }
}

/// Process-local storage; contents vanish with the process
#[derive(Default)]
pub struct InMemoryPreferenceRepository {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryPreferenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceRepository for InMemoryPreferenceRepository {
    fn load(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
