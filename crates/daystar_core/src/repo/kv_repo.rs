//! Whole-value JSON namespaces stored in `kv_entries`.
//!
//! # Responsibility
//! - Persist small singleton values (token balance, game progress) as JSON
//!   text under a fixed key.
//!
//! # Invariants
//! - `put_raw` overwrites the full value; there is no partial update.
//! - Values are stored exactly as serialized by `serde_json`.

use super::{ensure_schema_ready, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key of the reward token balance.
pub const REWARD_TOKENS_KEY: &str = "reward_tokens";
/// Key of the per-game progress map.
pub const GAME_PROGRESS_KEY: &str = "game_progress";

pub trait KeyValueRepository {
    fn get_raw(&self, key: &str) -> RepoResult<Option<String>>;
    fn put_raw(&self, key: &str, value: &str) -> RepoResult<()>;
    fn remove(&self, key: &str) -> RepoResult<bool>;

    /// Loads and decodes a JSON value. `Ok(None)` when the key is absent.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> RepoResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get_raw(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encodes and overwrites a JSON value.
    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> RepoResult<()>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.put_raw(key, &raw)
    }
}

pub struct SqliteKeyValueRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl KeyValueRepository for SqliteKeyValueRepository<'_> {
    fn get_raw(&self, key: &str) -> RepoResult<Option<String>> {
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

    fn put_raw(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}
