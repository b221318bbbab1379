//! Settings singleton repository.
//!
//! # Invariants
//! - `user_settings` holds at most one row (`id = 1`).
//! - Saves overwrite every column.

use super::{bool_to_int, ensure_schema_ready, int_to_bool, RepoError, RepoResult};
use crate::model::settings::{Theme, UserSettings};
use rusqlite::{params, Connection};

pub trait SettingsRepository {
    /// Returns `None` when settings were never saved.
    fn load_settings(&self) -> RepoResult<Option<UserSettings>>;
    fn save_settings(&self, settings: &UserSettings) -> RepoResult<()>;
}

pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load_settings(&self) -> RepoResult<Option<UserSettings>> {
        let mut stmt = self
            .conn
            .prepare("SELECT theme, notifications_enabled FROM user_settings WHERE id = 1;")?;
        let mut rows = stmt.query([])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let theme_text: String = row.get("theme")?;
        let theme = Theme::parse(&theme_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid theme `{theme_text}` in user_settings.theme"))
        })?;
        let notifications_enabled = int_to_bool(
            row.get("notifications_enabled")?,
            "user_settings.notifications_enabled",
        )?;

        Ok(Some(UserSettings {
            theme,
            notifications_enabled,
        }))
    }

    fn save_settings(&self, settings: &UserSettings) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO user_settings (id, theme, notifications_enabled)
             VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                theme = excluded.theme,
                notifications_enabled = excluded.notifications_enabled;",
            params![
                settings.theme.as_str(),
                bool_to_int(settings.notifications_enabled)
            ],
        )?;
        Ok(())
    }
}
