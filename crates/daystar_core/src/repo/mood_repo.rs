//! Mood entry repository contract and SQLite implementation.
//!
//! # Invariants
//! - Entries are listed in recording order (`position ASC`).
//! - Edits keep an entry's position.

use super::{ensure_schema_ready, map_insert_error, RepoError, RepoResult};
use crate::model::mood::MoodEntry;
use rusqlite::{params, Connection, Row};

/// Repository interface for mood entries.
pub trait MoodRepository {
    fn list_entries(&self) -> RepoResult<Vec<MoodEntry>>;
    fn insert_entry(&self, entry: &MoodEntry) -> RepoResult<()>;
    fn update_entry(&self, entry: &MoodEntry) -> RepoResult<()>;
    fn delete_entry(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed mood repository.
pub struct SqliteMoodRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMoodRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MoodRepository for SqliteMoodRepository<'_> {
    fn list_entries(&self) -> RepoResult<Vec<MoodEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, mood, timestamp, notes
             FROM mood_entries
             ORDER BY position ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_mood_row(row)?);
        }
        Ok(entries)
    }

    fn insert_entry(&self, entry: &MoodEntry) -> RepoResult<()> {
        entry.validate()?;

        self.conn
            .execute(
                "INSERT INTO mood_entries (id, position, mood, timestamp, notes)
                 VALUES (
                    ?1,
                    (SELECT COALESCE(MAX(position), -1) + 1 FROM mood_entries),
                    ?2,
                    ?3,
                    ?4
                 );",
                params![
                    entry.id.as_str(),
                    entry.mood,
                    entry.timestamp.as_str(),
                    entry.notes.as_deref(),
                ],
            )
            .map_err(|err| map_insert_error(err, &entry.id))?;
        Ok(())
    }

    fn update_entry(&self, entry: &MoodEntry) -> RepoResult<()> {
        entry.validate()?;

        let changed = self.conn.execute(
            "UPDATE mood_entries
             SET mood = ?1, timestamp = ?2, notes = ?3
             WHERE id = ?4;",
            params![
                entry.mood,
                entry.timestamp.as_str(),
                entry.notes.as_deref(),
                entry.id.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(entry.id.clone()));
        }
        Ok(())
    }

    fn delete_entry(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM mood_entries WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn parse_mood_row(row: &Row<'_>) -> RepoResult<MoodEntry> {
    let entry = MoodEntry {
        id: row.get("id")?,
        mood: row.get("mood")?,
        timestamp: row.get("timestamp")?,
        notes: row.get("notes")?,
    };
    entry
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("mood_entries row `{}`: {err}", entry.id)))?;
    Ok(entry)
}
