//! Schedule item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD plus bulk replacement over `schedule_items`.
//! - Preserve insertion order through the `position` column.
//!
//! # Invariants
//! - `list_items` returns rows in insertion order (`position ASC`).
//! - `replace_all` is atomic: either every row is swapped or none is.
//! - `upsert_item` keeps the original position of an existing id.
//! - Rows with an unparsable `time` are still listed so the snapshot matches
//!   storage; derived views skip them.

use super::{
    bool_to_int, ensure_schema_ready, int_to_bool, map_insert_error, RepoError, RepoResult,
};
use crate::model::schedule::{ScheduleItem, ScheduleValidationError};
use log::warn;
use rusqlite::{params, Connection, Row};
use std::collections::HashSet;

const SCHEDULE_SELECT_SQL: &str = "SELECT
    id,
    time,
    activity,
    icon,
    color,
    is_completed
FROM schedule_items";

const NEXT_POSITION_SQL: &str = "(SELECT COALESCE(MAX(position), -1) + 1 FROM schedule_items)";

/// Repository interface for schedule items.
pub trait ScheduleRepository {
    fn list_items(&self) -> RepoResult<Vec<ScheduleItem>>;
    /// Appends one item. Fails with `DuplicateId` when the id exists.
    fn insert_item(&self, item: &ScheduleItem) -> RepoResult<()>;
    /// Overwrites one item. Fails with `NotFound` when the id is missing.
    fn update_item(&self, item: &ScheduleItem) -> RepoResult<()>;
    /// Inserts or overwrites one item.
    fn upsert_item(&self, item: &ScheduleItem) -> RepoResult<()>;
    /// Deletes one item. Fails with `NotFound` when the id is missing.
    fn delete_item(&self, id: &str) -> RepoResult<()>;
    /// Replaces the whole schedule in one transaction.
    fn replace_all(&self, items: &[ScheduleItem]) -> RepoResult<()>;
}

/// SQLite-backed schedule repository.
pub struct SqliteScheduleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteScheduleRepository<'conn> {
    /// Binds the repository to a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ScheduleRepository for SqliteScheduleRepository<'_> {
    fn list_items(&self) -> RepoResult<Vec<ScheduleItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SCHEDULE_SELECT_SQL} ORDER BY position ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_schedule_row(row)?);
        }
        Ok(items)
    }

    fn insert_item(&self, item: &ScheduleItem) -> RepoResult<()> {
        item.validate()?;

        self.conn
            .execute(
                &format!(
                    "INSERT INTO schedule_items (
                        id,
                        position,
                        time,
                        activity,
                        icon,
                        color,
                        is_completed
                    ) VALUES (?1, {NEXT_POSITION_SQL}, ?2, ?3, ?4, ?5, ?6);"
                ),
                params![
                    item.id.as_str(),
                    item.time.as_str(),
                    item.activity.as_str(),
                    item.icon.as_deref(),
                    item.color.as_deref(),
                    bool_to_int(item.is_completed),
                ],
            )
            .map_err(|err| map_insert_error(err, &item.id))?;

        Ok(())
    }

    fn update_item(&self, item: &ScheduleItem) -> RepoResult<()> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE schedule_items
             SET
                time = ?1,
                activity = ?2,
                icon = ?3,
                color = ?4,
                is_completed = ?5
             WHERE id = ?6;",
            params![
                item.time.as_str(),
                item.activity.as_str(),
                item.icon.as_deref(),
                item.color.as_deref(),
                bool_to_int(item.is_completed),
                item.id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item.id.clone()));
        }
        Ok(())
    }

    fn upsert_item(&self, item: &ScheduleItem) -> RepoResult<()> {
        item.validate()?;

        self.conn.execute(
            &format!(
                "INSERT INTO schedule_items (
                    id,
                    position,
                    time,
                    activity,
                    icon,
                    color,
                    is_completed
                ) VALUES (?1, {NEXT_POSITION_SQL}, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(id) DO UPDATE SET
                    time = excluded.time,
                    activity = excluded.activity,
                    icon = excluded.icon,
                    color = excluded.color,
                    is_completed = excluded.is_completed;"
            ),
            params![
                item.id.as_str(),
                item.time.as_str(),
                item.activity.as_str(),
                item.icon.as_deref(),
                item.color.as_deref(),
                bool_to_int(item.is_completed),
            ],
        )?;
        Ok(())
    }

    fn delete_item(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM schedule_items WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn replace_all(&self, items: &[ScheduleItem]) -> RepoResult<()> {
        let mut seen = HashSet::new();
        for item in items {
            item.validate()?;
            if !seen.insert(item.id.as_str()) {
                return Err(RepoError::DuplicateId(item.id.clone()));
            }
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM schedule_items;", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO schedule_items (
                    id,
                    position,
                    time,
                    activity,
                    icon,
                    color,
                    is_completed
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            )?;
            for (position, item) in items.iter().enumerate() {
                stmt.execute(params![
                    item.id.as_str(),
                    position as i64,
                    item.time.as_str(),
                    item.activity.as_str(),
                    item.icon.as_deref(),
                    item.color.as_deref(),
                    bool_to_int(item.is_completed),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn parse_schedule_row(row: &Row<'_>) -> RepoResult<ScheduleItem> {
    let item = ScheduleItem {
        id: row.get("id")?,
        time: row.get("time")?,
        activity: row.get("activity")?,
        icon: row.get("icon")?,
        color: row.get("color")?,
        is_completed: int_to_bool(row.get("is_completed")?, "schedule_items.is_completed")?,
    };
    match item.validate() {
        Ok(()) => Ok(item),
        Err(ScheduleValidationError::InvalidTime(_)) => {
            warn!(
                "event=schedule_row_read module=repo status=degraded reason=invalid_time id={}",
                item.id
            );
            Ok(item)
        }
        Err(err) => Err(RepoError::InvalidData(format!(
            "schedule_items row `{}`: {err}",
            item.id
        ))),
    }
}
