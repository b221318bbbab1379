//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts used by stores.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate records before any SQL mutation.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`) in
//!   addition to transport errors.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::mood::MoodValidationError;
use crate::model::schedule::ScheduleValidationError;
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv_repo;
pub mod mood_repo;
pub mod schedule_repo;
pub mod settings_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error shared by all repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Schedule item failed validation.
    Schedule(ScheduleValidationError),
    /// Mood entry failed validation.
    Mood(MoodValidationError),
    Db(DbError),
    /// No record with this id exists.
    NotFound(String),
    /// A record with this id already exists.
    DuplicateId(String),
    /// Persisted state violates model invariants.
    InvalidData(String),
    /// A key-value namespace could not be (de)serialized.
    Serde(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schedule(err) => write!(f, "{err}"),
            Self::Mood(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::DuplicateId(id) => write!(f, "record id already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Serde(err) => write!(f, "json encoding failed: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schedule(err) => Some(err),
            Self::Mood(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Serde(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateId(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ScheduleValidationError> for RepoError {
    fn from(value: ScheduleValidationError) -> Self {
        Self::Schedule(value)
    }
}

impl From<MoodValidationError> for RepoError {
    fn from(value: MoodValidationError) -> Self {
        Self::Mood(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Rejects connections that were not opened through `db::open_db*`.
fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if version != latest_version() {
        return Err(RepoError::InvalidData(format!(
            "database schema version {version} does not match expected {}",
            latest_version()
        )));
    }
    Ok(())
}

/// Maps a primary-key collision on insert to `DuplicateId`.
fn map_insert_error(err: rusqlite::Error, id: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            RepoError::DuplicateId(id.to_string())
        }
        _ => err.into(),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
