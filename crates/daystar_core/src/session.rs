//! Session root: owns the database connection and hands out stores.
//!
//! # Responsibility
//! - Bootstrap logging and storage from `AppConfig`.
//! - Build every store against the one shared connection.
//!
//! # Invariants
//! - Stores borrow the session; they cannot outlive its connection.
//! - Stores are handed out once per session, so there is exactly one
//!   write-through cache per namespace.
//! - A session is only returned after migrations succeeded.

use crate::config::AppConfig;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::logging::init_logging;
use crate::repo::kv_repo::SqliteKeyValueRepository;
use crate::repo::mood_repo::SqliteMoodRepository;
use crate::repo::schedule_repo::SqliteScheduleRepository;
use crate::repo::settings_repo::SqliteSettingsRepository;
use crate::repo::RepoError;
use crate::store::game_store::GameProgressStore;
use crate::store::mood_store::MoodStore;
use crate::store::schedule_store::ScheduleStore;
use crate::store::settings_store::SettingsStore;
use crate::store::token_store::TokenStore;
use log::info;
use rusqlite::Connection;
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum SessionError {
    Io(std::io::Error),
    Logging(String),
    Db(DbError),
    Repo(RepoError),
    /// `stores()` was already called on this session.
    StoresAlreadyIssued,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to prepare data directory: {err}"),
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::StoresAlreadyIssued => write!(f, "stores were already issued for this session"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Logging(_) | Self::StoresAlreadyIssued => None,
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for SessionError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for SessionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Every store of one session, borrowing the session connection.
pub struct AppStores<'conn> {
    pub schedule: ScheduleStore<SqliteScheduleRepository<'conn>>,
    pub moods: MoodStore<SqliteMoodRepository<'conn>>,
    pub settings: SettingsStore<SqliteSettingsRepository<'conn>>,
    pub tokens: TokenStore<SqliteKeyValueRepository<'conn>>,
    pub games: GameProgressStore<SqliteKeyValueRepository<'conn>>,
}

pub struct Session {
    conn: Connection,
    stores_issued: Cell<bool>,
}

impl Session {
    /// Initializes logging, then opens the database described by `config`.
    ///
    /// Logging is process-wide: a second call must use the same level and
    /// log directory.
    pub fn bootstrap(config: &AppConfig) -> Result<Self, SessionError> {
        let log_dir = config.log_dir();
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| SessionError::Logging("log directory is not valid UTF-8".to_string()))?;
        init_logging(&config.log_level, log_dir).map_err(SessionError::Logging)?;
        Self::open(config)
    }

    /// Opens the database described by `config` without touching logging.
    pub fn open(config: &AppConfig) -> Result<Self, SessionError> {
        std::fs::create_dir_all(&config.data_dir)?;
        let conn = open_db(config.db_path())?;
        info!("event=session_open module=session status=ok mode=file");
        Ok(Self::from_connection(conn))
    }

    /// Opens a throwaway session backed by an in-memory database.
    pub fn open_in_memory() -> Result<Self, SessionError> {
        let conn = open_db_in_memory()?;
        info!("event=session_open module=session status=ok mode=memory");
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            stores_issued: Cell::new(false),
        }
    }

    /// Loads every store from storage.
    ///
    /// Succeeds once per session; later calls fail with
    /// `StoresAlreadyIssued`.
    pub fn stores(&self) -> Result<AppStores<'_>, SessionError> {
        if self.stores_issued.get() {
            return Err(SessionError::StoresAlreadyIssued);
        }
        let conn = &self.conn;
        let stores = AppStores {
            schedule: ScheduleStore::load(SqliteScheduleRepository::try_new(conn)?),
            moods: MoodStore::load(SqliteMoodRepository::try_new(conn)?),
            settings: SettingsStore::load(SqliteSettingsRepository::try_new(conn)?),
            tokens: TokenStore::load(SqliteKeyValueRepository::try_new(conn)?),
            games: GameProgressStore::load(SqliteKeyValueRepository::try_new(conn)?),
        };
        self.stores_issued.set(true);
        Ok(stores)
    }
}
