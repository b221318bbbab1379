//! Local-first core for a family daily-routine app.
//!
//! Owns persistence (SQLite), write-through stores with change
//! notification, and the derived daily schedule view. Presentation lives
//! outside this crate.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod session;
pub mod store;
pub mod view;

pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::game::{GameProgress, GameProgressMap};
pub use model::mood::{MoodEntry, MoodKind, MoodValidationError};
pub use model::schedule::{parse_time_of_day, ScheduleItem, ScheduleValidationError};
pub use model::settings::{SettingsPatch, Theme, UserSettings};
pub use repo::kv_repo::{KeyValueRepository, SqliteKeyValueRepository};
pub use repo::mood_repo::{MoodRepository, SqliteMoodRepository};
pub use repo::schedule_repo::{ScheduleRepository, SqliteScheduleRepository};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use repo::{RepoError, RepoResult};
pub use session::{AppStores, Session, SessionError};
pub use store::game_store::GameProgressStore;
pub use store::mood_store::MoodStore;
pub use store::schedule_store::ScheduleStore;
pub use store::settings_store::SettingsStore;
pub use store::token_store::TokenStore;
pub use store::{StoreError, StoreResult, SubscriptionId};
pub use view::day_view::{DaySection, DayView, SectionGroup};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
