//! Domain model for the daily routine core.
//!
//! # Responsibility
//! - Define the records persisted by repositories and cached by stores.
//! - Own per-record validation so every write path shares one rule set.
//!
//! # Invariants
//! - Every schedule item and mood entry is identified by a stable string id.
//! - Settings, token balance and game progress are singletons per database.

pub mod game;
pub mod mood;
pub mod schedule;
pub mod settings;
