//! Per-game progress records.
//!
//! # Invariants
//! - Game ids are trimmed and non-blank.
//! - Entries for different games are independent; writing one never touches
//!   another.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Saved progress for one mini-game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProgress {
    pub score: u32,
    pub level: u32,
    pub completed: bool,
}

/// Progress keyed by game id, iterated in id order.
pub type GameProgressMap = BTreeMap<String, GameProgress>;

/// Normalizes a caller-supplied game id. Returns `None` for blank input.
pub fn normalize_game_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
