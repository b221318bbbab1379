//! Per-game progress container.
//!
//! # Invariants
//! - The whole map is rewritten on every change; only the targeted game's
//!   entry differs from the previous snapshot.

use super::{load_or_default, persist, StoreError, StoreResult, SubscriptionId, Subscribers};
use crate::model::game::{normalize_game_id, GameProgress, GameProgressMap};
use crate::repo::kv_repo::{KeyValueRepository, GAME_PROGRESS_KEY};

const STORE: &str = "games";

pub struct GameProgressStore<R: KeyValueRepository> {
    repo: R,
    progress: GameProgressMap,
    subscribers: Subscribers<GameProgressMap>,
}

impl<R: KeyValueRepository> GameProgressStore<R> {
    pub fn load(repo: R) -> Self {
        let loaded = repo.load_json::<GameProgressMap>(GAME_PROGRESS_KEY);
        let progress = load_or_default(STORE, loaded, GameProgressMap::new);
        Self {
            repo,
            progress,
            subscribers: Subscribers::default(),
        }
    }

    pub fn all(&self) -> &GameProgressMap {
        &self.progress
    }

    pub fn get(&self, game_id: &str) -> Option<&GameProgress> {
        self.progress.get(game_id.trim())
    }

    /// Stores `progress` for one game, leaving other games untouched.
    pub fn update_progress(&mut self, game_id: &str, progress: GameProgress) -> StoreResult<()> {
        let game_id = normalize_game_id(game_id)
            .ok_or_else(|| StoreError::InvalidGameId(game_id.to_string()))?;
        let mut next = self.progress.clone();
        next.insert(game_id, progress);
        self.commit("update_progress", next)
    }

    /// Forgets one game's progress. Returns `false` when nothing was stored.
    pub fn reset(&mut self, game_id: &str) -> StoreResult<bool> {
        let key = game_id.trim();
        if !self.progress.contains_key(key) {
            return Ok(false);
        }
        let mut next = self.progress.clone();
        next.remove(key);
        self.commit("reset", next)?;
        Ok(true)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&GameProgressMap) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn commit(&mut self, op: &'static str, next: GameProgressMap) -> StoreResult<()> {
        persist(STORE, op, || self.repo.save_json(GAME_PROGRESS_KEY, &next))?;
        self.progress = next;
        self.subscribers.notify(&self.progress);
        Ok(())
    }
}
