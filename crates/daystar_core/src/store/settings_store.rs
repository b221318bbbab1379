//! Settings state container.
//!
//! Every change rewrites the full settings row, including partial updates.

use super::{load_or_default, persist, StoreResult, SubscriptionId, Subscribers};
use crate::model::settings::{SettingsPatch, UserSettings};
use crate::repo::settings_repo::SettingsRepository;

const STORE: &str = "settings";

pub struct SettingsStore<R: SettingsRepository> {
    repo: R,
    settings: UserSettings,
    subscribers: Subscribers<UserSettings>,
}

impl<R: SettingsRepository> SettingsStore<R> {
    pub fn load(repo: R) -> Self {
        let loaded = repo.load_settings();
        let settings = load_or_default(STORE, loaded, UserSettings::default);
        Self {
            repo,
            settings,
            subscribers: Subscribers::default(),
        }
    }

    pub fn get(&self) -> &UserSettings {
        &self.settings
    }

    /// Overwrites all settings.
    pub fn replace(&mut self, settings: UserSettings) -> StoreResult<()> {
        persist(STORE, "replace", || self.repo.save_settings(&settings))?;
        self.settings = settings;
        self.subscribers.notify(&self.settings);
        Ok(())
    }

    /// Merges `patch` into the current settings and saves the result.
    pub fn update(&mut self, patch: SettingsPatch) -> StoreResult<&UserSettings> {
        let merged = self.settings.merged(&patch);
        self.replace(merged)?;
        Ok(&self.settings)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&UserSettings) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}
