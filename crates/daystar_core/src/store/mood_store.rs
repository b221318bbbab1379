//! Mood journal state container.

use super::{load_or_default, persist, StoreResult, SubscriptionId, Subscribers};
use crate::model::mood::MoodEntry;
use log::warn;
use crate::repo::mood_repo::MoodRepository;

const STORE: &str = "mood";

pub struct MoodStore<R: MoodRepository> {
    repo: R,
    entries: Vec<MoodEntry>,
    subscribers: Subscribers<[MoodEntry]>,
}

impl<R: MoodRepository> MoodStore<R> {
    pub fn load(repo: R) -> Self {
        let loaded = repo.list_entries().map(Some);
        let entries = load_or_default(STORE, loaded, Vec::new);
        Self {
            repo,
            entries,
            subscribers: Subscribers::default(),
        }
    }

    /// Entries in recording order.
    pub fn list(&self) -> &[MoodEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&MoodEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Most recently added entry.
    pub fn latest(&self) -> Option<&MoodEntry> {
        self.entries.last()
    }

    pub fn insert(&mut self, entry: MoodEntry) -> StoreResult<()> {
        persist(STORE, "insert", || self.repo.insert_entry(&entry))?;
        self.entries.push(entry);
        self.notify();
        Ok(())
    }

    pub fn update(&mut self, entry: MoodEntry) -> StoreResult<()> {
        persist(STORE, "update", || self.repo.update_entry(&entry))?;
        match self.entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(slot) => *slot = entry,
            None => match self.repo.list_entries() {
                Ok(entries) => self.entries = entries,
                Err(err) => {
                    warn!("event=store_resync module=store store={STORE} status=error error={err}");
                    self.entries.push(entry);
                }
            },
        }
        self.notify();
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> StoreResult<()> {
        persist(STORE, "remove", || self.repo.delete_entry(id))?;
        self.entries.retain(|entry| entry.id != id);
        self.notify();
        Ok(())
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&[MoodEntry]) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn notify(&mut self) {
        self.subscribers.notify(&self.entries);
    }
}
