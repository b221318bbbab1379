//! Schedule state container.
//!
//! # Invariants
//! - `list()` equals the repository contents in insertion order after every
//!   successful mutation.
//! - Derived views are computed from the snapshot, never from storage.

use super::{load_or_default, persist, StoreError, StoreResult, SubscriptionId, Subscribers};
use crate::model::schedule::ScheduleItem;
use crate::repo::schedule_repo::ScheduleRepository;
use crate::view::day_view::DayView;
use chrono::NaiveTime;
use log::warn;

const STORE: &str = "schedule";

pub struct ScheduleStore<R: ScheduleRepository> {
    repo: R,
    items: Vec<ScheduleItem>,
    subscribers: Subscribers<[ScheduleItem]>,
}

impl<R: ScheduleRepository> ScheduleStore<R> {
    /// Loads the persisted schedule. Starts empty when loading fails.
    pub fn load(repo: R) -> Self {
        let loaded = repo.list_items().map(Some);
        let items = load_or_default(STORE, loaded, Vec::new);
        Self {
            repo,
            items,
            subscribers: Subscribers::default(),
        }
    }

    /// Current snapshot in insertion order.
    pub fn list(&self) -> &[ScheduleItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&ScheduleItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn insert(&mut self, item: ScheduleItem) -> StoreResult<()> {
        persist(STORE, "insert", || self.repo.insert_item(&item))?;
        self.items.push(item);
        self.notify();
        Ok(())
    }

    pub fn update(&mut self, item: ScheduleItem) -> StoreResult<()> {
        persist(STORE, "update", || self.repo.update_item(&item))?;
        self.put_in_memory(item);
        self.notify();
        Ok(())
    }

    /// Inserts a new item or overwrites the one with the same id.
    pub fn upsert(&mut self, item: ScheduleItem) -> StoreResult<()> {
        persist(STORE, "upsert", || self.repo.upsert_item(&item))?;
        self.put_in_memory(item);
        self.notify();
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> StoreResult<()> {
        persist(STORE, "remove", || self.repo.delete_item(id))?;
        self.items.retain(|item| item.id != id);
        self.notify();
        Ok(())
    }

    /// Flips completion of one item and returns the new state.
    pub fn toggle_completed(&mut self, id: &str) -> StoreResult<bool> {
        let toggled = self
            .get(id)
            .map(ScheduleItem::toggled)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let completed = toggled.is_completed;
        self.update(toggled)?;
        Ok(completed)
    }

    /// Replaces the whole schedule atomically.
    pub fn replace_all(&mut self, items: Vec<ScheduleItem>) -> StoreResult<()> {
        persist(STORE, "replace_all", || self.repo.replace_all(&items))?;
        self.items = items;
        self.notify();
        Ok(())
    }

    /// Sorted, sectioned view of the snapshot at wall-clock time `now`.
    pub fn day_view(&self, now: NaiveTime) -> DayView {
        DayView::compute(&self.items, now)
    }

    /// Registers a callback invoked with the full snapshot after each change.
    pub fn subscribe(&mut self, callback: impl FnMut(&[ScheduleItem]) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Overwrites the cached item, or rereads storage when the id is not
    /// cached so the item lands at its stored position.
    fn put_in_memory(&mut self, item: ScheduleItem) {
        if let Some(slot) = self.items.iter_mut().find(|existing| existing.id == item.id) {
            *slot = item;
            return;
        }
        match self.repo.list_items() {
            Ok(items) => self.items = items,
            Err(err) => {
                warn!(
                    "event=store_resync module=store store={STORE} status=error error={err}"
                );
                self.items.push(item);
            }
        }
    }

    fn notify(&mut self) {
        self.subscribers.notify(&self.items);
    }
}
