//! Write-through state containers with change notification.
//!
//! # Responsibility
//! - Keep an in-memory snapshot of each persisted namespace for rendering.
//! - Apply every mutation in two phases: persist first, then update memory
//!   and notify subscribers.
//!
//! # Invariants
//! - A failed write leaves the snapshot unchanged and notifies no one.
//! - Load failures never propagate: the store starts from its default value
//!   and the failure is logged.
//! - Subscribers are called in subscription order with the new snapshot.

use crate::repo::RepoError;
use log::{debug, error, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod game_store;
pub mod mood_store;
pub mod schedule_store;
pub mod settings_store;
pub mod token_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Handle returned by `subscribe`, used to unsubscribe on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Errors surfaced by store mutations.
#[derive(Debug)]
pub enum StoreError {
    /// Target record does not exist.
    NotFound(String),
    /// Game id is blank after trim.
    InvalidGameId(String),
    /// Persistence failure; the snapshot was not changed.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidGameId(value) => write!(f, "invalid game id: `{value}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Ordered registry of change callbacks for one store.
pub struct Subscribers<T: ?Sized> {
    next_id: u64,
    callbacks: BTreeMap<SubscriptionId, Box<dyn FnMut(&T)>>,
}

impl<T: ?Sized> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            callbacks: BTreeMap::new(),
        }
    }
}

impl<T: ?Sized> Subscribers<T> {
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.insert(id, Box::new(callback));
        id
    }

    /// Returns `false` when the id was never issued or already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.callbacks.remove(&id).is_some()
    }

    pub fn notify(&mut self, snapshot: &T) {
        for callback in self.callbacks.values_mut() {
            callback(snapshot);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

/// Runs one persistence call and logs its outcome.
fn persist<T>(
    store: &'static str,
    op: &'static str,
    write: impl FnOnce() -> Result<T, RepoError>,
) -> StoreResult<T> {
    match write() {
        Ok(value) => {
            debug!("event=store_write module=store store={store} op={op} status=ok");
            Ok(value)
        }
        Err(err) => {
            warn!(
                "event=store_write module=store store={store} op={op} status=error error_code={} error={}",
                repo_error_code(&err),
                err
            );
            Err(err.into())
        }
    }
}

/// Unwraps a load result, falling back to `default` on failure.
fn load_or_default<T>(
    store: &'static str,
    loaded: Result<Option<T>, RepoError>,
    default: impl FnOnce() -> T,
) -> T {
    match loaded {
        Ok(Some(value)) => {
            debug!("event=store_load module=store store={store} status=ok");
            value
        }
        Ok(None) => {
            debug!("event=store_load module=store store={store} status=ok source=default");
            default()
        }
        Err(err) => {
            error!(
                "event=store_load module=store store={store} status=error error_code={} error={}",
                repo_error_code(&err),
                err
            );
            default()
        }
    }
}

fn repo_error_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::Schedule(_) | RepoError::Mood(_) => "validation_failed",
        RepoError::Db(_) => "db_error",
        RepoError::NotFound(_) => "not_found",
        RepoError::DuplicateId(_) => "duplicate_id",
        RepoError::InvalidData(_) => "invalid_data",
        RepoError::Serde(_) => "serde_error",
    }
}

#[cfg(test)]
mod tests {
    use super::Subscribers;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn notify_runs_callbacks_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers: Subscribers<u64> = Subscribers::default();

        let first = Rc::clone(&seen);
        subscribers.subscribe(move |value| first.borrow_mut().push(("first", *value)));
        let second = Rc::clone(&seen);
        subscribers.subscribe(move |value| second.borrow_mut().push(("second", *value)));

        subscribers.notify(&4);
        assert_eq!(*seen.borrow(), vec![("first", 4), ("second", 4)]);
    }

    #[test]
    fn unsubscribe_stops_delivery_and_is_single_use() {
        let count = Rc::new(RefCell::new(0));
        let mut subscribers: Subscribers<str> = Subscribers::default();

        let counter = Rc::clone(&count);
        let id = subscribers.subscribe(move |_| *counter.borrow_mut() += 1);
        subscribers.notify("a");
        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id));
        subscribers.notify("b");

        assert_eq!(*count.borrow(), 1);
        assert!(subscribers.is_empty());
    }
}
