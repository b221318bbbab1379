//! Reward token balance.
//!
//! # Invariants
//! - The balance never goes below zero; `spend` clamps.
//! - `earn` saturates at `u64::MAX` instead of wrapping.

use super::{load_or_default, persist, StoreResult, SubscriptionId, Subscribers};
use crate::repo::kv_repo::{KeyValueRepository, REWARD_TOKENS_KEY};

const STORE: &str = "tokens";

pub struct TokenStore<R: KeyValueRepository> {
    repo: R,
    balance: u64,
    subscribers: Subscribers<u64>,
}

impl<R: KeyValueRepository> TokenStore<R> {
    pub fn load(repo: R) -> Self {
        let loaded = repo.load_json::<u64>(REWARD_TOKENS_KEY);
        let balance = load_or_default(STORE, loaded, || 0);
        Self {
            repo,
            balance,
            subscribers: Subscribers::default(),
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Adds `amount` tokens and returns the new balance.
    pub fn earn(&mut self, amount: u64) -> StoreResult<u64> {
        self.set_balance("earn", self.balance.saturating_add(amount))
    }

    /// Awards the single token granted for a finished activity or game.
    pub fn add_token(&mut self) -> StoreResult<u64> {
        self.earn(1)
    }

    /// Removes up to `amount` tokens and returns the new balance.
    pub fn spend(&mut self, amount: u64) -> StoreResult<u64> {
        self.set_balance("spend", self.balance.saturating_sub(amount))
    }

    /// Spends `cost` only when the balance covers it.
    ///
    /// Returns `Ok(false)` without writing when the balance is too low.
    pub fn redeem(&mut self, cost: u64) -> StoreResult<bool> {
        if self.balance < cost {
            return Ok(false);
        }
        self.spend(cost)?;
        Ok(true)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&u64) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn set_balance(&mut self, op: &'static str, next: u64) -> StoreResult<u64> {
        persist(STORE, op, || self.repo.save_json(REWARD_TOKENS_KEY, &next))?;
        self.balance = next;
        self.subscribers.notify(&self.balance);
        Ok(next)
    }
}
