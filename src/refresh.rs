//! The per-user counter that tells the transaction list to re-fetch.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::auth::UserId;

/// The htmx event that makes the transaction list re-fetch itself.
pub const TRANSACTIONS_REFRESH_EVENT: &str = "transactions-refresh";

/// Counts successful transaction submissions for each user.
///
/// The value only ever goes up. It is sent to the browser with the refresh
/// event and rendered on the transaction list, so a client can tell which
/// submission its list reflects.
#[derive(Debug, Clone, Default)]
pub struct RefreshCounter {
    counts: Arc<Mutex<HashMap<UserId, u64>>>,
}

impl RefreshCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, u64>> {
        // Every update is a single write, so a poisoned map is still consistent.
        self.counts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add one to the count for `user_id` and return the new value.
    pub fn increment(&self, user_id: &UserId) -> u64 {
        let mut counts = self.lock();
        let count = counts.entry(user_id.clone()).or_insert(0);
        *count += 1;
        *count
    }

    /// The current count for `user_id`, zero if they have not submitted anything.
    pub fn current(&self, user_id: &UserId) -> u64 {
        self.lock().get(user_id).copied().unwrap_or(0)
    }

    /// The `HX-Trigger` header value that fires the refresh event with `count`.
    pub fn trigger_header(count: u64) -> String {
        serde_json::json!({ TRANSACTIONS_REFRESH_EVENT: count }).to_string()
    }
}
