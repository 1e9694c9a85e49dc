//! Per-date mutual exclusion for read-modify-write cycles.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async lock per calendar date.
///
/// The guard is owned, so it can move into a blocking task and stay held
/// until the write finishes even when the awaiting caller goes away.
///
/// Entries whose lock is neither held nor awaited are dropped on the next
/// [`DateLocks::acquire`], so the table stays bounded by the number of dates
/// in flight.
#[derive(Debug, Default)]
pub struct DateLocks {
    table: Mutex<HashMap<NaiveDate, Arc<AsyncMutex<()>>>>,
}

impl DateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `date`.
    pub async fn acquire(&self, date: NaiveDate) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            // Held guards and waiters each own a clone of the Arc.
            table.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(table.entry(date).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of dates currently tracked.
    pub fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
