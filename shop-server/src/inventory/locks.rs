//! Per-record async locks

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per record key
///
/// The ledger locks product ids and the order service locks order ids.
/// Entries are created on first use and kept; a key maps to the same mutex
/// for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct RecordLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl RecordLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the map shard is not held across the await
        let mutex = self
            .locks
            .entry(key.to_string())
            .or_default()
            .clone();
        mutex.lock_owned().await
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
