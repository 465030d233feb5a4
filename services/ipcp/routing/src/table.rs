//! Published forwarding table snapshots.

use crate::entry::ForwardingEntry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Forwarding table published to the data plane.
///
/// A computation pass hands over a wholly new entry set; [`replace`] swaps it
/// in atomically from a reader's point of view and bumps the epoch. Published
/// snapshots are never mutated in place, so a lookup always sees one
/// consistent topology pass.
///
/// [`replace`]: ForwardingTable::replace
#[derive(Debug)]
pub struct ForwardingTable {
    /// Local node address; never the target of an entry
    local_address: u64,
    /// Current snapshot: destination -> entry
    entries: RwLock<Arc<HashMap<u64, ForwardingEntry>>>,
    /// Generation counter, bumped on every replacement
    epoch: RwLock<u32>,
}

impl ForwardingTable {
    /// Create an empty table for the given local address
    pub fn new(local_address: u64) -> Self {
        Self {
            local_address,
            entries: RwLock::new(Arc::new(HashMap::new())),
            epoch: RwLock::new(0),
        }
    }

    /// Local node address this table belongs to
    pub fn local_address(&self) -> u64 {
        self.local_address
    }

    /// Replace the published snapshot with the result of a new computation
    /// pass and return the new epoch.
    pub async fn replace(&self, entries: Vec<ForwardingEntry>) -> u32 {
        let snapshot: HashMap<u64, ForwardingEntry> = entries
            .into_iter()
            .map(|entry| (entry.destination, entry))
            .collect();
        let count = snapshot.len();

        {
            let mut guard = self.entries.write().await;
            *guard = Arc::new(snapshot);
        }

        let mut epoch = self.epoch.write().await;
        *epoch = epoch.wrapping_add(1);
        info!(
            "published forwarding table epoch {} with {} entries",
            *epoch, count
        );
        *epoch
    }

    /// Entry for a destination, if one was emitted by the last pass
    pub async fn lookup(&self, destination: u64) -> Option<ForwardingEntry> {
        let entry = self.entries.read().await.get(&destination).copied();
        if entry.is_none() {
            debug!("no route to destination {}", destination);
        }
        entry
    }

    /// Whether traffic for `destination` has somewhere to go. The local
    /// address is always reachable (delivered locally, never forwarded).
    pub async fn is_reachable(&self, destination: u64) -> bool {
        destination == self.local_address
            || self.entries.read().await.contains_key(&destination)
    }

    /// Immutable view of the current snapshot
    pub async fn snapshot(&self) -> Arc<HashMap<u64, ForwardingEntry>> {
        self.entries.read().await.clone()
    }

    /// Number of entries in the current snapshot
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the current snapshot is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Current epoch
    pub async fn epoch(&self) -> u32 {
        *self.epoch.read().await
    }
}
