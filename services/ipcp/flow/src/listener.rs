//! SDU delivery consumers.

use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};

/// Consumer of SDUs drained from one flow.
///
/// Invoked by the flow reader once per SDU, in read order, from the reader's
/// own task. Implementations must not assume any particular execution
/// context.
pub trait SduListener: Send + Sync {
    /// One SDU read from the flow
    fn sdu_delivered(&self, sdu: Bytes);
}

/// Listener counting delivered SDUs and bytes, for throughput measurement.
#[derive(Debug, Default)]
pub struct SduCounter {
    sdus: AtomicU64,
    bytes: AtomicU64,
}

impl SduCounter {
    /// Create a counter with all tallies at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of SDUs delivered so far
    pub fn sdus(&self) -> u64 {
        self.sdus.load(Ordering::Relaxed)
    }

    /// Total payload bytes delivered so far
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

impl SduListener for SduCounter {
    fn sdu_delivered(&self, sdu: Bytes) {
        self.sdus.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(sdu.len() as u64, Ordering::Relaxed);
    }
}
