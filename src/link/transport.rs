//! Send-completion bookkeeping.
//!
//! The radio reports each frame's delivery on its own task.  Status is
//! never fed back into the protocol; it is counted here and logged.

use core::sync::atomic::{AtomicU32, Ordering};

/// Running delivery totals, updated from the send-completion callback.
pub struct DeliveryStats {
    delivered: AtomicU32,
    failed: AtomicU32,
}

impl DeliveryStats {
    pub const fn new() -> Self {
        Self {
            delivered: AtomicU32::new(0),
            failed: AtomicU32::new(0),
        }
    }

    /// Count one completion.  Returns the new total for that outcome.
    pub fn record(&self, success: bool) -> u32 {
        let counter = if success { &self.delivered } else { &self.failed };
        counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    pub fn delivered(&self) -> u32 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u32 {
        self.failed.load(Ordering::Relaxed)
    }
}

impl Default for DeliveryStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide totals for the single ESP-NOW peer.
pub static DELIVERY: DeliveryStats = DeliveryStats::new();
