//! Single-producer / single-consumer handoff from the radio receive
//! callback to the receiver main loop.
//!
//! The callback runs on the Wi-Fi task and may preempt the main loop at
//! any point.  It does a bounded amount of work: two atomic stores, one
//! counter bump and a non-blocking enqueue of a fixed-size record.  No
//! allocation, no logging, no decoding.
//!
//! | Field              | Writer   | Reader    |
//! |--------------------|----------|-----------|
//! | `last_arrival_ms`  | callback | main loop |
//! | `arrivals`         | callback | main loop |
//! | `dropped`          | callback | main loop |
//! | `frames` (depth 8) | callback | main loop |
//!
//! A full queue drops the frame but still stamps the arrival, so a burst
//! the main loop cannot keep up with still counts as a live link.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Queue depth between callback and main loop.
pub const INBOX_DEPTH: usize = 8;

/// Payload bytes kept per frame.  Longer frames keep their true length
/// so the decoder still rejects them.
pub const FRAME_CAPACITY: usize = 8;

/// One received datagram as seen by the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundFrame {
    pub at_ms: u32,
    len: usize,
    data: [u8; FRAME_CAPACITY],
}

impl InboundFrame {
    pub fn new(at_ms: u32, payload: &[u8]) -> Self {
        let mut data = [0u8; FRAME_CAPACITY];
        let kept = payload.len().min(FRAME_CAPACITY);
        data[..kept].copy_from_slice(&payload[..kept]);
        Self {
            at_ms,
            len: payload.len(),
            data,
        }
    }

    /// Length of the datagram as received.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stored bytes.  Shorter than [`len`](Self::len) only when the
    /// datagram exceeded [`FRAME_CAPACITY`].
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len.min(FRAME_CAPACITY)]
    }

    /// True when bytes past [`FRAME_CAPACITY`] were cut off.
    pub fn truncated(&self) -> bool {
        self.len > FRAME_CAPACITY
    }
}

pub struct Inbox {
    last_arrival_ms: AtomicU32,
    arrivals: AtomicU32,
    dropped: AtomicU32,
    frames: Channel<CriticalSectionRawMutex, InboundFrame, INBOX_DEPTH>,
}

impl Inbox {
    pub const fn new() -> Self {
        Self {
            last_arrival_ms: AtomicU32::new(0),
            arrivals: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
            frames: Channel::new(),
        }
    }

    // ── Producer (radio callback) ─────────────────────────────

    /// Record one datagram.  Never blocks.
    pub fn record(&self, at_ms: u32, payload: &[u8]) {
        self.last_arrival_ms.store(at_ms, Ordering::Release);
        if self.frames.try_send(InboundFrame::new(at_ms, payload)).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        // Bumped last so a reader that sees the new count also sees the stamp.
        self.arrivals.fetch_add(1, Ordering::AcqRel);
    }

    // ── Consumer (main loop) ──────────────────────────────────

    /// Next queued frame, oldest first.
    pub fn take(&self) -> Option<InboundFrame> {
        self.frames.try_receive().ok()
    }

    /// Total datagrams seen since boot, including dropped ones.
    pub fn arrivals(&self) -> u32 {
        self.arrivals.load(Ordering::Acquire)
    }

    /// Timestamp of the most recent datagram.
    pub fn last_arrival_ms(&self) -> u32 {
        self.last_arrival_ms.load(Ordering::Acquire)
    }

    /// Frames discarded because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for Inbox {
    fn default() -> Self {
        Self::new()
    }
}
