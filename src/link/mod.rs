//! Link layer: inbound handoff, keep-alive timing, liveness tracking and
//! the ESP-NOW transport.
//!
//! ```text
//!   radio task                           main loop
//!  ┌──────────────┐   Inbox (SPSC)   ┌────────────────────┐
//!  │ recv callback│ ───────────────▶ │ ReceiverService    │
//!  └──────────────┘  stamp + frame   │  LivenessMonitor   │
//!                                    └────────────────────┘
//!  ┌──────────────┐                  ┌────────────────────┐
//!  │ send callback│ ◀─────────────── │ TransmitterService │
//!  └──────────────┘  DeliveryStats   │  HeartbeatGenerator│
//!                                    └────────────────────┘
//! ```

#[cfg(target_os = "espidf")]
pub mod espnow;
pub mod heartbeat;
pub mod inbox;
pub mod liveness;
pub mod transport;

/// Milliseconds from `since` to `now` on the wrapping `u32` clock.
///
/// A `since` slightly ahead of `now` (stamp written by the radio task
/// after the main loop sampled the clock) reads as zero, not as a
/// near-`u32::MAX` gap.
pub fn elapsed_ms(now_ms: u32, since_ms: u32) -> u32 {
    let delta = now_ms.wrapping_sub(since_ms);
    if delta > u32::MAX / 2 { 0 } else { delta }
}
