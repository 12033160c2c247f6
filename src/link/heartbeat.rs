//! Keep-alive timer for the transmitter.
//!
//! Fires once the interval has been strictly exceeded.  Under
//! [`HeartbeatPolicy::WallClock`] the period runs regardless of button
//! traffic; under [`HeartbeatPolicy::ResetOnSend`] every edge packet
//! restarts it.

use crate::config::HeartbeatPolicy;

use super::elapsed_ms;

pub struct HeartbeatGenerator {
    interval_ms: u32,
    policy: HeartbeatPolicy,
    last_ms: u32,
}

impl HeartbeatGenerator {
    pub fn new(now_ms: u32, interval_ms: u32, policy: HeartbeatPolicy) -> Self {
        Self {
            interval_ms,
            policy,
            last_ms: now_ms,
        }
    }

    /// True when a heartbeat is due.  The timer restarts at `now_ms`
    /// whether or not the caller's send succeeds.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if elapsed_ms(now_ms, self.last_ms) > self.interval_ms {
            self.last_ms = now_ms;
            return true;
        }
        false
    }

    /// Record an edge-triggered send.
    pub fn note_send(&mut self, now_ms: u32) {
        if self.policy == HeartbeatPolicy::ResetOnSend {
            self.last_ms = now_ms;
        }
    }
}
