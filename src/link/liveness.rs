//! Receiver-side link liveness state machine.
//!
//! ```text
//!               idle > timeout (once)
//!   CONNECTED ──────────────────────▶ LOST ──┐ blink toggles
//!       ▲                               │  ◀─┘ every period
//!       └──────── any packet ───────────┘
//! ```
//!
//! Liveness is inferred purely from arrival time.  Payload content is
//! irrelevant: a heartbeat, a command and an undecodable frame all prove
//! the peer is transmitting.

use super::elapsed_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Lost,
}

/// Edge-triggered state change returned to the caller for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTransition {
    /// Silence exceeded the timeout.
    Lost { idle_ms: u32 },
    /// A packet arrived while lost.
    Restored { down_ms: u32 },
}

pub struct LivenessMonitor {
    timeout_ms: u32,
    blink_period_ms: u32,
    last_packet_ms: u32,
    state: LinkState,
    lost_at_ms: u32,
    blink_on: bool,
    last_blink_ms: u32,
}

impl LivenessMonitor {
    /// Starts optimistic: CONNECTED, with the silence clock running from
    /// `now_ms`.
    pub fn new(now_ms: u32, timeout_ms: u32, blink_period_ms: u32) -> Self {
        Self {
            timeout_ms,
            blink_period_ms,
            last_packet_ms: now_ms,
            state: LinkState::Connected,
            lost_at_ms: now_ms,
            blink_on: false,
            last_blink_ms: now_ms,
        }
    }

    /// Record an arrival at `at_ms`.
    pub fn on_packet(&mut self, at_ms: u32) -> Option<LinkTransition> {
        self.last_packet_ms = at_ms;
        if self.state == LinkState::Lost {
            self.state = LinkState::Connected;
            self.blink_on = false;
            return Some(LinkTransition::Restored {
                down_ms: elapsed_ms(at_ms, self.lost_at_ms),
            });
        }
        None
    }

    /// Declare the link lost if it has been silent too long.  Fires once
    /// per outage; the blink starts in its ON phase.
    pub fn check_timeout(&mut self, now_ms: u32) -> Option<LinkTransition> {
        if self.state == LinkState::Lost {
            return None;
        }
        let idle_ms = elapsed_ms(now_ms, self.last_packet_ms);
        if idle_ms <= self.timeout_ms {
            return None;
        }
        self.state = LinkState::Lost;
        self.lost_at_ms = now_ms;
        self.blink_on = true;
        self.last_blink_ms = now_ms;
        Some(LinkTransition::Lost { idle_ms })
    }

    /// Toggle the blink phase once a full period has passed.  Returns
    /// true when the phase changed.
    pub fn advance_blink(&mut self, now_ms: u32) -> bool {
        if self.state != LinkState::Lost {
            return false;
        }
        if elapsed_ms(now_ms, self.last_blink_ms) < self.blink_period_ms {
            return false;
        }
        self.blink_on = !self.blink_on;
        self.last_blink_ms = now_ms;
        true
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Current blink phase; always false while connected.
    pub fn blink_on(&self) -> bool {
        self.blink_on
    }

    pub fn last_packet_ms(&self) -> u32 {
        self.last_packet_ms
    }
}
