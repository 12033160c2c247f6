//! Outbound link events.
//!
//! Both services emit these through the
//! [`EventSink`](super::ports::EventSink) port.  The log adapter renders
//! one line per event; tests record them to assert on behaviour.

use crate::config::ProtocolProfile;
use crate::error::{DecodeError, TransportError};
use crate::link::liveness::LinkState;
use crate::protocol::Command;

/// Which end of the link is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Transmitter,
    Receiver,
}

/// Structured events emitted by the transmitter and receiver services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Service started; carries the active wire form.
    Started { role: Role, profile: ProtocolProfile },

    /// A button was already held when the service started.
    HeldAtBoot { channel: usize },

    // ── Transmitter ───────────────────────────────────────────
    /// A debounced edge produced an outbound command.
    CommandSent { channel: usize, pressed: bool, command: Command },

    /// Press ignored because another button owns the link.
    PressSuppressed { channel: usize, owner: usize },

    HeartbeatSent,

    /// The radio refused the frame.  Never retried.
    SendFailed { command: Command, error: TransportError },

    // ── Receiver ──────────────────────────────────────────────
    HeartbeatReceived,

    /// A command changed actuator or pixel state.
    CommandApplied { command: Command },

    /// A well-formed command addressed an unknown actuator or colour.
    CommandIgnored { command: Command },

    /// Payload failed to decode; no state was touched.
    PacketDiscarded { at_ms: u32, len: usize, error: DecodeError },

    /// Frames dropped because the inbox was full (running total).
    InboxOverflow { dropped: u32 },

    /// Liveness moved between connected and lost.  `elapsed_ms` is the
    /// silence that triggered a loss, or the outage length on recovery.
    LinkStateChanged { from: LinkState, to: LinkState, elapsed_ms: u32 },
}
