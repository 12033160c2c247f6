//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured link events to the
//! ESP-IDF logger (which goes to UART / USB-CDC in production).  Line
//! prefixes: `TX` for the transmitter, `RX` for the receiver, `LINK` for
//! liveness and transport.

use log::{info, warn};

use crate::app::events::{LinkEvent, Role};
use crate::app::ports::EventSink;
use crate::error::Error;
use crate::link::liveness::LinkState;
use crate::protocol::Command;

/// Adapter that logs every [`LinkEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &LinkEvent) {
        match event {
            LinkEvent::Started { role, profile } => {
                let tag = match role {
                    Role::Transmitter => "TX",
                    Role::Receiver => "RX",
                };
                info!("{} | started, profile={:?}", tag, profile);
            }
            LinkEvent::HeldAtBoot { channel } => {
                info!("TX | btn {} held at boot, no edge", channel);
            }
            LinkEvent::CommandSent { channel, pressed, command } => match command {
                Command::Drive { actuator, direction } => info!(
                    "TX | btn {} {} -> servo {} dir {}",
                    channel,
                    if *pressed { "down" } else { "up" },
                    actuator,
                    direction.as_i8()
                ),
                other => info!(
                    "TX | btn {} {} -> {:?}",
                    channel,
                    if *pressed { "down" } else { "up" },
                    other
                ),
            },
            LinkEvent::PressSuppressed { channel, owner } => {
                info!("TX | btn {} ignored, btn {} held", channel, owner);
            }
            LinkEvent::HeartbeatSent => {
                info!("TX | heartbeat");
            }
            LinkEvent::SendFailed { command, error } => {
                warn!("TX | send {:?} failed: {}", command, error);
            }
            LinkEvent::HeartbeatReceived => {
                log::debug!("RX | heartbeat");
            }
            LinkEvent::CommandApplied { command } => match command {
                Command::SetColour(idx) => info!("RX | colour index {}", idx),
                Command::AllOff => info!("RX | led off"),
                Command::Drive { actuator, direction } => {
                    info!("RX | servo {} dir {}", actuator, direction.as_i8());
                }
                Command::Heartbeat => {}
            },
            LinkEvent::CommandIgnored { command } => {
                info!("RX | ignored {:?}", command);
            }
            LinkEvent::PacketDiscarded { at_ms, len, error } => {
                warn!("RX | discarded {}-byte packet at {} ms: {}", len, at_ms, Error::from(*error));
            }
            LinkEvent::InboxOverflow { dropped } => {
                warn!("RX | inbox full, {} frames dropped so far", dropped);
            }
            LinkEvent::LinkStateChanged { from, to, elapsed_ms } => match to {
                LinkState::Lost => warn!("LINK | {:?} -> {:?}, silent {} ms", from, to, elapsed_ms),
                LinkState::Connected => info!("LINK | {:?} -> {:?}, down {} ms", from, to, elapsed_ms),
            },
        }
    }
}
