//! Port traits — the hexagonal boundary between link logic and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ TransmitterService / ReceiverService
//! ```
//!
//! Buttons, the status pixel, servos, the radio and the event log are all
//! reached through these traits.  The services take them as generics at
//! the call site, so every rule in the link protocol can be exercised on
//! the host with mock adapters.

use crate::drivers::indicator::Rgb;
use crate::error::TransportError;
use crate::protocol::Direction;

use super::events::LinkEvent;

// ───────────────────────────────────────────────────────────────
// Button port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw level read of the transmitter's buttons, in binding order.
pub trait ButtonPort {
    /// Number of channels available.
    fn count(&self) -> usize;

    /// True when `channel` currently reads pressed (logic low).
    fn is_pressed(&mut self, channel: usize) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → pixel)
// ───────────────────────────────────────────────────────────────

/// Single addressable pixel.  Changes are staged until [`show`](Self::show).
pub trait IndicatorPort {
    fn set_colour(&mut self, colour: Rgb);

    fn off(&mut self);

    /// Latch the staged colour onto the pixel.
    fn show(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → servos)
// ───────────────────────────────────────────────────────────────

/// Continuous-rotation servos addressed by index.
pub trait ActuatorPort {
    /// Run `actuator` in `direction`.  Unknown indices are ignored.
    fn drive(&mut self, actuator: u8, direction: Direction);

    /// Stop every servo.
    fn stop_all(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Link port (driven adapter: domain → radio)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget datagram send to the paired peer.
///
/// `Ok` means the radio accepted the frame, not that it was delivered.
/// Delivery status arrives later through the send-completion callback and
/// is only logged.
pub trait LinkPort {
    fn send(&mut self, payload: &[u8]) -> Result<(), TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The services emit structured [`LinkEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &LinkEvent);
}
