//! GPIO / peripheral pin assignments for the ESP32-S3 dev boards.
//!
//! Single source of truth for fixed wiring.  Button pins are part of the
//! per-profile binding table in [`LinkConfig`](crate::config::LinkConfig)
//! because the two remotes wire them in a different order.

use crate::config::MAX_ACTUATORS;

// ---------------------------------------------------------------------------
// Status pixel (WS2812, both endpoints)
// ---------------------------------------------------------------------------

/// Data line of the on-board addressable LED.
pub const LED_GPIO: i32 = 48;

// ---------------------------------------------------------------------------
// Servos (receiver, direction profile)
// ---------------------------------------------------------------------------

/// LEDC outputs for continuous-rotation servos, indexed by actuator id.
/// The stock remote drives the first three.
pub const SERVO_GPIOS: [i32; MAX_ACTUATORS] = [1, 2, 3, 7];

/// Pulse widths for reverse / stop / forward.
pub const SERVO_PULSE_REVERSE_US: u32 = 1000;
pub const SERVO_PULSE_STOP_US: u32 = 1500;
pub const SERVO_PULSE_FORWARD_US: u32 = 2000;
