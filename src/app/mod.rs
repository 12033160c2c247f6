//! Link core — pure protocol logic, zero I/O.
//!
//! The transmitter turns debounced button edges and a heartbeat timer into
//! packets; the receiver turns packets into servo and pixel state and
//! tracks link liveness.  All hardware access goes through the **port
//! traits** in [`ports`], keeping both services testable on the host.

pub mod events;
pub mod ports;
pub mod receiver;
pub mod transmitter;
