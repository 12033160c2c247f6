//! Adapters — concrete implementations of the hexagonal port traits and
//! platform services.
//!
//! | Adapter    | Implements / provides | Connects to            |
//! |------------|-----------------------|------------------------|
//! | `log_sink` | EventSink             | Serial log output      |
//! | `mac`      | station MAC lookup    | ESP32 eFuse            |
//! | `time`     | millisecond clock     | ESP32 system timer     |
//!
//! Buttons, the status pixel and servos live in [`drivers`](crate::drivers);
//! the radio in [`link::espnow`](crate::link).

pub mod log_sink;
pub mod mac;
pub mod time;
