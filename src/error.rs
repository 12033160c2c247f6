//! Unified error types for the button-link firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level loop's error handling uniform.  All variants are `Copy` so
//! they can be logged and passed around from the receive path without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral or radio bring-up failed.
    Init(&'static str),
    /// The radio transport rejected an operation.
    Transport(TransportError),
    /// An inbound packet could not be decoded.
    Packet(DecodeError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Packet(e) => write!(f, "packet: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Packet decode errors
// ---------------------------------------------------------------------------

/// Reasons an inbound packet is discarded without touching any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Zero-length payload.
    Empty,
    /// Payload length does not match the active profile's packet size.
    Length { expected: usize, actual: usize },
    /// Direction byte outside `{-1, 0, +1}`.
    InvalidDirection(i8),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty packet"),
            Self::Length { expected, actual } => {
                write!(f, "invalid length {actual} (expected {expected})")
            }
            Self::InvalidDirection(d) => write!(f, "invalid direction {d}"),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Packet(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Radio stack could not be initialised.
    InitFailed(i32),
    /// Peer registration was rejected.
    PeerAddFailed(i32),
    /// The send call was rejected before reaching the air.
    SendFailed(i32),
    /// Callback registration failed.
    CallbackFailed(i32),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed(rc) => write!(f, "ESP-NOW init failed (rc={rc})"),
            Self::PeerAddFailed(rc) => write!(f, "failed to add peer (rc={rc})"),
            Self::SendFailed(rc) => write!(f, "send rejected (rc={rc})"),
            Self::CallbackFailed(rc) => write!(f, "callback registration failed (rc={rc})"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Config validation failures.  Values are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Override string was not valid JSON for [`LinkConfig`](crate::config::LinkConfig).
    Parse,
    /// A field failed range validation.  The string names the field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "config override is not valid JSON"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
