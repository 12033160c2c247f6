//! Wire protocol shared by transmitter and receiver.
//!
//! Two fixed-size packet forms exist and they are not interoperable; both
//! ends are built for the same [`ProtocolProfile`].
//!
//! ```text
//!  Direction form (2 B)            Index form (1 B)
//! ┌────────────┬───────────┐      ┌─────────────┐
//! │ actuator u8│ dir i8    │      │ colour u8   │
//! └────────────┴───────────┘      └─────────────┘
//!   255 = heartbeat                 0xFE = heartbeat
//!                                   6 / 0xFF = all off
//! ```
//!
//! Packets are built and parsed byte by byte; nothing is reinterpreted
//! from memory, so layout is independent of alignment and endianness.

pub mod direction;
pub mod index;

use heapless::Vec;

use crate::config::{ButtonBinding, ProtocolProfile};
use crate::error::DecodeError;

/// Largest packet of either form.
pub const MAX_PACKET_LEN: usize = 2;

/// Encoded packet ready for the transport.
pub type PacketBuf = Vec<u8, MAX_PACKET_LEN>;

/// Servo drive direction carried in the direction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum Direction {
    Reverse = -1,
    Stop = 0,
    Forward = 1,
}

impl Direction {
    pub fn from_i8(raw: i8) -> Option<Self> {
        match raw {
            -1 => Some(Self::Reverse),
            0 => Some(Self::Stop),
            1 => Some(Self::Forward),
            _ => None,
        }
    }

    pub const fn as_i8(self) -> i8 {
        self as i8
    }
}

/// Profile-independent meaning of one packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Keep-alive; never changes actuator or LED state.
    Heartbeat,
    /// Direction form: run or stop one servo.
    Drive { actuator: u8, direction: Direction },
    /// Index form: show palette entry.
    SetColour(u8),
    /// Index form: turn the remote pixel off.
    AllOff,
}

impl ProtocolProfile {
    /// Exact packet size for this profile.
    pub const fn packet_len(self) -> usize {
        match self {
            Self::Direction => direction::PACKET_LEN,
            Self::Index => index::PACKET_LEN,
        }
    }

    /// Command sent when `binding`'s button goes down.
    pub fn press_command(self, binding: &ButtonBinding) -> Command {
        match self {
            Self::Direction => Command::Drive {
                actuator: binding.actuator,
                direction: Direction::from_i8(binding.direction).unwrap_or(Direction::Stop),
            },
            Self::Index => Command::SetColour(binding.colour),
        }
    }

    /// Command sent when `binding`'s button is released.
    pub fn release_command(self, binding: &ButtonBinding) -> Command {
        match self {
            Self::Direction => Command::Drive {
                actuator: binding.actuator,
                direction: Direction::Stop,
            },
            Self::Index => Command::AllOff,
        }
    }

    /// Encode `cmd`, or `None` if this profile has no representation for it.
    pub fn encode(self, cmd: Command) -> Option<PacketBuf> {
        let mut buf = PacketBuf::new();
        match self {
            Self::Direction => {
                let bytes = direction::encode(cmd)?;
                buf.extend_from_slice(&bytes).ok()?;
            }
            Self::Index => {
                buf.push(index::encode(cmd)?).ok()?;
            }
        }
        Some(buf)
    }

    /// Decode an inbound payload.  The heartbeat sentinel is checked
    /// before the length, so a heartbeat is recognised on its first byte.
    pub fn decode(self, payload: &[u8]) -> Result<Command, DecodeError> {
        match self {
            Self::Direction => direction::decode(payload),
            Self::Index => index::decode(payload),
        }
    }
}
