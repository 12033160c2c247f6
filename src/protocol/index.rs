//! Index form: one colour-index byte.
//!
//! | Byte      | Meaning                       |
//! |-----------|-------------------------------|
//! | `0..=5`   | show palette entry            |
//! | `6`       | all off (sent by transmitter) |
//! | `0xFF`    | all off (accepted on decode)  |
//! | `0xFE`    | heartbeat                     |
//!
//! Any other byte decodes to `SetColour` and is ignored by the receiver
//! as an unknown index.

use super::Command;
use crate::error::DecodeError;

pub const PACKET_LEN: usize = 1;

pub const OFF: u8 = 6;
pub const OFF_LEGACY: u8 = 0xFF;
pub const HEARTBEAT: u8 = 0xFE;

pub fn encode(cmd: Command) -> Option<u8> {
    match cmd {
        Command::Heartbeat => Some(HEARTBEAT),
        Command::AllOff => Some(OFF),
        Command::SetColour(idx) if !matches!(idx, OFF | OFF_LEGACY | HEARTBEAT) => Some(idx),
        _ => None,
    }
}

pub fn decode(payload: &[u8]) -> Result<Command, DecodeError> {
    let first = *payload.first().ok_or(DecodeError::Empty)?;
    if first == HEARTBEAT {
        return Ok(Command::Heartbeat);
    }
    if payload.len() != PACKET_LEN {
        return Err(DecodeError::Length {
            expected: PACKET_LEN,
            actual: payload.len(),
        });
    }
    Ok(match first {
        OFF | OFF_LEGACY => Command::AllOff,
        idx => Command::SetColour(idx),
    })
}
