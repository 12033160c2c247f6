//! Direction form: `[actuator: u8, direction: i8]`.

use super::{Command, Direction};
use crate::error::DecodeError;

pub const PACKET_LEN: usize = 2;

/// Actuator id reserved for keep-alive packets.
pub const HEARTBEAT_ACTUATOR: u8 = 255;

pub fn encode(cmd: Command) -> Option<[u8; PACKET_LEN]> {
    match cmd {
        Command::Heartbeat => Some([HEARTBEAT_ACTUATOR, 0]),
        Command::Drive { actuator, direction } if actuator != HEARTBEAT_ACTUATOR => {
            Some([actuator, direction.as_i8() as u8])
        }
        _ => None,
    }
}

pub fn decode(payload: &[u8]) -> Result<Command, DecodeError> {
    let actuator = *payload.first().ok_or(DecodeError::Empty)?;
    if actuator == HEARTBEAT_ACTUATOR {
        return Ok(Command::Heartbeat);
    }
    if payload.len() != PACKET_LEN {
        return Err(DecodeError::Length {
            expected: PACKET_LEN,
            actual: payload.len(),
        });
    }
    let raw = payload[1] as i8;
    let direction = Direction::from_i8(raw).ok_or(DecodeError::InvalidDirection(raw))?;
    Ok(Command::Drive { actuator, direction })
}
