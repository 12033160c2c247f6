//! Link configuration parameters.
//!
//! Every tunable for both endpoints lives here.  Defaults reproduce the
//! deployed hardware; a JSON override can be baked in at build time via
//! the `BUTTONLINK_CONFIG` environment variable.  Nothing is persisted.

use heapless::Vec;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::adapters::mac::MacAddress;
use crate::drivers::indicator::PALETTE;
use crate::error::{ConfigError, Error};
use crate::pins;

/// Minimum stable time before a new button level is accepted.
pub const DEBOUNCE_MS: u32 = 50;
/// Keep-alive period on the transmitter.
pub const HEARTBEAT_INTERVAL_MS: u32 = 5000;
/// Silence after which the receiver declares the link lost.
pub const LINK_TIMEOUT_MS: u32 = 1500;
/// Lost-link warning blink half-period.
pub const BLINK_PERIOD_MS: u32 = 500;

pub const MAX_BUTTONS: usize = 8;
pub const MAX_ACTUATORS: usize = 4;

/// Receiver MAC the transmitter is paired with.
pub const DEFAULT_PEER_MAC: MacAddress = [0x20, 0x6E, 0xF1, 0xB0, 0xF8, 0x34];

/// Which wire form both endpoints speak.  The two are not interoperable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolProfile {
    /// 2-byte `{actuator, direction}` packets driving servos.
    Direction,
    /// 1-byte colour-index packets driving the remote pixel.
    Index,
}

/// How the transmitter treats overlapping presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressPolicy {
    /// Every channel is tracked and reported on its own.
    Independent,
    /// While one button is held, presses on the others are not sent.
    FirstPressedWins,
}

/// What restarts the heartbeat timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeartbeatPolicy {
    /// Fixed wall-clock period; edge packets do not touch the timer.
    WallClock,
    /// Any outbound packet restarts the timer.
    ResetOnSend,
}

/// One physical button and what it commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonBinding {
    /// Input GPIO (active-low, internal pull-up).
    pub gpio: i32,
    /// Servo index driven in the direction profile.
    pub actuator: u8,
    /// -1 / +1 in the direction profile, unused in the index profile.
    pub direction: i8,
    /// Palette index shown locally and, in the index profile, sent.
    pub colour: u8,
}

impl ButtonBinding {
    const fn new(gpio: i32, actuator: u8, direction: i8, colour: u8) -> Self {
        Self {
            gpio,
            actuator,
            direction,
            colour,
        }
    }
}

/// Complete configuration shared by transmitter and receiver builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    // --- Protocol ---
    pub profile: ProtocolProfile,
    pub press_policy: PressPolicy,
    pub heartbeat_policy: HeartbeatPolicy,

    // --- Radio ---
    pub peer_mac: MacAddress,
    /// Wi-Fi channel shared by both ends (1-14).
    pub channel: u8,
    /// Transmitter max TX power in 0.25 dBm steps (34 = 8.5 dBm).
    pub tx_power_quarter_dbm: i8,
    /// Enable modem sleep on the transmitter between sends.
    pub radio_power_save: bool,

    // --- Indicator ---
    /// Global pixel brightness (0-255).
    pub led_brightness: u8,

    // --- Timing ---
    pub debounce_ms: u32,
    pub heartbeat_interval_ms: u32,
    pub link_timeout_ms: u32,
    pub blink_period_ms: u32,
    pub tx_loop_yield_ms: u32,
    pub rx_loop_yield_ms: u32,

    // --- Mapping ---
    pub actuator_count: u8,
    pub buttons: Vec<ButtonBinding, MAX_BUTTONS>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::direction_profile()
    }
}

impl LinkConfig {
    /// Servo remote: six buttons, two per servo, one per direction.
    pub fn direction_profile() -> Self {
        let bindings = [
            ButtonBinding::new(8, 0, -1, 0),
            ButtonBinding::new(6, 0, 1, 1),
            ButtonBinding::new(9, 1, -1, 2),
            ButtonBinding::new(5, 1, 1, 3),
            ButtonBinding::new(10, 2, -1, 4),
            ButtonBinding::new(4, 2, 1, 5),
        ];
        Self::with_bindings(ProtocolProfile::Direction, &bindings, 30)
    }

    /// Colour remote: six buttons, each selecting one palette entry.
    pub fn index_profile() -> Self {
        let bindings = [
            ButtonBinding::new(4, 0, 0, 0),
            ButtonBinding::new(5, 0, 0, 1),
            ButtonBinding::new(6, 0, 0, 2),
            ButtonBinding::new(8, 0, 0, 3),
            ButtonBinding::new(9, 0, 0, 4),
            ButtonBinding::new(10, 0, 0, 5),
        ];
        Self::with_bindings(ProtocolProfile::Index, &bindings, 50)
    }

    fn with_bindings(profile: ProtocolProfile, bindings: &[ButtonBinding], led_brightness: u8) -> Self {
        let mut buttons = Vec::new();
        for b in bindings {
            // Both default tables are shorter than MAX_BUTTONS.
            let _ = buttons.push(*b);
        }
        Self {
            profile,
            press_policy: PressPolicy::Independent,
            heartbeat_policy: HeartbeatPolicy::WallClock,
            peer_mac: DEFAULT_PEER_MAC,
            channel: 1,
            tx_power_quarter_dbm: 34,
            radio_power_save: true,
            led_brightness,
            debounce_ms: DEBOUNCE_MS,
            heartbeat_interval_ms: HEARTBEAT_INTERVAL_MS,
            link_timeout_ms: LINK_TIMEOUT_MS,
            blink_period_ms: BLINK_PERIOD_MS,
            tx_loop_yield_ms: 1,
            rx_loop_yield_ms: 10,
            actuator_count: 3,
            buttons,
        }
    }

    /// Build-time override if present and valid, defaults otherwise.
    pub fn load() -> Self {
        match option_env!("BUTTONLINK_CONFIG") {
            Some(json) => match Self::from_json(json) {
                Ok(cfg) => {
                    info!("Config: build-time override applied");
                    cfg
                }
                Err(e) => {
                    warn!("Config: override rejected ({}), using defaults", Error::from(e));
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    /// Parse a (possibly partial) JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Parse)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=14).contains(&self.channel) {
            return Err(ConfigError::ValidationFailed("channel must be 1-14"));
        }
        if !(8..=84).contains(&self.tx_power_quarter_dbm) {
            return Err(ConfigError::ValidationFailed(
                "tx_power_quarter_dbm must be 8-84 (2-21 dBm)",
            ));
        }
        if self.debounce_ms == 0
            || self.heartbeat_interval_ms == 0
            || self.link_timeout_ms == 0
            || self.blink_period_ms == 0
        {
            return Err(ConfigError::ValidationFailed("timing values must be non-zero"));
        }
        if self.actuator_count == 0 || self.actuator_count as usize > MAX_ACTUATORS {
            return Err(ConfigError::ValidationFailed("actuator_count must be 1-4"));
        }
        if self.buttons.is_empty() {
            return Err(ConfigError::ValidationFailed("at least one button binding required"));
        }

        for (i, b) in self.buttons.iter().enumerate() {
            if !(0..=48).contains(&b.gpio) {
                return Err(ConfigError::ValidationFailed("button gpio must be 0-48"));
            }
            if b.gpio == pins::LED_GPIO {
                return Err(ConfigError::ValidationFailed("button gpio is the status pixel line"));
            }
            if self.buttons[..i].iter().any(|other| other.gpio == b.gpio) {
                return Err(ConfigError::ValidationFailed("button gpio bound twice"));
            }
            if b.colour as usize >= PALETTE.len() {
                return Err(ConfigError::ValidationFailed("button colour outside palette"));
            }
            if self.profile == ProtocolProfile::Direction {
                if b.direction != 1 && b.direction != -1 {
                    return Err(ConfigError::ValidationFailed("button direction must be -1 or +1"));
                }
                if b.actuator >= self.actuator_count {
                    return Err(ConfigError::ValidationFailed("button actuator out of range"));
                }
            }
        }

        Ok(())
    }

    /// True when an idle link will time out between two heartbeats.
    pub fn idle_link_will_blink(&self) -> bool {
        self.heartbeat_interval_ms >= self.link_timeout_ms
    }
}
