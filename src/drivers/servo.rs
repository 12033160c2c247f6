//! Continuous-rotation servo bank on LEDC.
//!
//! Each actuator id maps to one LEDC channel (see [`pins::SERVO_GPIOS`]).
//! Pulse width selects the motion: 1000 µs reverse, 1500 µs stop,
//! 2000 µs forward.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes LEDC duty via hw_init.
//! On host/test: tracks pulse widths in-memory only.

use heapless::Vec;
use log::warn;

use crate::app::ports::ActuatorPort;
use crate::config::MAX_ACTUATORS;
use crate::drivers::hw_init;
use crate::pins;
use crate::protocol::Direction;

pub fn pulse_for(direction: Direction) -> u32 {
    match direction {
        Direction::Reverse => pins::SERVO_PULSE_REVERSE_US,
        Direction::Stop => pins::SERVO_PULSE_STOP_US,
        Direction::Forward => pins::SERVO_PULSE_FORWARD_US,
    }
}

pub struct ServoBank {
    pulses_us: Vec<u32, MAX_ACTUATORS>,
}

impl ServoBank {
    /// Bank of `count` servos, all stopped.  Channels must already be
    /// configured with [`hw_init::init_servo_ledc`].
    pub fn new(count: usize) -> Self {
        let mut pulses_us = Vec::new();
        for _ in 0..count.min(MAX_ACTUATORS) {
            let _ = pulses_us.push(pins::SERVO_PULSE_STOP_US);
        }
        Self { pulses_us }
    }

    pub fn len(&self) -> usize {
        self.pulses_us.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses_us.is_empty()
    }

    /// Current pulse width of `actuator`.
    pub fn pulse_us(&self, actuator: u8) -> Option<u32> {
        self.pulses_us.get(actuator as usize).copied()
    }

    fn write(&mut self, index: usize, pulse_us: u32) {
        if let Some(slot) = self.pulses_us.get_mut(index) {
            *slot = pulse_us;
            hw_init::ledc_set(index as u32, hw_init::pulse_to_duty(pulse_us));
        }
    }
}

impl ActuatorPort for ServoBank {
    fn drive(&mut self, actuator: u8, direction: Direction) {
        if actuator as usize >= self.pulses_us.len() {
            warn!("servo: no actuator {}", actuator);
            return;
        }
        self.write(actuator as usize, pulse_for(direction));
    }

    fn stop_all(&mut self) {
        for i in 0..self.pulses_us.len() {
            self.write(i, pins::SERVO_PULSE_STOP_US);
        }
    }
}
