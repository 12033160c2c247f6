//! Polled multi-button debouncer.
//!
//! ## Hardware
//!
//! Active-low momentary switches with the internal pull-up enabled.  A
//! press reads as logic low.  The main loop samples every channel each
//! iteration; there is no interrupt path.
//!
//! ## Acceptance rule
//!
//! A sampled level becomes the new stable level only when it differs
//! from the current stable level **and** at least `window_ms` has passed
//! since that channel's last accepted transition.  Anything sampled
//! inside the window is dropped; whatever the pin reads once the window
//! has elapsed wins.

use embedded_hal::digital::InputPin;
use heapless::Vec;

use crate::app::ports::ButtonPort;
use crate::config::MAX_BUTTONS;
use crate::link::elapsed_ms;

/// A debounced press or release on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub channel: usize,
    pub pressed: bool,
    pub at_ms: u32,
}

#[derive(Debug, Clone, Copy)]
struct ChannelState {
    stable_pressed: bool,
    last_edge_ms: u32,
}

pub struct Debouncer {
    channels: Vec<ChannelState, MAX_BUTTONS>,
    window_ms: u32,
}

impl Debouncer {
    pub fn new(window_ms: u32) -> Self {
        Self {
            channels: Vec::new(),
            window_ms,
        }
    }

    /// Take the boot-time level of every button as its stable state, so
    /// a button already held at power-up does not produce an edge.
    pub fn seed(&mut self, buttons: &mut impl ButtonPort, now_ms: u32) {
        self.channels.clear();
        for ch in 0..buttons.count().min(MAX_BUTTONS) {
            let _ = self.channels.push(ChannelState {
                stable_pressed: buttons.is_pressed(ch),
                last_edge_ms: now_ms,
            });
        }
    }

    /// Feed one sample for `channel`.  Returns the accepted edge, if any.
    pub fn update(&mut self, channel: usize, pressed: bool, now_ms: u32) -> Option<Edge> {
        let window_ms = self.window_ms;
        let state = self.channels.get_mut(channel)?;

        if pressed == state.stable_pressed {
            return None;
        }
        if elapsed_ms(now_ms, state.last_edge_ms) < window_ms {
            return None;
        }

        state.stable_pressed = pressed;
        state.last_edge_ms = now_ms;
        Some(Edge {
            channel,
            pressed,
            at_ms: now_ms,
        })
    }

    /// Sample every seeded channel once, calling `on_edge` in channel order.
    pub fn poll(&mut self, buttons: &mut impl ButtonPort, now_ms: u32, mut on_edge: impl FnMut(Edge)) {
        for ch in 0..self.channels.len() {
            let pressed = buttons.is_pressed(ch);
            if let Some(edge) = self.update(ch, pressed, now_ms) {
                on_edge(edge);
            }
        }
    }

    /// Last accepted level of `channel`.
    pub fn is_pressed(&self, channel: usize) -> bool {
        self.channels.get(channel).is_some_and(|c| c.stable_pressed)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Button inputs backed by embedded-hal pins, in binding order.
pub struct ButtonBank<P> {
    pins: Vec<P, MAX_BUTTONS>,
}

impl<P: InputPin> ButtonBank<P> {
    pub fn new() -> Self {
        Self { pins: Vec::new() }
    }

    /// Append the next channel.  Returns the pin back if the bank is full.
    pub fn push(&mut self, pin: P) -> Result<(), P> {
        self.pins.push(pin)
    }
}

impl<P: InputPin> Default for ButtonBank<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: InputPin> ButtonPort for ButtonBank<P> {
    fn count(&self) -> usize {
        self.pins.len()
    }

    fn is_pressed(&mut self, channel: usize) -> bool {
        // Read errors count as released.
        self.pins
            .get_mut(channel)
            .is_some_and(|pin| pin.is_low().unwrap_or(false))
    }
}
