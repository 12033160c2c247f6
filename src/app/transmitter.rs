//! Transmitter service — buttons in, packets out.
//!
//! [`TransmitterService`] owns the debouncer, the heartbeat timer and the
//! local pixel state.  Each loop iteration calls [`tick`](TransmitterService::tick),
//! which samples every button, turns accepted edges into exactly one
//! packet each, and sends a heartbeat when due.
//!
//! ```text
//!  ButtonPort ──▶ ┌──────────────────────┐ ──▶ LinkPort
//!                 │  TransmitterService   │
//! IndicatorPort ◀─│ Debouncer · Heartbeat │ ──▶ EventSink
//!                 └──────────────────────┘
//! ```
//!
//! Sends are fire-and-forget.  A rejected send is reported and dropped;
//! the next edge or heartbeat goes out as normal.

use heapless::Vec;

use crate::config::{LinkConfig, PressPolicy, MAX_BUTTONS};
use crate::drivers::button::{Debouncer, Edge};
use crate::drivers::indicator::{palette_colour, IndicatorMux, Rgb, OFF};
use crate::link::heartbeat::HeartbeatGenerator;
use crate::protocol::Command;

use super::events::{LinkEvent, Role};
use super::ports::{ButtonPort, EventSink, IndicatorPort, LinkPort};

pub struct TransmitterService {
    config: LinkConfig,
    debouncer: Debouncer,
    heartbeat: HeartbeatGenerator,
    indicator: IndicatorMux,
    /// Button that owns the link under [`PressPolicy::FirstPressedWins`].
    owner: Option<usize>,
    /// Channels whose press was swallowed; their release is swallowed too.
    suppressed: u16,
}

impl TransmitterService {
    /// Does not sample the buttons — call [`start`](Self::start) next.
    pub fn new(config: LinkConfig) -> Self {
        let debouncer = Debouncer::new(config.debounce_ms);
        let heartbeat = HeartbeatGenerator::new(0, config.heartbeat_interval_ms, config.heartbeat_policy);
        Self {
            config,
            debouncer,
            heartbeat,
            indicator: IndicatorMux::new(),
            owner: None,
            suppressed: 0,
        }
    }

    /// Seed every channel from its boot-time level and start the
    /// heartbeat period at `now_ms`.  Buttons already held produce no edge.
    pub fn start(
        &mut self,
        now_ms: u32,
        buttons: &mut impl ButtonPort,
        pixel: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        self.debouncer.seed(buttons, now_ms);
        self.heartbeat =
            HeartbeatGenerator::new(now_ms, self.config.heartbeat_interval_ms, self.config.heartbeat_policy);
        self.owner = None;
        self.suppressed = 0;
        if self.config.press_policy == PressPolicy::FirstPressedWins {
            // Lowest held channel owns the link; the rest stay muted until released.
            for ch in (0..self.debouncer.len()).filter(|&ch| self.debouncer.is_pressed(ch)) {
                match self.owner {
                    None => self.owner = Some(ch),
                    Some(_) => self.suppressed |= 1u16 << ch,
                }
            }
        }

        sink.emit(&LinkEvent::Started {
            role: Role::Transmitter,
            profile: self.config.profile,
        });
        for ch in 0..self.debouncer.len() {
            if self.debouncer.is_pressed(ch) {
                sink.emit(&LinkEvent::HeldAtBoot { channel: ch });
            }
        }

        self.indicator.set_applied(OFF);
        self.indicator.render(pixel);
    }

    /// One loop iteration.
    pub fn tick(
        &mut self,
        now_ms: u32,
        buttons: &mut impl ButtonPort,
        link: &mut impl LinkPort,
        pixel: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        let mut edges: Vec<Edge, MAX_BUTTONS> = Vec::new();
        self.debouncer.poll(buttons, now_ms, |edge| {
            let _ = edges.push(edge);
        });
        for edge in edges {
            self.on_edge(edge, link, sink);
        }

        if self.heartbeat.poll(now_ms) && self.send(Command::Heartbeat, link, sink) {
            sink.emit(&LinkEvent::HeartbeatSent);
        }

        self.indicator.render(pixel);
    }

    fn on_edge(&mut self, edge: Edge, link: &mut impl LinkPort, sink: &mut impl EventSink) {
        let Some(binding) = self.config.buttons.get(edge.channel).copied() else {
            return;
        };
        let bit = 1u16 << edge.channel;

        if self.config.press_policy == PressPolicy::FirstPressedWins {
            if edge.pressed {
                if let Some(owner) = self.owner.filter(|&o| o != edge.channel) {
                    self.suppressed |= bit;
                    sink.emit(&LinkEvent::PressSuppressed { channel: edge.channel, owner });
                    return;
                }
                self.owner = Some(edge.channel);
            } else {
                if self.suppressed & bit != 0 {
                    self.suppressed &= !bit;
                    return;
                }
                if self.owner == Some(edge.channel) {
                    self.owner = None;
                }
            }
        }

        let profile = self.config.profile;
        let command = if edge.pressed {
            self.indicator.set_applied(palette_colour(binding.colour).unwrap_or(OFF));
            profile.press_command(&binding)
        } else {
            self.indicator.set_applied(OFF);
            profile.release_command(&binding)
        };

        if self.send(command, link, sink) {
            sink.emit(&LinkEvent::CommandSent {
                channel: edge.channel,
                pressed: edge.pressed,
                command,
            });
        }
        self.heartbeat.note_send(edge.at_ms);
    }

    /// Encode and hand one command to the radio.  Returns true when the
    /// radio accepted it.
    fn send(&self, command: Command, link: &mut impl LinkPort, sink: &mut impl EventSink) -> bool {
        let Some(packet) = self.config.profile.encode(command) else {
            return false;
        };
        match link.send(&packet) {
            Ok(()) => true,
            Err(error) => {
                sink.emit(&LinkEvent::SendFailed { command, error });
                false
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Debounced level of `channel`.
    pub fn is_pressed(&self, channel: usize) -> bool {
        self.debouncer.is_pressed(channel)
    }

    /// Colour the local pixel reflects.
    pub fn indicator_colour(&self) -> Rgb {
        self.indicator.output()
    }

    /// Button currently owning the link under first-pressed-wins.
    pub fn owner(&self) -> Option<usize> {
        self.owner
    }
}
