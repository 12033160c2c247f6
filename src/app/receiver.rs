//! Receiver service — packets in, servos and pixel out.
//!
//! [`ReceiverService`] owns the liveness monitor and everything the pixel
//! can show.  The radio callback only records frames into the
//! [`Inbox`]; all decoding and state changes happen here, on the main
//! loop.
//!
//! ```text
//!    Inbox ──▶ ┌────────────────────────┐ ──▶ ActuatorPort
//!              │    ReceiverService      │
//!              │ Decoder · Liveness      │ ──▶ IndicatorPort
//!              └────────────────────────┘ ──▶ EventSink
//! ```
//!
//! ## Per-tick order
//!
//! 1. New arrivals (any payload, even dropped or malformed) feed liveness.
//! 2. Queued frames are decoded and applied, oldest first.
//! 3. Silence is checked against the timeout.
//! 4. The lost-link blink advances and the pixel is committed.

use crate::config::{LinkConfig, MAX_ACTUATORS};
use crate::drivers::indicator::{palette_colour, IndicatorMux, Rgb, COLOUR_LINK_LOST, OFF};
use crate::error::DecodeError;
use crate::link::inbox::{InboundFrame, Inbox};
use crate::link::liveness::{LinkState, LinkTransition, LivenessMonitor};
use crate::protocol::{Command, Direction};

use super::events::{LinkEvent, Role};
use super::ports::{ActuatorPort, EventSink, IndicatorPort};

pub struct ReceiverService {
    config: LinkConfig,
    liveness: LivenessMonitor,
    indicator: IndicatorMux,
    /// Colour of each servo while it runs (direction profile).
    running: [Option<Rgb>; MAX_ACTUATORS],
    seen_arrivals: u32,
    seen_dropped: u32,
}

impl ReceiverService {
    /// Call [`start`](Self::start) before the first tick.
    pub fn new(config: LinkConfig) -> Self {
        let liveness = LivenessMonitor::new(0, config.link_timeout_ms, config.blink_period_ms);
        Self {
            config,
            liveness,
            indicator: IndicatorMux::new(),
            running: [None; MAX_ACTUATORS],
            seen_arrivals: 0,
            seen_dropped: 0,
        }
    }

    /// Stop every servo, blank the pixel and start the silence clock at
    /// `now_ms`.  The link starts out CONNECTED.
    pub fn start(
        &mut self,
        now_ms: u32,
        inbox: &Inbox,
        actuators: &mut impl ActuatorPort,
        pixel: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        self.liveness = LivenessMonitor::new(now_ms, self.config.link_timeout_ms, self.config.blink_period_ms);
        self.seen_arrivals = inbox.arrivals();
        self.seen_dropped = inbox.dropped();
        self.running = [None; MAX_ACTUATORS];

        actuators.stop_all();
        self.indicator.set_applied(OFF);
        self.indicator.set_alert(None);
        self.indicator.render(pixel);

        sink.emit(&LinkEvent::Started {
            role: Role::Receiver,
            profile: self.config.profile,
        });
    }

    /// One loop iteration.
    pub fn tick(
        &mut self,
        now_ms: u32,
        inbox: &Inbox,
        actuators: &mut impl ActuatorPort,
        pixel: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        let arrivals = inbox.arrivals();
        if arrivals != self.seen_arrivals {
            self.seen_arrivals = arrivals;
            let transition = self.liveness.on_packet(inbox.last_arrival_ms());
            self.report(transition, sink);
        }

        let dropped = inbox.dropped();
        if dropped != self.seen_dropped {
            self.seen_dropped = dropped;
            sink.emit(&LinkEvent::InboxOverflow { dropped });
        }

        while let Some(frame) = inbox.take() {
            self.on_frame(&frame, actuators, sink);
        }

        let transition = self.liveness.check_timeout(now_ms);
        self.report(transition, sink);
        self.liveness.advance_blink(now_ms);

        let alert = match self.liveness.state() {
            LinkState::Connected => None,
            LinkState::Lost if self.liveness.blink_on() => Some(COLOUR_LINK_LOST),
            LinkState::Lost => Some(OFF),
        };
        self.indicator.set_alert(alert);
        self.indicator.render(pixel);
    }

    /// Decode one frame and apply it.  Liveness is not touched here;
    /// arrival alone already counted in [`tick`](Self::tick).
    pub fn on_frame(&mut self, frame: &InboundFrame, actuators: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let command = match self.config.profile.decode(frame.payload()) {
            Ok(command) => command,
            Err(error) => {
                // The decoder only saw the stored prefix of an oversized frame.
                let error = match error {
                    DecodeError::Length { expected, .. } if frame.truncated() => DecodeError::Length {
                        expected,
                        actual: frame.len(),
                    },
                    other => other,
                };
                sink.emit(&LinkEvent::PacketDiscarded {
                    at_ms: frame.at_ms,
                    len: frame.len(),
                    error,
                });
                return;
            }
        };

        let applied = match command {
            Command::Heartbeat => {
                sink.emit(&LinkEvent::HeartbeatReceived);
                return;
            }
            Command::Drive { actuator, direction } => self.apply_drive(actuator, direction, actuators),
            Command::SetColour(index) => match palette_colour(index) {
                Some(colour) => {
                    self.indicator.set_applied(colour);
                    true
                }
                None => false,
            },
            Command::AllOff => {
                self.indicator.set_applied(OFF);
                true
            }
        };

        if applied {
            sink.emit(&LinkEvent::CommandApplied { command });
        } else {
            sink.emit(&LinkEvent::CommandIgnored { command });
        }
    }

    fn apply_drive(&mut self, actuator: u8, direction: Direction, actuators: &mut impl ActuatorPort) -> bool {
        let index = actuator as usize;
        if actuator >= self.config.actuator_count || index >= MAX_ACTUATORS {
            return false;
        }
        actuators.drive(actuator, direction);

        if direction == Direction::Stop {
            self.running[index] = None;
            let still_running = self.running.iter().flatten().next().copied();
            self.indicator.set_applied(still_running.unwrap_or(OFF));
            return true;
        }

        // Show the colour of the button that commands this motion, if any.
        let colour = self
            .config
            .buttons
            .iter()
            .find(|b| b.actuator == actuator && b.direction == direction.as_i8())
            .and_then(|b| palette_colour(b.colour));
        self.running[index] = colour;
        if let Some(colour) = colour {
            self.indicator.set_applied(colour);
        }
        true
    }

    fn report(&self, transition: Option<LinkTransition>, sink: &mut impl EventSink) {
        let event = match transition {
            Some(LinkTransition::Lost { idle_ms }) => LinkEvent::LinkStateChanged {
                from: LinkState::Connected,
                to: LinkState::Lost,
                elapsed_ms: idle_ms,
            },
            Some(LinkTransition::Restored { down_ms }) => LinkEvent::LinkStateChanged {
                from: LinkState::Lost,
                to: LinkState::Connected,
                elapsed_ms: down_ms,
            },
            None => return,
        };
        sink.emit(&event);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn link_state(&self) -> LinkState {
        self.liveness.state()
    }

    pub fn last_packet_ms(&self) -> u32 {
        self.liveness.last_packet_ms()
    }

    /// Colour reflecting actuator / command state, ignoring the blink.
    pub fn applied_colour(&self) -> Rgb {
        self.indicator.applied()
    }

    /// Colour the pixel currently shows.
    pub fn indicator_colour(&self) -> Rgb {
        self.indicator.output()
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }
}
