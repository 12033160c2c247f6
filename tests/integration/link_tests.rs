//! End-to-end: transmitter packets looped straight into a receiver inbox.

use std::cell::Cell;

use buttonlink::app::ports::LinkPort;
use buttonlink::app::receiver::ReceiverService;
use buttonlink::app::transmitter::TransmitterService;
use buttonlink::config::LinkConfig;
use buttonlink::drivers::indicator::{COLOUR_LINK_LOST, OFF, PALETTE};
use buttonlink::error::TransportError;
use buttonlink::link::inbox::Inbox;
use buttonlink::link::liveness::LinkState;
use buttonlink::protocol::Direction;

use crate::mock_hw::{MockButtons, MockPixel, MockServos, RecordingSink};

/// Delivers every accepted payload into `inbox`, stamped with the shared
/// clock.  `drop_all` simulates the receiver being out of range.
struct Loopback<'a> {
    inbox: &'a Inbox,
    clock: &'a Cell<u32>,
    drop_all: bool,
}

impl LinkPort for Loopback<'_> {
    fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        if !self.drop_all {
            self.inbox.record(self.clock.get(), payload);
        }
        Ok(())
    }
}

struct Pair<'a> {
    clock: &'a Cell<u32>,
    tx: TransmitterService,
    rx: ReceiverService,
    buttons: MockButtons,
    link: Loopback<'a>,
    tx_pixel: MockPixel,
    rx_pixel: MockPixel,
    servos: MockServos,
    sink: RecordingSink,
}

impl<'a> Pair<'a> {
    fn new(config: LinkConfig, inbox: &'a Inbox, clock: &'a Cell<u32>) -> Self {
        let mut pair = Self {
            clock,
            tx: TransmitterService::new(config.clone()),
            rx: ReceiverService::new(config.clone()),
            buttons: MockButtons::new(config.buttons.len()),
            link: Loopback {
                inbox,
                clock,
                drop_all: false,
            },
            tx_pixel: MockPixel::new(),
            rx_pixel: MockPixel::new(),
            servos: MockServos::new(),
            sink: RecordingSink::new(),
        };
        let now = clock.get();
        pair.tx
            .start(now, &mut pair.buttons, &mut pair.tx_pixel, &mut pair.sink);
        pair.rx
            .start(now, inbox, &mut pair.servos, &mut pair.rx_pixel, &mut pair.sink);
        pair
    }

    /// Run both loops every `step_ms` until `until_ms`.
    fn run_until(&mut self, until_ms: u32, step_ms: u32) {
        while self.clock.get() < until_ms {
            let now = self.clock.get() + step_ms;
            self.clock.set(now);
            self.tx.tick(
                now,
                &mut self.buttons,
                &mut self.link,
                &mut self.tx_pixel,
                &mut self.sink,
            );
            self.rx
                .tick(now, self.link.inbox, &mut self.servos, &mut self.rx_pixel, &mut self.sink);
        }
    }
}

#[test]
fn press_and_release_reach_the_servo() {
    let inbox = Inbox::new();
    let clock = Cell::new(0);
    let mut pair = Pair::new(LinkConfig::direction_profile(), &inbox, &clock);

    pair.buttons.press(5);
    pair.run_until(200, 1);
    assert_eq!(pair.servos.drives(), vec![(2, Direction::Forward)]);
    assert_eq!(pair.rx_pixel.shown, PALETTE[5]);
    assert_eq!(pair.tx_pixel.shown, PALETTE[5]);

    pair.buttons.release(5);
    pair.run_until(400, 1);
    assert_eq!(
        pair.servos.drives(),
        vec![(2, Direction::Forward), (2, Direction::Stop)]
    );
    assert_eq!(pair.rx_pixel.shown, OFF);
}

#[test]
fn index_profile_mirrors_colour() {
    let inbox = Inbox::new();
    let clock = Cell::new(0);
    let mut pair = Pair::new(LinkConfig::index_profile(), &inbox, &clock);

    pair.buttons.press(1);
    pair.run_until(100, 5);
    assert_eq!(pair.rx_pixel.shown, PALETTE[1]);

    pair.buttons.release(1);
    pair.run_until(300, 5);
    assert_eq!(pair.rx_pixel.shown, OFF);
}

#[test]
fn heartbeat_interval_below_timeout_keeps_idle_link_connected() {
    let inbox = Inbox::new();
    let clock = Cell::new(0);
    let mut config = LinkConfig::direction_profile();
    config.heartbeat_interval_ms = 1000;
    assert!(!config.idle_link_will_blink());
    let mut pair = Pair::new(config, &inbox, &clock);

    pair.run_until(20_000, 10);
    assert_eq!(pair.rx.link_state(), LinkState::Connected);
    assert_eq!(pair.servos.drives().len(), 0);
}

#[test]
fn default_timing_blinks_between_heartbeats() {
    let inbox = Inbox::new();
    let clock = Cell::new(0);
    let config = LinkConfig::direction_profile();
    assert!(config.idle_link_will_blink());
    let mut pair = Pair::new(config, &inbox, &clock);

    pair.run_until(1600, 10);
    assert_eq!(pair.rx.link_state(), LinkState::Lost);

    // First heartbeat goes out once 5 s have strictly passed.
    pair.run_until(5010, 10);
    assert_eq!(pair.rx.link_state(), LinkState::Connected);
    assert_eq!(pair.rx.last_packet_ms(), 5010);
}

#[test]
fn out_of_range_receiver_blinks_until_traffic_returns() {
    let inbox = Inbox::new();
    let clock = Cell::new(0);
    let mut config = LinkConfig::direction_profile();
    config.heartbeat_interval_ms = 1000;
    let mut pair = Pair::new(config, &inbox, &clock);

    pair.buttons.press(0);
    pair.run_until(100, 10);
    assert_eq!(pair.rx_pixel.shown, PALETTE[0]);

    pair.link.drop_all = true;
    pair.run_until(3000, 10);
    assert_eq!(pair.rx.link_state(), LinkState::Lost);
    let shown = pair.rx_pixel.shown;
    assert!(shown == COLOUR_LINK_LOST || shown == OFF);
    assert_eq!(pair.rx.applied_colour(), PALETTE[0]);

    pair.link.drop_all = false;
    pair.run_until(4500, 10);
    assert_eq!(pair.rx.link_state(), LinkState::Connected);
    assert_eq!(pair.rx_pixel.shown, PALETTE[0]);
}

#[test]
fn clock_wrap_does_not_trip_timeout() {
    let inbox = Inbox::new();
    let start = u32::MAX - 500;
    let clock = Cell::new(start);
    let mut config = LinkConfig::direction_profile();
    config.heartbeat_interval_ms = 1000;
    let mut pair = Pair::new(config, &inbox, &clock);

    // Step across the wrap in small increments.
    for _ in 0..300 {
        let now = pair.clock.get().wrapping_add(10);
        pair.clock.set(now);
        pair.tx.tick(
            now,
            &mut pair.buttons,
            &mut pair.link,
            &mut pair.tx_pixel,
            &mut pair.sink,
        );
        pair.rx
            .tick(now, &inbox, &mut pair.servos, &mut pair.rx_pixel, &mut pair.sink);
    }
    assert_eq!(pair.rx.link_state(), LinkState::Connected);
}
