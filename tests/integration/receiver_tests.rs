//! Receiver service against a real inbox and mock servos / pixel.

use buttonlink::app::events::LinkEvent;
use buttonlink::app::receiver::ReceiverService;
use buttonlink::config::LinkConfig;
use buttonlink::drivers::indicator::{COLOUR_LINK_LOST, OFF, PALETTE};
use buttonlink::error::DecodeError;
use buttonlink::link::inbox::{Inbox, INBOX_DEPTH};
use buttonlink::link::liveness::LinkState;
use buttonlink::protocol::{Command, Direction};

use crate::mock_hw::{MockPixel, MockServos, RecordingSink, ServoCall};

struct Rig {
    svc: ReceiverService,
    inbox: Inbox,
    servos: MockServos,
    pixel: MockPixel,
    sink: RecordingSink,
}

impl Rig {
    fn new(config: LinkConfig) -> Self {
        let mut rig = Self {
            svc: ReceiverService::new(config),
            inbox: Inbox::new(),
            servos: MockServos::new(),
            pixel: MockPixel::new(),
            sink: RecordingSink::new(),
        };
        rig.svc
            .start(0, &rig.inbox, &mut rig.servos, &mut rig.pixel, &mut rig.sink);
        rig
    }

    fn deliver(&mut self, at_ms: u32, payload: &[u8]) {
        self.inbox.record(at_ms, payload);
        self.tick(at_ms);
    }

    fn tick(&mut self, now_ms: u32) {
        self.svc
            .tick(now_ms, &self.inbox, &mut self.servos, &mut self.pixel, &mut self.sink);
    }
}

fn direction_rig() -> Rig {
    Rig::new(LinkConfig::direction_profile())
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_stops_servos_and_blanks_pixel() {
    let rig = direction_rig();
    assert_eq!(rig.servos.calls, vec![ServoCall::StopAll]);
    assert_eq!(rig.pixel.shown, OFF);
    assert_eq!(rig.svc.link_state(), LinkState::Connected);
}

// ── Direction form ────────────────────────────────────────────

#[test]
fn drive_runs_servo_and_shows_binding_colour() {
    let mut rig = direction_rig();
    rig.deliver(10, &[1, 0xFF]);

    assert_eq!(rig.servos.drives(), vec![(1, Direction::Reverse)]);
    assert_eq!(rig.pixel.shown, PALETTE[2]);
    assert!(rig.sink.events.contains(&LinkEvent::CommandApplied {
        command: Command::Drive {
            actuator: 1,
            direction: Direction::Reverse
        }
    }));
}

#[test]
fn stop_falls_back_to_colour_of_servo_still_running() {
    let mut rig = direction_rig();
    rig.deliver(10, &[0, 1]);
    rig.deliver(20, &[1, 0xFF]);
    assert_eq!(rig.svc.applied_colour(), PALETTE[2]);

    rig.deliver(30, &[1, 0]);
    assert_eq!(rig.svc.applied_colour(), PALETTE[1]);

    rig.deliver(40, &[0, 0]);
    assert_eq!(rig.svc.applied_colour(), OFF);
    assert_eq!(rig.pixel.shown, OFF);
}

#[test]
fn unknown_actuator_is_ignored() {
    let mut rig = direction_rig();
    rig.deliver(10, &[3, 1]);

    assert!(rig.servos.drives().is_empty());
    assert_eq!(rig.sink.count(|e| matches!(e, LinkEvent::CommandIgnored { .. })), 1);
    assert_eq!(rig.svc.last_packet_ms(), 10);
}

#[test]
fn wrong_length_is_discarded_but_counts_as_alive() {
    let mut rig = direction_rig();
    rig.deliver(0, &[0, 1]);
    let shows = rig.pixel.show_count();

    rig.deliver(1400, &[0, 1, 0]);
    assert!(rig.sink.events.contains(&LinkEvent::PacketDiscarded {
        at_ms: 1400,
        len: 3,
        error: DecodeError::Length { expected: 2, actual: 3 },
    }));
    assert_eq!(rig.servos.drives().len(), 1);
    assert_eq!(rig.pixel.show_count(), shows);
    assert_eq!(rig.svc.last_packet_ms(), 1400);

    rig.tick(2000);
    assert_eq!(rig.svc.link_state(), LinkState::Connected);
}

#[test]
fn oversized_frame_reports_true_length() {
    let mut rig = direction_rig();
    rig.deliver(5, &[0u8; 20]);
    assert!(rig.sink.events.contains(&LinkEvent::PacketDiscarded {
        at_ms: 5,
        len: 20,
        error: DecodeError::Length { expected: 2, actual: 20 },
    }));
}

#[test]
fn invalid_direction_is_discarded() {
    let mut rig = direction_rig();
    rig.deliver(10, &[0, 5]);
    assert!(rig.servos.drives().is_empty());
    assert!(rig.sink.events.contains(&LinkEvent::PacketDiscarded {
        at_ms: 10,
        len: 2,
        error: DecodeError::InvalidDirection(5),
    }));
}

#[test]
fn heartbeat_never_changes_actuators_or_pixel() {
    let mut rig = direction_rig();
    rig.deliver(10, &[2, 1]);
    let shows = rig.pixel.show_count();

    rig.deliver(20, &[255, 0]);
    rig.deliver(30, &[255]);

    assert_eq!(rig.servos.drives().len(), 1);
    assert_eq!(rig.svc.applied_colour(), PALETTE[5]);
    assert_eq!(rig.pixel.show_count(), shows);
    assert_eq!(rig.sink.count(|e| *e == LinkEvent::HeartbeatReceived), 2);
    assert_eq!(rig.svc.last_packet_ms(), 30);
}

// ── Liveness ──────────────────────────────────────────────────

#[test]
fn timeout_is_strictly_after_last_packet() {
    let mut rig = direction_rig();
    rig.deliver(0, &[255, 0]);
    rig.deliver(1000, &[255, 0]);

    rig.tick(2499);
    assert_eq!(rig.svc.link_state(), LinkState::Connected);
    rig.tick(2500);
    assert_eq!(rig.svc.link_state(), LinkState::Connected);
    rig.tick(2501);
    assert_eq!(rig.svc.link_state(), LinkState::Lost);
    assert!(rig.sink.events.contains(&LinkEvent::LinkStateChanged {
        from: LinkState::Connected,
        to: LinkState::Lost,
        elapsed_ms: 1501,
    }));
}

#[test]
fn silence_from_boot_is_lost_after_timeout() {
    let mut rig = direction_rig();
    rig.tick(1500);
    assert_eq!(rig.svc.link_state(), LinkState::Connected);
    rig.tick(1501);
    assert_eq!(rig.svc.link_state(), LinkState::Lost);
}

#[test]
fn lost_link_blinks_red_and_hides_applied_colour() {
    let mut rig = direction_rig();
    rig.deliver(0, &[0, 1]);
    assert_eq!(rig.pixel.shown, PALETTE[1]);

    rig.tick(1501);
    assert_eq!(rig.pixel.shown, COLOUR_LINK_LOST);
    rig.tick(2000);
    assert_eq!(rig.pixel.shown, COLOUR_LINK_LOST);
    rig.tick(2001);
    assert_eq!(rig.pixel.shown, OFF);
    rig.tick(2501);
    assert_eq!(rig.pixel.shown, COLOUR_LINK_LOST);
    rig.tick(3001);
    assert_eq!(rig.pixel.shown, OFF);

    // The servo is untouched by the outage and the colour is kept.
    assert_eq!(rig.servos.drives().len(), 1);
    assert_eq!(rig.svc.applied_colour(), PALETTE[1]);
}

#[test]
fn lost_is_reported_once_per_outage() {
    let mut rig = direction_rig();
    for t in (1501..6000).step_by(10) {
        rig.tick(t);
    }
    let lost = rig.sink.count(|e| {
        matches!(e, LinkEvent::LinkStateChanged { to: LinkState::Lost, .. })
    });
    assert_eq!(lost, 1);
}

#[test]
fn any_packet_restores_link_and_applied_colour() {
    let mut rig = direction_rig();
    rig.deliver(0, &[2, 0xFF]);
    rig.tick(1501);
    assert_eq!(rig.svc.link_state(), LinkState::Lost);

    rig.deliver(3000, &[255, 0]);
    assert_eq!(rig.svc.link_state(), LinkState::Connected);
    assert_eq!(rig.pixel.shown, PALETTE[4]);
    assert!(rig.sink.events.contains(&LinkEvent::LinkStateChanged {
        from: LinkState::Lost,
        to: LinkState::Connected,
        elapsed_ms: 1499,
    }));
}

#[test]
fn malformed_packet_also_restores_link() {
    let mut rig = direction_rig();
    rig.tick(1501);
    rig.deliver(2000, &[9]);
    assert_eq!(rig.svc.link_state(), LinkState::Connected);
}

// ── Index form ────────────────────────────────────────────────

#[test]
fn index_form_sets_and_clears_colour() {
    let mut rig = Rig::new(LinkConfig::index_profile());
    rig.deliver(10, &[2]);
    assert_eq!(rig.pixel.shown, PALETTE[2]);

    rig.deliver(20, &[0xFF]);
    assert_eq!(rig.pixel.shown, OFF);

    rig.deliver(30, &[4]);
    rig.deliver(40, &[6]);
    assert_eq!(rig.pixel.shown, OFF);
    assert!(rig.servos.drives().is_empty());
}

#[test]
fn index_form_ignores_unknown_colour() {
    let mut rig = Rig::new(LinkConfig::index_profile());
    rig.deliver(10, &[1]);
    rig.deliver(20, &[9]);

    assert_eq!(rig.svc.applied_colour(), PALETTE[1]);
    assert!(rig.sink.events.contains(&LinkEvent::CommandIgnored {
        command: Command::SetColour(9)
    }));
}

#[test]
fn index_form_heartbeat_and_bad_length() {
    let mut rig = Rig::new(LinkConfig::index_profile());
    rig.deliver(10, &[3]);
    rig.deliver(20, &[0xFE]);
    rig.deliver(30, &[1, 2]);

    assert_eq!(rig.svc.applied_colour(), PALETTE[3]);
    assert_eq!(rig.sink.count(|e| *e == LinkEvent::HeartbeatReceived), 1);
    assert_eq!(rig.sink.count(|e| matches!(e, LinkEvent::PacketDiscarded { .. })), 1);
}

// ── Inbox ─────────────────────────────────────────────────────

#[test]
fn burst_beyond_inbox_depth_is_reported() {
    let mut rig = direction_rig();
    for i in 0..(INBOX_DEPTH as u32 + 2) {
        rig.inbox.record(i, &[255, 0]);
    }
    rig.tick(20);

    assert!(rig.sink.events.contains(&LinkEvent::InboxOverflow { dropped: 2 }));
    assert_eq!(
        rig.sink.count(|e| *e == LinkEvent::HeartbeatReceived),
        INBOX_DEPTH
    );
    assert_eq!(rig.svc.last_packet_ms(), INBOX_DEPTH as u32 + 1);
}
