//! Fuzz target: inbound packet path
//!
//! Feeds arbitrary datagrams through both wire decoders and then through
//! a receiver service.  Nothing may panic, and a decoded command other
//! than a heartbeat must have come from an exact-length packet.
//!
//! cargo fuzz run fuzz_packet_decoder

#![no_main]

use buttonlink::app::events::LinkEvent;
use buttonlink::app::ports::{ActuatorPort, EventSink, IndicatorPort};
use buttonlink::app::receiver::ReceiverService;
use buttonlink::config::{LinkConfig, ProtocolProfile};
use buttonlink::drivers::indicator::Rgb;
use buttonlink::link::inbox::Inbox;
use buttonlink::protocol::{Command, Direction};
use libfuzzer_sys::fuzz_target;

struct Null;

impl ActuatorPort for Null {
    fn drive(&mut self, _actuator: u8, _direction: Direction) {}
    fn stop_all(&mut self) {}
}

impl IndicatorPort for Null {
    fn set_colour(&mut self, _colour: Rgb) {}
    fn off(&mut self) {}
    fn show(&mut self) {}
}

impl EventSink for Null {
    fn emit(&mut self, _event: &LinkEvent) {}
}

fuzz_target!(|data: &[u8]| {
    for profile in [ProtocolProfile::Direction, ProtocolProfile::Index] {
        if let Ok(cmd) = profile.decode(data) {
            if cmd != Command::Heartbeat {
                assert_eq!(data.len(), profile.packet_len());
            }
        }
    }

    // Split the input into datagrams on a length prefix and push them
    // through a live receiver.
    let inbox = Inbox::new();
    let mut rx = ReceiverService::new(LinkConfig::direction_profile());
    let (mut servos, mut pixel, mut sink) = (Null, Null, Null);
    rx.start(0, &inbox, &mut servos, &mut pixel, &mut sink);

    let mut rest = data;
    let mut now = 0u32;
    while let Some((&len, tail)) = rest.split_first() {
        let take = (len as usize % 16).min(tail.len());
        let (frame, next) = tail.split_at(take);
        now = now.wrapping_add(u32::from(len));
        inbox.record(now, frame);
        rx.tick(now, &inbox, &mut servos, &mut pixel, &mut sink);
        rest = next;
    }
});
