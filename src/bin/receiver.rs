//! Button-link receiver — servo / pixel end.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  EspNowListener ──▶ INBOX (static, SPSC)                │
//! │  ServoBank   StatusLed   LogEventSink                   │
//! │  (Actuator)  (Indicator) (EventSink)                    │
//! │                                                         │
//! │  ─────────────── Port Trait Boundary ───────────────    │
//! │                                                         │
//! │         ReceiverService (decode · liveness · blink)     │
//! └─────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use log::{error, info, warn};

use buttonlink::adapters::log_sink::LogEventSink;
use buttonlink::adapters::mac::{format_mac, read_mac};
use buttonlink::adapters::time::MonotonicClock;
use buttonlink::app::receiver::ReceiverService;
use buttonlink::config::{LinkConfig, ProtocolProfile};
use buttonlink::drivers::hw_init::{self, RadioSettings};
use buttonlink::drivers::servo::ServoBank;
use buttonlink::drivers::status_led::StatusLed;
use buttonlink::error::Error;
use buttonlink::link::espnow::{self, EspNowListener};
use buttonlink::link::inbox::Inbox;
use buttonlink::pins;

/// Handoff between the ESP-NOW receive callback and the main loop.
static INBOX: Inbox = Inbox::new();

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Button-link RX v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    let config = LinkConfig::load();
    if config.idle_link_will_blink() {
        warn!(
            "Config: heartbeat {} ms >= link timeout {} ms, idle link will blink",
            config.heartbeat_interval_ms, config.link_timeout_ms
        );
    }
    let loop_yield_ms = config.rx_loop_yield_ms;

    // ── 3. Local peripherals ──────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    let mut pixel = StatusLed::new(peripherals.rmt.channel0, peripherals.pins.gpio48, config.led_brightness)?;
    info!("Status pixel on GPIO {} (brightness {})", pins::LED_GPIO, config.led_brightness);

    let servo_count = match config.profile {
        ProtocolProfile::Direction => config.actuator_count as usize,
        ProtocolProfile::Index => 0,
    };
    let mut servos = match hw_init::init_servo_ledc(servo_count, pins::SERVO_PULSE_STOP_US) {
        Ok(()) => ServoBank::new(servo_count),
        Err(e) => {
            error!("Servo init failed: {} — continuing without servos", e);
            ServoBank::new(0)
        }
    };

    // ── 4. Radio + ESP-NOW (fatal on failure) ─────────────────
    let _wifi = espnow::start_wifi(peripherals.modem, sysloop)?;
    let radio = RadioSettings {
        channel: config.channel,
        tx_power_quarter_dbm: None,
        power_save: false,
    };
    if let Err(e) = hw_init::configure_radio(radio) {
        error!("{}: {} — halting", Error::Init("radio"), e);
        halt();
    }
    let _listener = match EspNowListener::new(&INBOX) {
        Ok(listener) => listener,
        Err(e) => {
            error!("{} — halting", Error::from(e));
            halt();
        }
    };
    info!("Receiver MAC Address: {}", format_mac(&read_mac()));

    // ── 5. Service ────────────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    let mut service = ReceiverService::new(config);
    service.start(clock.now_ms(), &INBOX, &mut servos, &mut pixel, &mut sink);
    info!("Initialization complete ({} s after boot)", clock.uptime_secs());

    // ── 6. Main loop ──────────────────────────────────────────
    loop {
        service.tick(clock.now_ms(), &INBOX, &mut servos, &mut pixel, &mut sink);
        FreeRtos::delay_ms(loop_yield_ms);
    }
}

/// Park the main task after a fatal init error.
fn halt() -> ! {
    loop {
        FreeRtos::delay_ms(1000);
    }
}
