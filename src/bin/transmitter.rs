//! Button-link transmitter — handheld remote.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  ButtonBank   StatusLed   EspNowLink   LogEventSink     │
//! │  (ButtonPort) (Indicator) (LinkPort)   (EventSink)      │
//! │                                                         │
//! │  ─────────────── Port Trait Boundary ───────────────    │
//! │                                                         │
//! │        TransmitterService (debounce · encode ·          │
//! │                            heartbeat)                   │
//! └─────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use log::{error, info, warn};

use buttonlink::adapters::log_sink::LogEventSink;
use buttonlink::adapters::mac::format_mac;
use buttonlink::adapters::time::MonotonicClock;
use buttonlink::app::transmitter::TransmitterService;
use buttonlink::config::LinkConfig;
use buttonlink::drivers::button::ButtonBank;
use buttonlink::drivers::hw_init::{self, RadioSettings};
use buttonlink::drivers::status_led::StatusLed;
use buttonlink::error::Error;
use buttonlink::link::espnow::{self, EspNowLink};
use buttonlink::link::transport::DELIVERY;
use buttonlink::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Button-link TX v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    let config = LinkConfig::load();
    if config.idle_link_will_blink() {
        warn!(
            "Config: heartbeat {} ms >= link timeout {} ms, receiver will blink while idle",
            config.heartbeat_interval_ms, config.link_timeout_ms
        );
    }
    let loop_yield_ms = config.tx_loop_yield_ms;

    // ── 3. Local peripherals ──────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    let mut pixel = StatusLed::new(peripherals.rmt.channel0, peripherals.pins.gpio48, config.led_brightness)?;
    info!("Status pixel on GPIO {} (brightness {})", pins::LED_GPIO, config.led_brightness);

    let mut buttons = ButtonBank::new();
    for binding in &config.buttons {
        // SAFETY: validated config binds each GPIO at most once and none
        // of them is claimed through `peripherals.pins`.
        let mut pin = PinDriver::input(unsafe { AnyIOPin::new(binding.gpio) })?;
        pin.set_pull(Pull::Up)?;
        if buttons.push(pin).is_err() {
            warn!("Buttons: GPIO {} beyond bank capacity, ignored", binding.gpio);
        }
    }
    info!("Buttons: {} inputs, active-low with pull-up", config.buttons.len());

    // ── 4. Radio + ESP-NOW (fatal on failure) ─────────────────
    let _wifi = espnow::start_wifi(peripherals.modem, sysloop)?;
    let radio = RadioSettings {
        channel: config.channel,
        tx_power_quarter_dbm: Some(config.tx_power_quarter_dbm),
        power_save: config.radio_power_save,
    };
    if let Err(e) = hw_init::configure_radio(radio) {
        error!("{}: {} — halting", Error::Init("radio"), e);
        halt();
    }
    let mut link = match EspNowLink::new(config.peer_mac, config.channel) {
        Ok(link) => link,
        Err(e) => {
            error!("{} — halting", Error::from(e));
            halt();
        }
    };
    info!("Peer MAC Address: {}", format_mac(&config.peer_mac));

    // ── 5. Service ────────────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    let mut service = TransmitterService::new(config);
    service.start(clock.now_ms(), &mut buttons, &mut pixel, &mut sink);
    info!("Initialization complete ({} s after boot)", clock.uptime_secs());

    // ── 6. Main loop ──────────────────────────────────────────
    let mut reported_failures = 0;
    loop {
        service.tick(clock.now_ms(), &mut buttons, &mut link, &mut pixel, &mut sink);

        let failures = DELIVERY.failed();
        if failures != reported_failures && failures % 10 == 0 {
            warn!("LINK | {} deliveries failed, {} succeeded", failures, DELIVERY.delivered());
        }
        reported_failures = failures;

        FreeRtos::delay_ms(loop_yield_ms);
    }
}

/// Park the main task after a fatal init error.
fn halt() -> ! {
    loop {
        FreeRtos::delay_ms(1000);
    }
}
