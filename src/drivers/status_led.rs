//! WS2812 status pixel driver.
//!
//! One addressable LED on the RMT peripheral.  Colours are staged with
//! `set_colour` / `off` and latched with `show`; global brightness is
//! applied at latch time so callers always work in full-scale palette
//! colours.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the pixel through `ws2812-esp32-rmt-driver`.
//! On host/test: tracks state in-memory only.

#[cfg(target_os = "espidf")]
use esp_idf_hal::{gpio::OutputPin, peripheral::Peripheral, rmt::RmtChannel};
#[cfg(target_os = "espidf")]
use smart_leds::{SmartLedsWrite, RGB8};
#[cfg(target_os = "espidf")]
use ws2812_esp32_rmt_driver::Ws2812Esp32Rmt;

use crate::app::ports::IndicatorPort;
use crate::drivers::indicator::{scale, Rgb, OFF};

pub struct StatusLed {
    #[cfg(target_os = "espidf")]
    driver: Ws2812Esp32Rmt<'static>,
    brightness: u8,
    staged: Rgb,
    current: Rgb,
}

impl StatusLed {
    #[cfg(target_os = "espidf")]
    pub fn new<C: RmtChannel>(
        channel: impl Peripheral<P = C> + 'static,
        pin: impl Peripheral<P = impl OutputPin> + 'static,
        brightness: u8,
    ) -> anyhow::Result<Self> {
        let driver = Ws2812Esp32Rmt::new(channel, pin)?;
        let mut led = Self {
            driver,
            brightness,
            staged: OFF,
            current: OFF,
        };
        led.show();
        Ok(led)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(brightness: u8) -> Self {
        Self {
            brightness,
            staged: OFF,
            current: OFF,
        }
    }

    /// Last latched colour, before brightness scaling.
    pub fn current_colour(&self) -> Rgb {
        self.current
    }

    /// Colour actually driven onto the pixel.
    pub fn output_colour(&self) -> Rgb {
        scale(self.current, self.brightness)
    }

    #[cfg(target_os = "espidf")]
    fn latch(&mut self, (r, g, b): Rgb) {
        if let Err(e) = self.driver.write(core::iter::once(RGB8::new(r, g, b))) {
            log::warn!("status_led: RMT write failed: {:?}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn latch(&mut self, _rgb: Rgb) {}
}

impl IndicatorPort for StatusLed {
    fn set_colour(&mut self, colour: Rgb) {
        self.staged = colour;
    }

    fn off(&mut self) {
        self.staged = OFF;
    }

    fn show(&mut self) {
        self.current = self.staged;
        self.latch(self.output_colour());
    }
}
