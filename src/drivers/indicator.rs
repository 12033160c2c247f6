//! Single-pixel indicator state with a lost-link overlay.
//!
//! Both endpoints drive one addressable pixel.  The transmitter shows the
//! colour of the button being held; the receiver shows whatever the last
//! command applied.  While the receiver's link is lost, an alert layer
//! takes over the pixel and the applied colour is kept underneath so it
//! comes back untouched once packets resume.
//!
//! ## Layers (highest first)
//!
//! | Layer   | Set by                 | Meaning                     |
//! |---------|------------------------|-----------------------------|
//! | Alert   | liveness blink         | red / off, toggled at 0.5 s |
//! | Applied | commands, button edges | palette colour or off       |

use crate::app::ports::IndicatorPort;

/// Colour as (R, G, B) tuple, each 0-255.
pub type Rgb = (u8, u8, u8);

pub const OFF: Rgb = (0, 0, 0);

/// Colour table shared by both endpoints, addressed by binding colour
/// index or by index-form packets.
pub const PALETTE: [Rgb; 6] = [
    (255, 0, 0),   // Red
    (0, 255, 0),   // Green
    (0, 0, 255),   // Blue
    (255, 255, 0), // Yellow
    (255, 0, 255), // Magenta
    (0, 255, 255), // Cyan
];

/// Blink colour while the link is lost.
pub const COLOUR_LINK_LOST: Rgb = (255, 0, 0);

/// Palette lookup; `None` for indices outside the table.
pub fn palette_colour(index: u8) -> Option<Rgb> {
    PALETTE.get(index as usize).copied()
}

/// Scale a colour by a 0-255 brightness.
pub fn scale(colour: Rgb, brightness: u8) -> Rgb {
    let br = brightness as u16;
    let (r, g, b) = colour;
    (
        ((r as u16 * br) / 255) as u8,
        ((g as u16 * br) / 255) as u8,
        ((b as u16 * br) / 255) as u8,
    )
}

/// Chooses what the pixel shows and commits only on change.
pub struct IndicatorMux {
    applied: Rgb,
    alert: Option<Rgb>,
    shown: Option<Rgb>,
}

impl IndicatorMux {
    pub const fn new() -> Self {
        Self {
            applied: OFF,
            alert: None,
            shown: None,
        }
    }

    /// Colour reflecting actual actuator/LED state.
    pub fn set_applied(&mut self, colour: Rgb) {
        self.applied = colour;
    }

    pub fn applied(&self) -> Rgb {
        self.applied
    }

    /// Override the pixel (`Some`) or hand it back to the applied layer.
    pub fn set_alert(&mut self, alert: Option<Rgb>) {
        self.alert = alert;
    }

    /// Colour the pixel should currently show.
    pub fn output(&self) -> Rgb {
        self.alert.unwrap_or(self.applied)
    }

    /// Push the current output to `port` if it differs from the last
    /// committed colour.  Returns true when the pixel was written.
    pub fn render(&mut self, port: &mut impl IndicatorPort) -> bool {
        let out = self.output();
        if self.shown == Some(out) {
            return false;
        }
        if out == OFF {
            port.off();
        } else {
            port.set_colour(out);
        }
        port.show();
        self.shown = Some(out);
        true
    }
}

impl Default for IndicatorMux {
    fn default() -> Self {
        Self::new()
    }
}
