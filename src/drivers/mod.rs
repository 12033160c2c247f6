//! Input, indicator and actuator drivers, plus hardware initialisation.

pub mod button;
pub mod hw_init;
pub mod indicator;
pub mod servo;
pub mod status_led;
