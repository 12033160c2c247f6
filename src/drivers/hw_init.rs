//! One-shot hardware peripheral initialization.
//!
//! Tunes the radio after the Wi-Fi driver has started and configures the
//! LEDC timer/channels for the receiver's servos, using raw ESP-IDF sys
//! calls.  Called once from `main()` before the loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    ChannelSetFailed(i32),
    TxPowerFailed(i32),
    PowerSaveFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ChannelSetFailed(rc) => write!(f, "Wi-Fi channel set failed (rc={})", rc),
            Self::TxPowerFailed(rc)    => write!(f, "TX power set failed (rc={})", rc),
            Self::PowerSaveFailed(rc)  => write!(f, "power-save mode set failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── Radio ─────────────────────────────────────────────────────

/// Radio settings applied after the Wi-Fi driver is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioSettings {
    pub channel: u8,
    /// Max TX power in 0.25 dBm steps; `None` keeps the driver default.
    pub tx_power_quarter_dbm: Option<i8>,
    pub power_save: bool,
}

#[cfg(target_os = "espidf")]
pub fn configure_radio(settings: RadioSettings) -> Result<(), HwInitError> {
    // SAFETY: Wi-Fi driver is started and owned by main(); these calls only
    // change driver parameters and are made before any ESP-NOW traffic.
    unsafe {
        let ret = esp_wifi_set_channel(settings.channel, wifi_second_chan_t_WIFI_SECOND_CHAN_NONE);
        if ret != ESP_OK as i32 { return Err(HwInitError::ChannelSetFailed(ret)); }

        let ps = if settings.power_save {
            wifi_ps_type_t_WIFI_PS_MIN_MODEM
        } else {
            wifi_ps_type_t_WIFI_PS_NONE
        };
        let ret = esp_wifi_set_ps(ps);
        if ret != ESP_OK as i32 { return Err(HwInitError::PowerSaveFailed(ret)); }

        if let Some(power) = settings.tx_power_quarter_dbm {
            let ret = esp_wifi_set_max_tx_power(power);
            if ret != ESP_OK as i32 { return Err(HwInitError::TxPowerFailed(ret)); }
        }
    }
    info!(
        "hw_init: radio ch={} tx_power={:?}q-dBm power_save={}",
        settings.channel, settings.tx_power_quarter_dbm, settings.power_save
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn configure_radio(settings: RadioSettings) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): radio ch={} skipped", settings.channel);
    Ok(())
}

// ── LEDC PWM (servos) ─────────────────────────────────────────

/// Servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC duty resolution for servo channels.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// One PWM frame at [`SERVO_PWM_FREQ_HZ`].
pub const SERVO_PERIOD_US: u32 = 1_000_000 / SERVO_PWM_FREQ_HZ;

/// Duty value producing a `pulse_us` high time at 50 Hz / 14-bit.
pub const fn pulse_to_duty(pulse_us: u32) -> u32 {
    let max = 1u32 << SERVO_PWM_RESOLUTION_BITS;
    let pulse = if pulse_us > SERVO_PERIOD_US { SERVO_PERIOD_US } else { pulse_us };
    pulse * max / SERVO_PERIOD_US
}

#[cfg(target_os = "espidf")]
pub fn init_servo_ledc(count: usize, idle_pulse_us: u32) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the loop; single-threaded.
    unsafe {
        let timer = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num: ledc_timer_t_LEDC_TIMER_0,
            duty_resolution: ledc_timer_bit_t_LEDC_TIMER_14_BIT,
            freq_hz: SERVO_PWM_FREQ_HZ,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        let ret = ledc_timer_config(&timer);
        if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

        for (i, &gpio) in pins::SERVO_GPIOS.iter().take(count).enumerate() {
            let ret = ledc_channel_config(&ledc_channel_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                channel: ledc_channel_t_LEDC_CHANNEL_0 + i as u32,
                timer_sel: ledc_timer_t_LEDC_TIMER_0,
                gpio_num: gpio,
                duty: pulse_to_duty(idle_pulse_us),
                hpoint: 0,
                ..Default::default()
            });
            if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }
        }
    }
    info!("hw_init: LEDC configured ({} servo channels @ {} Hz)", count, SERVO_PWM_FREQ_HZ);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_servo_ledc(count: usize, _idle_pulse_us: u32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): {} of {} servo channels skipped", count, pins::SERVO_GPIOS.len());
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) {
    // SAFETY: LEDC channels were configured in init_servo_ledc(); duty
    // register writes are race-free since only the main loop calls this.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u32) {}
