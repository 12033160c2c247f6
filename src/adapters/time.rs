//! ESP32 time adapter.
//!
//! Provides the millisecond clock both main loops and the receive
//! callback stamp against.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side testing and simulation.

/// Milliseconds since boot, truncated to `u32` (wraps after ~49.7 days).
///
/// Free function so the radio callback can stamp arrivals without
/// holding an adapter.
#[cfg(target_os = "espidf")]
pub fn now_ms() -> u32 {
    // SAFETY: esp_timer_get_time is a counter read; safe from any task.
    ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000) as u32
}

#[cfg(not(target_os = "espidf"))]
pub fn now_ms() -> u32 {
    use std::sync::OnceLock;
    use std::time::Instant;
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_millis() as u32
}

/// Time adapter for the ESP32-S3 platform.
pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot (wrapping).
    #[cfg(target_os = "espidf")]
    pub fn now_ms(&self) -> u32 {
        now_ms()
    }

    /// Milliseconds since this clock was created (wrapping).
    #[cfg(not(target_os = "espidf"))]
    pub fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    /// Seconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_secs(&self) -> u64 {
        // SAFETY: counter read.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000_000
    }

    /// Seconds since this clock was created.
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}
