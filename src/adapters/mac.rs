//! Station MAC address helpers.
//!
//! ESP-NOW addresses peers by their Wi-Fi station MAC.  The receiver logs
//! its own at boot so it can be copied into the transmitter's
//! `peer_mac`; the transmitter logs the peer it is paired with.

use core::fmt::Write;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// `AA:BB:CC:DD:EE:FF` (17 chars).
pub type MacString = heapless::String<17>;

/// Read this device's Wi-Fi station MAC.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    // SAFETY: `mac` is a valid 6-byte buffer; the call only reads eFuse.
    let ret = unsafe {
        esp_idf_svc::sys::esp_read_mac(mac.as_mut_ptr(), esp_idf_svc::sys::esp_mac_type_t_ESP_MAC_WIFI_STA)
    };
    if ret != esp_idf_svc::sys::ESP_OK as i32 {
        log::warn!("mac: esp_read_mac failed (rc={})", ret);
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Colon-separated uppercase hex.
pub fn format_mac(mac: &MacAddress) -> MacString {
    let mut s = MacString::new();
    let _ = write!(
        s,
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    );
    s
}
