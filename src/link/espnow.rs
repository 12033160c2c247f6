//! ESP-NOW transport.
//!
//! Unicast, unencrypted datagrams to one peer on a fixed channel.  The
//! Wi-Fi driver runs in station mode purely as the radio host; it never
//! associates with an access point.
//!
//! Both callbacks run on the Wi-Fi task:
//!
//! - **receive** stamps the arrival and enqueues the frame in the
//!   [`Inbox`]; nothing else.
//! - **send** counts the delivery outcome in [`DELIVERY`] and logs it.

use esp_idf_svc::espnow::{EspNow, PeerInfo, SendStatus};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::wifi::{ClientConfiguration, Configuration, EspWifi};
use log::{info, warn};

use crate::adapters::mac::{format_mac, MacAddress};
use crate::adapters::time;
use crate::app::ports::LinkPort;
use crate::error::TransportError;

use super::inbox::Inbox;
use super::transport::DELIVERY;

/// Start the Wi-Fi driver in station mode without connecting.
pub fn start_wifi(modem: Modem, sysloop: EspSystemEventLoop) -> anyhow::Result<EspWifi<'static>> {
    let mut wifi = EspWifi::new(modem, sysloop, None)?;
    wifi.set_configuration(&Configuration::Client(ClientConfiguration::default()))?;
    wifi.start()?;
    info!("espnow: Wi-Fi STA started");
    Ok(wifi)
}

fn take() -> Result<EspNow<'static>, TransportError> {
    EspNow::take().map_err(|e| TransportError::InitFailed(e.code()))
}

// ── Transmitter side ──────────────────────────────────────────

/// Sending half, paired with a single receiver.
pub struct EspNowLink {
    espnow: EspNow<'static>,
    peer: MacAddress,
}

impl EspNowLink {
    /// Initialise ESP-NOW, register the send callback and (re)register
    /// `peer` on `channel`.
    pub fn new(peer: MacAddress, channel: u8) -> Result<Self, TransportError> {
        let espnow = take()?;

        espnow
            .register_send_cb(|_mac, status| {
                let ok = matches!(status, SendStatus::SUCCESS);
                let total = DELIVERY.record(ok);
                if ok {
                    info!("LINK | delivery success (#{})", total);
                } else {
                    warn!("LINK | delivery fail (#{})", total);
                }
            })
            .map_err(|e| TransportError::CallbackFailed(e.code()))?;

        // Stale registration from a previous run would make add_peer fail.
        let _ = espnow.del_peer(peer);
        espnow
            .add_peer(PeerInfo {
                peer_addr: peer,
                channel,
                encrypt: false,
                ifidx: esp_idf_svc::sys::wifi_interface_t_WIFI_IF_STA,
                ..Default::default()
            })
            .map_err(|e| TransportError::PeerAddFailed(e.code()))?;

        info!("espnow: peer {} added on ch {}", format_mac(&peer), channel);
        Ok(Self { espnow, peer })
    }
}

impl LinkPort for EspNowLink {
    fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        self.espnow
            .send(self.peer, payload)
            .map_err(|e| TransportError::SendFailed(e.code()))
    }
}

// ── Receiver side ─────────────────────────────────────────────

/// Receiving half.  Keeps ESP-NOW alive for as long as it is held.
pub struct EspNowListener {
    _espnow: EspNow<'static>,
}

impl EspNowListener {
    /// Initialise ESP-NOW and route every inbound datagram into `inbox`.
    pub fn new(inbox: &'static Inbox) -> Result<Self, TransportError> {
        let espnow = take()?;
        espnow
            .register_recv_cb(move |_info, data| {
                inbox.record(time::now_ms(), data);
            })
            .map_err(|e| TransportError::CallbackFailed(e.code()))?;
        info!("espnow: receive callback registered");
        Ok(Self { _espnow: espnow })
    }
}
