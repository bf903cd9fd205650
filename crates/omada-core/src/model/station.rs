// ── Station domain type ──

use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

/// A client device associated with an access point, as reported during one
/// collection cycle.
///
/// Raw controller units are kept: rates in Kbit/s, `last_seen_ms` in epoch
/// milliseconds, `uptime_secs` in seconds. Conversions happen in the
/// metric catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub mac: MacAddress,
    pub name: String,
    pub ap_mac: MacAddress,
    pub ap_name: String,
    pub ssid: String,

    // Radio
    pub wireless: bool,
    pub channel: i32,
    pub wifi_mode: i32,
    pub rssi: i32,
    pub signal_level_pct: i32,
    pub power_save: bool,

    // Throughput
    pub tx_rate_kbps: i64,
    pub rx_rate_kbps: i64,
    /// Bytes sent by the AP to the station.
    pub bytes_down: u64,
    /// Bytes received by the AP from the station.
    pub bytes_up: u64,
    pub packets_down: u64,
    pub packets_up: u64,

    // Timing
    pub last_seen_ms: i64,
    pub uptime_secs: i64,
}
