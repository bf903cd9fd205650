// ── API-to-domain type conversions ──
//
// Bridges raw `omada_api` response types into canonical domain types.

use omada_api::{ConnectedClient, SiteEntry};

use crate::model::{MacAddress, Site, Station};

impl From<SiteEntry> for Site {
    fn from(s: SiteEntry) -> Self {
        Site {
            id: s.id,
            name: s.name,
        }
    }
}

impl From<ConnectedClient> for Station {
    fn from(c: ConnectedClient) -> Self {
        Station {
            mac: MacAddress::new(&c.mac),
            name: c.name,
            ap_mac: MacAddress::new(&c.ap_mac),
            ap_name: c.ap_name,
            ssid: c.ssid,
            wireless: c.wireless,
            channel: c.channel,
            wifi_mode: c.wifi_mode,
            rssi: c.rssi,
            signal_level_pct: c.signal_level,
            power_save: c.power_save,
            tx_rate_kbps: c.tx_rate,
            rx_rate_kbps: c.rx_rate,
            bytes_down: c.traffic_down,
            bytes_up: c.traffic_up,
            packets_down: c.down_packet,
            packets_up: c.up_packet,
            last_seen_ms: c.last_seen,
            uptime_secs: c.uptime,
        }
    }
}
