// ── Station metric catalog ──
//
// The fixed, ordered set of per-station metrics. Built once by an explicit
// constructor and handed to the collector; enumeration order is the sample
// emission order.

use strum::{AsRefStr, Display};

use crate::model::Station;

/// Namespace prefix for exported station metric names.
pub const STATION_NAMESPACE: &str = "omada_station";

/// Prometheus-style value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    /// Monotonic within one station connection.
    Counter,
    Gauge,
}

/// Pure extraction rule: station in, sample value out.
pub type Extractor = fn(&Station) -> f64;

/// One per-station metric: name, help text, kind, extraction rule.
#[derive(Debug, Clone)]
pub struct MetricDefinition {
    name: &'static str,
    help: &'static str,
    kind: ValueKind,
    extract: Extractor,
}

impl MetricDefinition {
    pub const fn new(
        name: &'static str,
        help: &'static str,
        kind: ValueKind,
        extract: Extractor,
    ) -> Self {
        Self {
            name,
            help,
            kind,
            extract,
        }
    }

    /// Short name, without the namespace (e.g. `signal_rssi`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fully qualified name (e.g. `omada_station_signal_rssi`).
    pub fn fq_name(&self) -> String {
        format!("{STATION_NAMESPACE}_{}", self.name)
    }

    pub fn help(&self) -> &'static str {
        self.help
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Apply the extraction rule.
    pub fn value(&self, station: &Station) -> f64 {
        (self.extract)(station)
    }
}

/// Immutable, ordered collection of [`MetricDefinition`]s.
#[derive(Debug, Clone)]
pub struct MetricCatalog {
    definitions: Vec<MetricDefinition>,
}

impl MetricCatalog {
    pub fn new(definitions: Vec<MetricDefinition>) -> Self {
        Self { definitions }
    }

    /// The standard station catalog.
    ///
    /// Unit conversions: bitrates arrive in Kbit/s and are exported in
    /// Mbit/s (`/ 1000`); `last_seen` arrives in epoch milliseconds and is
    /// exported in seconds (`/ 1000`); uptime is already in seconds.
    pub fn standard() -> Self {
        use ValueKind::{Counter, Gauge};

        Self::new(vec![
            MetricDefinition::new("wireless", "is wireless station", Gauge, |s| {
                from_bool(s.wireless)
            }),
            MetricDefinition::new("channel", "wireless channel", Gauge, |s| {
                f64::from(s.channel)
            }),
            MetricDefinition::new("wireless_mode", "wireless mode in ?", Gauge, |s| {
                f64::from(s.wifi_mode)
            }),
            MetricDefinition::new(
                "signal_rssi",
                "received signal strength in dBm",
                Gauge,
                |s| f64::from(s.rssi),
            ),
            MetricDefinition::new(
                "signal_level_pct",
                "signal level in percent",
                Gauge,
                |s| f64::from(s.signal_level_pct),
            ),
            MetricDefinition::new("powersaving", "station is powersaving", Gauge, |s| {
                from_bool(s.power_save)
            }),
            MetricDefinition::new(
                "transmit_bitrate_mbps",
                "transmit bitrate in Mbps",
                Gauge,
                |s| lossy_i64(s.tx_rate_kbps) / 1000.0,
            ),
            MetricDefinition::new(
                "receive_bitrate_mbps",
                "receive bitrate in Mbps",
                Gauge,
                |s| lossy_i64(s.rx_rate_kbps) / 1000.0,
            ),
            MetricDefinition::new(
                "transmit_bytes_total",
                "bytes transmitted to station",
                Counter,
                |s| lossy_u64(s.bytes_down),
            ),
            MetricDefinition::new(
                "receive_bytes_total",
                "bytes received from station",
                Counter,
                |s| lossy_u64(s.bytes_up),
            ),
            MetricDefinition::new(
                "transmit_packets_total",
                "packet count transmitted to station",
                Counter,
                |s| lossy_u64(s.packets_down),
            ),
            MetricDefinition::new(
                "receive_packets_total",
                "packet count received from station",
                Counter,
                |s| lossy_u64(s.packets_up),
            ),
            MetricDefinition::new(
                "last_seen_time_seconds",
                "station seen at this time in seconds since unix epoch",
                Counter,
                |s| lossy_i64(s.last_seen_ms) / 1000.0,
            ),
            MetricDefinition::new(
                "uptime_seconds",
                "duration this station has been connected in seconds",
                Counter,
                |s| lossy_i64(s.uptime_secs),
            ),
        ])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetricDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Look up a definition by short name.
    pub fn get(&self, name: &str) -> Option<&MetricDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> IntoIterator for &'a MetricCatalog {
    type Item = &'a MetricDefinition;
    type IntoIter = std::slice::Iter<'a, MetricDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn from_bool(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

// Counters and epoch milliseconds stay far below 2^53, where f64 is exact.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn lossy_i64(value: i64) -> f64 {
    value as f64
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn lossy_u64(value: u64) -> f64 {
    value as f64
}
