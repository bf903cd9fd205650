// ── Sample stream ──
//
// Samples are pushed to a `MetricSink` one by one as the collector produces
// them; the collector never buffers a whole cycle.

use serde::Serialize;

use crate::catalog::{MetricDefinition, ValueKind};
use crate::model::{Site, Station};

/// Label set attached to every sample of one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationLabels {
    /// Normalized station MAC.
    pub station: String,
    pub name: String,
    /// Normalized AP MAC.
    pub ap_address: String,
    pub ap_name: String,
    pub ssid: String,
    pub site: String,
}

impl StationLabels {
    /// Label names, in the order [`values`](Self::values) returns them.
    pub const NAMES: [&'static str; 6] =
        ["station", "name", "ap_address", "ap_name", "ssid", "site"];

    pub fn new(site: &Site, station: &Station) -> Self {
        Self {
            station: station.mac.to_string(),
            name: station.name.clone(),
            ap_address: station.ap_mac.to_string(),
            ap_name: station.ap_name.clone(),
            ssid: station.ssid.clone(),
            site: site.name.clone(),
        }
    }

    pub fn values(&self) -> [&str; 6] {
        [
            &self.station,
            &self.name,
            &self.ap_address,
            &self.ap_name,
            &self.ssid,
            &self.site,
        ]
    }
}

/// One (metric, value, label-set) emission for a single station.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    pub definition: &'a MetricDefinition,
    pub value: f64,
    pub labels: &'a StationLabels,
}

impl Sample<'_> {
    pub fn name(&self) -> &'static str {
        self.definition.name()
    }

    pub fn kind(&self) -> ValueKind {
        self.definition.kind()
    }

    pub fn to_recorded(&self) -> RecordedSample {
        RecordedSample {
            metric: self.definition.fq_name(),
            kind: self.kind(),
            value: self.value,
            labels: self.labels.clone(),
        }
    }
}

/// Owned copy of a [`Sample`], for sinks that keep what they receive.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSample {
    pub metric: String,
    pub kind: ValueKind,
    pub value: f64,
    pub labels: StationLabels,
}

/// Consumer of the sample stream (exposition, tests, ...).
pub trait MetricSink {
    fn accept(&mut self, sample: Sample<'_>);
}

impl MetricSink for Vec<RecordedSample> {
    fn accept(&mut self, sample: Sample<'_>) {
        self.push(sample.to_recorded());
    }
}
