//! Prometheus exposition for one scrape.
//!
//! Every scrape builds a fresh registry: station metrics only describe the
//! stations seen in this cycle, so nothing lingers after a station leaves.

use std::collections::HashMap;

use prometheus::{CounterVec, Gauge, GaugeVec, IntCounter, Opts, Registry, TextEncoder};
use tracing::debug;

use omada_core::{MetricCatalog, MetricSink, Sample, StationLabels, StatsSnapshot, ValueKind};

use crate::error::ExporterError;

/// Self-instrumentation metric names.
pub const COLLECTIONS_TOTAL: &str = "omada_collector_requests_total";
pub const ERRORS_TOTAL: &str = "omada_collector_errors_total";
pub const DURATION_SECONDS: &str = "omada_collector_duration_seconds";

/// Content type of [`PrometheusSink::render`] output.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

enum Family {
    Gauge(GaugeVec),
    Counter(CounterVec),
}

/// [`MetricSink`] that records samples into a per-scrape registry.
pub struct PrometheusSink {
    registry: Registry,
    families: HashMap<&'static str, Family>,
}

impl PrometheusSink {
    /// Register one labelled family per catalog definition.
    pub fn new(catalog: &MetricCatalog) -> Result<Self, ExporterError> {
        let registry = Registry::new();
        let mut families = HashMap::with_capacity(catalog.len());

        for definition in catalog {
            let opts = Opts::new(definition.fq_name(), definition.help());
            let family = match definition.kind() {
                ValueKind::Gauge => {
                    let vec = GaugeVec::new(opts, &StationLabels::NAMES)?;
                    registry.register(Box::new(vec.clone()))?;
                    Family::Gauge(vec)
                }
                ValueKind::Counter => {
                    let vec = CounterVec::new(opts, &StationLabels::NAMES)?;
                    registry.register(Box::new(vec.clone()))?;
                    Family::Counter(vec)
                }
            };
            families.insert(definition.name(), family);
        }

        Ok(Self { registry, families })
    }

    /// Add the collector's running totals to this scrape.
    pub fn record_stats(&self, stats: &StatsSnapshot) -> Result<(), ExporterError> {
        let collections = IntCounter::new(
            COLLECTIONS_TOTAL,
            "number of requests to collect wireless data",
        )?;
        collections.inc_by(stats.collections);

        let errors = IntCounter::new(
            ERRORS_TOTAL,
            "number of errors while collecting wireless data",
        )?;
        errors.inc_by(stats.errors);

        let duration = Gauge::new(
            DURATION_SECONDS,
            "collection from the controller took this many seconds",
        )?;
        duration.set(stats.last_duration.as_secs_f64());

        self.registry.register(Box::new(collections))?;
        self.registry.register(Box::new(errors))?;
        self.registry.register(Box::new(duration))?;
        Ok(())
    }

    /// Encode everything recorded so far in the text exposition format.
    pub fn render(&self) -> Result<String, ExporterError> {
        let text = TextEncoder::new().encode_to_string(&self.registry.gather())?;
        Ok(text)
    }
}

impl MetricSink for PrometheusSink {
    fn accept(&mut self, sample: Sample<'_>) {
        let Some(family) = self.families.get(sample.name()) else {
            debug!(metric = sample.name(), "sample for unregistered metric dropped");
            return;
        };
        let labels = sample.labels.values();

        match family {
            Family::Gauge(vec) => vec.with_label_values(&labels).set(sample.value),
            // The controller reports running totals: the last sample for a
            // label set wins, same as a gauge. Negative totals are bogus data.
            Family::Counter(vec) if sample.value >= 0.0 => {
                let counter = vec.with_label_values(&labels);
                counter.reset();
                counter.inc_by(sample.value);
            }
            Family::Counter(_) => {
                debug!(
                    metric = sample.name(),
                    station = %sample.labels.station,
                    value = sample.value,
                    "negative counter value dropped"
                );
            }
        }
    }
}
