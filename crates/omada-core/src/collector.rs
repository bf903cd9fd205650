// ── Collection pipeline ──
//
// One cycle walks every site, lists its connected stations and streams one
// sample per (station, metric definition) into the sink. A cycle is
// sequential; overlapping scrapes run independent cycles over the same
// source.
//
// Failures never abort a scrape: a failed site listing ends the cycle with
// nothing emitted, a failed station listing skips that site only. Both are
// logged and counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use crate::catalog::MetricCatalog;
use crate::model::Site;
use crate::sink::{MetricSink, Sample, StationLabels};
use crate::source::StationSource;

// ── CycleReport ──────────────────────────────────────────────────

/// Outcome of one collection cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Sites whose station listing succeeded.
    pub sites: usize,
    pub stations: usize,
    pub samples: usize,
    pub errors: u64,
    pub duration: Duration,
}

impl CycleReport {
    /// A cycle is degraded when at least one listing failed.
    pub fn is_degraded(&self) -> bool {
        self.errors > 0
    }
}

// ── CollectorStats ───────────────────────────────────────────────

/// Running totals across all cycles, shared by concurrent scrapes.
#[derive(Debug, Default)]
pub struct CollectorStats {
    collections: AtomicU64,
    errors: AtomicU64,
    last_duration_micros: AtomicU64,
}

/// Point-in-time copy of [`CollectorStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub collections: u64,
    pub errors: u64,
    pub last_duration: Duration,
}

impl CollectorStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            collections: self.collections.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            last_duration: Duration::from_micros(
                self.last_duration_micros.load(Ordering::Relaxed),
            ),
        }
    }

    fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    fn record_cycle(&self, duration: Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        self.collections.fetch_add(1, Ordering::Relaxed);
        self.last_duration_micros.store(micros, Ordering::Relaxed);
    }
}

// ── Collector ────────────────────────────────────────────────────

/// Turns controller state into a stream of station samples.
pub struct Collector<S> {
    source: S,
    catalog: MetricCatalog,
    stats: CollectorStats,
}

impl<S: StationSource> Collector<S> {
    /// Collector over `source` using the standard station catalog.
    pub fn new(source: S) -> Self {
        Self::with_catalog(source, MetricCatalog::standard())
    }

    pub fn with_catalog(source: S, catalog: MetricCatalog) -> Self {
        Self {
            source,
            catalog,
            stats: CollectorStats::default(),
        }
    }

    pub fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    pub fn stats(&self) -> &CollectorStats {
        &self.stats
    }

    /// Run one collection cycle, pushing samples into `sink` as they are
    /// produced.
    pub async fn collect<K>(&self, sink: &mut K) -> CycleReport
    where
        K: MetricSink + ?Sized,
    {
        let started = Instant::now();
        let mut report = CycleReport::default();

        match self.source.list_sites().await {
            Ok(sites) => {
                debug!(count = sites.len(), "collecting sites");
                for site in &sites {
                    self.collect_site(site, sink, &mut report).await;
                }
            }
            Err(e) => {
                error!(error = %e, "failed to list sites, cycle aborted");
                self.stats.record_error();
                report.errors += 1;
            }
        }

        report.duration = started.elapsed();
        self.stats.record_cycle(report.duration);
        debug!(
            sites = report.sites,
            stations = report.stations,
            samples = report.samples,
            errors = report.errors,
            elapsed_ms = report.duration.as_millis(),
            "collection cycle finished"
        );
        report
    }

    async fn collect_site<K>(&self, site: &Site, sink: &mut K, report: &mut CycleReport)
    where
        K: MetricSink + ?Sized,
    {
        let stations = match self.source.list_connected_stations(site).await {
            Ok(stations) => stations,
            Err(e) => {
                warn!(site = %site.name, error = %e, "failed to list stations, skipping site");
                self.stats.record_error();
                report.errors += 1;
                return;
            }
        };

        report.sites += 1;
        for station in &stations {
            let labels = StationLabels::new(site, station);
            for definition in &self.catalog {
                sink.accept(Sample {
                    definition,
                    value: definition.value(station),
                    labels: &labels,
                });
                report.samples += 1;
            }
            report.stations += 1;
        }
    }
}
