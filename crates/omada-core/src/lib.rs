//! Station metric pipeline between `omada-api` and the exporter binary.
//!
//! - **[`Collector`]**: walks every site on the controller, lists the
//!   connected stations and streams one [`Sample`] per station and
//!   [`MetricDefinition`] into a [`MetricSink`].
//!
//! - **[`MetricCatalog`]**: the fixed, ordered set of per-station metrics
//!   with their help text, value kind and extraction rule.
//!
//! - **[`StationSource`]**: the two controller queries the collector needs,
//!   implemented for [`omada_api::ControllerSession`].
//!
//! - **Domain model** ([`model`]): [`Site`], [`Station`] and the normalized
//!   [`MacAddress`].

pub mod catalog;
pub mod collector;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod sink;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{MetricCatalog, MetricDefinition, STATION_NAMESPACE, ValueKind};
pub use collector::{Collector, CollectorStats, CycleReport, StatsSnapshot};
pub use config::{ControllerConfig, TlsVerification};
pub use controller::{build_session, connect};
pub use error::CoreError;
pub use model::{MacAddress, Site, Station};
pub use sink::{MetricSink, RecordedSample, Sample, StationLabels};
pub use source::StationSource;
