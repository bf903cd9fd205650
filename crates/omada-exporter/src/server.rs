//! HTTP listener: `/metrics` runs one collection cycle per scrape.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use omada_core::{Collector, StationSource};

use crate::error::ExporterError;
use crate::exposition::{CONTENT_TYPE, PrometheusSink};

/// Body returned for every path other than `/metrics`.
pub const NOT_FOUND_BODY: &str = "omada-exporter";

/// Build the scrape router over a shared collector.
pub fn router<S>(collector: Arc<Collector<S>>) -> Router
where
    S: StationSource + 'static,
{
    Router::new()
        .route("/metrics", get(metrics_handler::<S>))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(collector)
}

/// Bind `addr` and serve `app` until Ctrl-C.
pub async fn serve(addr: SocketAddr, app: Router) -> Result<(), ExporterError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ExporterError::Bind { addr, source })?;

    info!(address = %addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ExporterError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

/// `/metrics`: collect, then encode. Controller failures only degrade the
/// output; the scrape itself still succeeds.
async fn metrics_handler<S>(State(collector): State<Arc<Collector<S>>>) -> Response
where
    S: StationSource + 'static,
{
    match scrape(&collector).await {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {e}"),
            )
                .into_response()
        }
    }
}

async fn scrape<S: StationSource>(collector: &Collector<S>) -> Result<String, ExporterError> {
    let mut sink = PrometheusSink::new(collector.catalog())?;
    collector.collect(&mut sink).await;
    sink.record_stats(&collector.stats().snapshot())?;
    sink.render()
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::Future;

    use axum::body::Body;
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;
    use omada_core::{CoreError, MacAddress, Site, Station};

    /// One site with one station; `fail_stations` breaks the station listing.
    struct FakeSource {
        fail_stations: bool,
    }

    impl StationSource for FakeSource {
        fn list_sites(&self) -> impl Future<Output = Result<Vec<Site>, CoreError>> + Send {
            async { Ok(vec![Site::new("Default")]) }
        }

        fn list_connected_stations(
            &self,
            _site: &Site,
        ) -> impl Future<Output = Result<Vec<Station>, CoreError>> + Send {
            let fail = self.fail_stations;
            async move {
                if fail {
                    return Err(CoreError::Timeout {
                        reason: "operation timed out".into(),
                    });
                }
                Ok(vec![Station {
                    mac: MacAddress::new("AA-BB-CC-11-22-33"),
                    name: "laptop".into(),
                    ap_mac: MacAddress::new("10-20-30-40-50-60"),
                    ap_name: "Lobby".into(),
                    ssid: "guest".into(),
                    wireless: true,
                    channel: 11,
                    ..Station::default()
                }])
            }
        }
    }

    fn app(fail_stations: bool) -> Router {
        router(Arc::new(Collector::new(FakeSource { fail_stations })))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn metrics_endpoint_exports_station_metrics() {
        let (status, body) = get(app(false), "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("# TYPE omada_station_channel gauge"));
        assert!(body.contains("omada_station_wireless{"));
        assert!(body.contains("station=\"aa:bb:cc:11:22:33\""));
        assert!(body.contains("omada_collector_requests_total 1"));
        assert!(body.contains("omada_collector_errors_total 0"));
    }

    #[tokio::test]
    async fn degraded_cycle_still_returns_ok() {
        let (status, body) = get(app(true), "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("omada_station_"));
        assert!(body.contains("omada_collector_errors_total 1"));
    }

    #[tokio::test]
    async fn other_paths_return_not_found() {
        for uri in ["/", "/health", "/metrics/extra"] {
            let (status, body) = get(app(false), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, NOT_FOUND_BODY);
        }
    }
}
