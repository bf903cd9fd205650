// ── Station source ──
//
// The collector only needs two queries from a controller. Keeping them
// behind a trait lets the pipeline run against a live session or an
// in-memory fake.

use std::future::Future;

use omada_api::ControllerSession;

use crate::error::CoreError;
use crate::model::{Site, Station};

/// Read-only view of a controller's sites and their connected stations.
pub trait StationSource: Send + Sync {
    /// Every site visible to the authenticated user.
    fn list_sites(&self) -> impl Future<Output = Result<Vec<Site>, CoreError>> + Send;

    /// Stations currently associated within `site`.
    fn list_connected_stations(
        &self,
        site: &Site,
    ) -> impl Future<Output = Result<Vec<Station>, CoreError>> + Send;
}

impl StationSource for ControllerSession {
    fn list_sites(&self) -> impl Future<Output = Result<Vec<Site>, CoreError>> + Send {
        async move {
            let entries = ControllerSession::list_sites(self).await?;
            Ok(entries.into_iter().map(Site::from).collect())
        }
    }

    fn list_connected_stations(
        &self,
        site: &Site,
    ) -> impl Future<Output = Result<Vec<Station>, CoreError>> + Send {
        let key = site.key().to_owned();
        async move {
            let clients = self.list_connected_clients(&key).await?;
            Ok(clients.into_iter().map(Station::from).collect())
        }
    }
}
