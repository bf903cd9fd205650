// Connected-client endpoints
//
// Site-scoped: `{base}/api/v2/sites/{site}/clients`, filtered to clients
// that are currently associated.

use tracing::debug;

use crate::error::Error;
use crate::models::ConnectedClient;
use crate::session::ControllerSession;

impl ControllerSession {
    /// List the stations currently connected within one site.
    ///
    /// `site_key` is the site's controller id, or its name on controllers
    /// that address sites by name (see [`SiteEntry::key`](crate::SiteEntry::key)).
    pub async fn list_connected_clients(
        &self,
        site_key: &str,
    ) -> Result<Vec<ConnectedClient>, Error> {
        let path = format!("/api/v2/sites/{site_key}/clients");
        debug!(site = site_key, "listing connected clients");
        self.get_all_pages(&path, &[("filters.active", "true")])
            .await
    }
}
