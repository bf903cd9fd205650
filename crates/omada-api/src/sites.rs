// Site endpoints
//
// Site listing is controller-scoped: `{base}/api/v2/sites`.

use tracing::debug;

use crate::error::Error;
use crate::models::SiteEntry;
use crate::session::ControllerSession;

impl ControllerSession {
    /// List all sites visible to the authenticated user.
    ///
    /// `GET {base}/api/v2/sites?currentPage=N&currentPageSize=S`
    pub async fn list_sites(&self) -> Result<Vec<SiteEntry>, Error> {
        debug!("listing sites");
        self.get_all_pages("/api/v2/sites", &[]).await
    }
}
