// ── Controller connection ──
//
// Builds the HTTP transport from a `ControllerConfig` and performs the
// initial authentication. The resulting session is shared by every scrape.

use omada_api::{ControllerSession, TransportConfig};
use tracing::info;

use crate::config::ControllerConfig;
use crate::error::CoreError;

/// Build a session for `config` and authenticate it once.
///
/// Any failure here is fatal to the caller: there is no point serving
/// scrapes for a controller we cannot log into.
pub async fn connect(config: &ControllerConfig) -> Result<ControllerSession, CoreError> {
    let session = build_session(config)?;
    session.authenticate().await?;

    let state = session.state();
    info!(
        url = %config.url,
        controller_id = state.controller_id().unwrap_or_default(),
        "connected to controller"
    );
    Ok(session)
}

/// Build an unauthenticated session for `config`.
pub fn build_session(config: &ControllerConfig) -> Result<ControllerSession, CoreError> {
    let transport = TransportConfig::new((&config.tls).into(), config.timeout);
    let session = ControllerSession::new(
        &config.url,
        config.username.clone(),
        config.password.clone(),
        &transport,
    )?;
    Ok(session)
}
