// Single re-authentication retry.
//
// attempt -> on TokenExpired, re-authenticate -> attempt once more -> return.
// The bound is structural: there is no loop, so permanently invalid
// credentials cost exactly one extra login per call.

use std::future::Future;

use tracing::debug;

use crate::error::Error;

/// Run `operation`; if it fails with [`Error::TokenExpired`], run
/// `reauthenticate` and then `operation` exactly once more.
///
/// A failed re-authentication is returned as-is. A second `TokenExpired`
/// from the retried operation is surfaced unchanged.
pub async fn retry_once<T, Op, OpFut, Auth, AuthFut>(
    mut operation: Op,
    reauthenticate: Auth,
) -> Result<T, Error>
where
    Op: FnMut() -> OpFut,
    OpFut: Future<Output = Result<T, Error>>,
    Auth: FnOnce() -> AuthFut,
    AuthFut: Future<Output = Result<(), Error>>,
{
    match operation().await {
        Err(Error::TokenExpired) => {
            debug!("token expired, re-authenticating once");
            reauthenticate().await?;
            operation().await
        }
        other => other,
    }
}
