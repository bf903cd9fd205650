// ── Core error types ──
//
// Domain-facing errors from omada-core. The `From<omada_api::Error>` impl
// translates transport-layer errors into these variants so consumers never
// match on HTTP or JSON details.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Controller request timed out: {reason}")]
    Timeout { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired and re-authentication did not help")]
    SessionExpired,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The controller's `errorCode`, when the envelope carried one.
        code: Option<i64>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for failures that point at credentials rather than
    /// at the network or the controller.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::SessionExpired
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<omada_api::Error> for CoreError {
    fn from(err: omada_api::Error) -> Self {
        match err {
            omada_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            omada_api::Error::TokenExpired => CoreError::SessionExpired,
            omada_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            omada_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            omada_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            omada_api::Error::Protocol { message, code } => CoreError::Api { message, code },
            omada_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("unexpected response: {message}"),
                code: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_expiry_maps_to_session_expired() {
        let err = CoreError::from(omada_api::Error::TokenExpired);
        assert!(matches!(err, CoreError::SessionExpired));
        assert!(err.is_auth());
    }

    #[test]
    fn protocol_error_keeps_code() {
        let err = CoreError::from(omada_api::Error::Protocol {
            message: "errorCode -1600: Unsupported request path.".into(),
            code: Some(-1600),
        });
        match err {
            CoreError::Api { code, .. } => assert_eq!(code, Some(-1600)),
            other => panic!("expected Api error, got: {other:?}"),
        }
    }
}
