use thiserror::Error;

/// Top-level error type for the `omada-api` crate.
///
/// Covers every failure mode of a controller session: transport,
/// authentication, token expiry, and envelope/protocol problems.
/// `omada-core` maps these into domain-facing errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login or controller discovery failed (bad credentials, missing
    /// token, missing controller identifier).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The controller answered an authenticated request with HTTP 401.
    ///
    /// Transient: one re-authentication may resolve it. See
    /// [`ControllerSession::retry_once`](crate::ControllerSession::retry_once).
    #[error("Token expired or unauthorized -- re-authentication required")]
    TokenExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Protocol ────────────────────────────────────────────────────
    /// Unexpected HTTP status or a non-zero `errorCode` in the envelope.
    #[error("Controller API error: {message}")]
    Protocol { message: String, code: Option<i64> },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error is the distinguished token-expiry
    /// condition that a single re-authentication may clear.
    pub fn is_token_expired(&self) -> bool {
        matches!(self, Self::TokenExpired)
    }

    /// Returns `true` for any protocol-level failure (bad status, non-zero
    /// `errorCode`, malformed payload).
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. } | Self::Deserialization { .. })
    }

    /// Extract the controller's `errorCode`, if available.
    pub fn api_error_code(&self) -> Option<i64> {
        match self {
            Self::Protocol { code, .. } => *code,
            _ => None,
        }
    }
}
