//! Exporter error types with miette diagnostics.
//!
//! Maps config and `CoreError` failures into user-facing errors with
//! actionable help text and a process exit code.

use std::net::SocketAddr;

use miette::Diagnostic;
use thiserror::Error;

use omada_config::ConfigError;
use omada_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum ExporterError {
    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(omada::config),
        help(
            "Pass --config <file> or set OMADA_PATH, OMADA_USER and OMADA_PASS.\n\
             Run: omada-exporter --help for an example."
        )
    )]
    Config(#[from] ConfigError),

    // ── Controller ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(omada::connection_failed),
        help(
            "Check that the controller is running and reachable: {reason}\n\
             A self-signed certificate needs `secure: false` (OMADA_SECURE=0)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(omada::auth_failed),
        help("Verify the controller admin username and password (user/pass, OMADA_USER/OMADA_PASS).")
    )]
    AuthFailed { message: String },

    #[error("Controller request timed out: {reason}")]
    #[diagnostic(
        code(omada::timeout),
        help("Increase `timeout` (OMADA_TIMEOUT) or check controller responsiveness.")
    )]
    Timeout { reason: String },

    #[error("Controller API error: {message}")]
    #[diagnostic(code(omada::api_error))]
    Api { message: String },

    // ── Listener ─────────────────────────────────────────────────────
    #[error("Cannot listen on {addr}")]
    #[diagnostic(
        code(omada::bind),
        help("Pick a free address with --http, e.g. --http :9100")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed")]
    #[diagnostic(code(omada::serve))]
    Serve(#[source] std::io::Error),

    // ── Exposition ───────────────────────────────────────────────────
    #[error("Failed to encode metrics")]
    #[diagnostic(code(omada::metrics))]
    Metrics(#[from] prometheus::Error),
}

impl ExporterError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => exit_code::USAGE,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Api { .. } | Self::Bind { .. } | Self::Serve(_) | Self::Metrics(_) => {
                exit_code::GENERAL
            }
        }
    }
}

// ── CoreError → ExporterError mapping ────────────────────────────────

impl From<CoreError> for ExporterError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { reason } => Self::Timeout { reason },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::SessionExpired => Self::AuthFailed {
                message: "session token rejected right after login".into(),
            },
            CoreError::Api { message, code: _ } => Self::Api { message },
            CoreError::Config { message } => Self::Config(ConfigError::Validation {
                field: "path".into(),
                reason: message,
            }),
        }
    }
}
