// ── Runtime connection configuration ──
//
// These types describe *how* to connect to an Omada controller. They carry
// credential data and connection tuning, but never touch disk. The binary
// builds a `ControllerConfig` (via omada-config) and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use omada_api::TlsMode;
use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs). Default for local controllers.
    #[default]
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for connecting to a single controller. Immutable once built.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller root URL (e.g., `https://192.168.0.2:8043`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}
