//! Configuration for the Omada station exporter.
//!
//! Layers built-in defaults, an optional YAML file and `OMADA_*`
//! environment variables, validates the result and translates it into an
//! `omada_core::ControllerConfig`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use omada_core::{ControllerConfig, TlsVerification};

/// Prefix shared by every environment variable the exporter reads.
pub const ENV_PREFIX: &str = "OMADA_";

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "missing required settings: {} (set them in the config file or via OMADA_PATH, OMADA_USER and OMADA_PASS)",
        .missing.join(", ")
    )]
    MissingSettings { missing: Vec<&'static str> },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Merged exporter settings, before validation.
///
/// File keys match the field names; every field can also be set through
/// the environment as `OMADA_<FIELD>` (e.g. `OMADA_PATH`).
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Controller root URL, e.g. `https://192.168.0.2:8043/`.
    #[serde(default, deserialize_with = "scalar_string")]
    pub path: Option<String>,

    /// Controller admin username.
    #[serde(default, deserialize_with = "scalar_string")]
    pub user: Option<String>,

    /// Controller admin password.
    #[serde(default, deserialize_with = "scalar_secret")]
    pub pass: Option<SecretString>,

    /// Require a verifiable TLS certificate. Off by default: controllers
    /// ship with a self-signed certificate.
    #[serde(default)]
    pub secure: bool,

    /// CA certificate used to verify the controller when `secure` is set.
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// ── Scalar strings ──────────────────────────────────────────────────

/// Accept any YAML scalar as a string: `pass: 123456` is a password, not a
/// number.
fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    struct ScalarString;

    impl<'de> Visitor<'de> for ScalarString {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_owned()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(ScalarString)
}

fn scalar_secret<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error> {
    Ok(scalar_string(deserializer)?.map(SecretString::from))
}

// ── Raw environment strings ─────────────────────────────────────────

/// String settings read verbatim from `OMADA_*`.
///
/// figment's `Env` provider parses values, so `OMADA_PASS=0123` would
/// arrive as the number 123. These keys bypass it and are layered as
/// plain strings instead.
#[derive(Debug, Default, Serialize)]
struct EnvStrings {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ca_cert: Option<String>,
}

impl EnvStrings {
    fn from_env() -> Self {
        let var = |key: &str| std::env::var(format!("{ENV_PREFIX}{key}")).ok();
        Self {
            path: var("PATH"),
            user: var("USER"),
            pass: var("PASS"),
            ca_cert: var("CA_CERT"),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Platform config location, e.g. `~/.config/omada-exporter/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "omada-exporter").map(|dirs| dirs.config_dir().join("config.yaml"))
}

// ── Loading ─────────────────────────────────────────────────────────

/// Provider chain: defaults, then the YAML file (if any), then `OMADA_*`.
///
/// `OMADA_PATH`, `OMADA_USER`, `OMADA_PASS` and `OMADA_CA_CERT` are taken
/// verbatim. `OMADA_SECURE` is left out here; it accepts `0`/`1` as well as
/// `true`/`false` and is applied by [`Config::load`].
pub fn layered(file: Option<&Path>) -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::default("secure", false))
        .merge(Serialized::default("timeout", DEFAULT_TIMEOUT_SECS));

    if let Some(path) = file {
        figment = figment.merge(Yaml::file(path));
    }

    figment
        .merge(Serialized::defaults(EnvStrings::from_env()))
        .merge(Env::prefixed(ENV_PREFIX).only(&["timeout"]))
}

impl Config {
    /// Load settings from `file` (or the platform default, when it exists)
    /// and the environment.
    ///
    /// An explicitly requested file that does not exist is an error; a
    /// missing default file is not.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match file {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        let mut config: Config = layered(file.as_deref()).extract()?;
        if let Ok(raw) = std::env::var(format!("{ENV_PREFIX}SECURE")) {
            config.secure = parse_secure(&raw)?;
        }
        Ok(config)
    }

    /// Validate and translate into the runtime connection config.
    pub fn to_controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        let path = self.path.as_deref().filter(|p| !p.trim().is_empty());
        let user = self.user.as_deref().filter(|u| !u.is_empty());
        let pass = self
            .pass
            .as_ref()
            .filter(|p| !p.expose_secret().is_empty());

        let (Some(path), Some(user), Some(pass)) = (path, user, pass) else {
            let missing = [
                ("path", path.is_none()),
                ("user", user.is_none()),
                ("pass", pass.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            return Err(ConfigError::MissingSettings { missing });
        };

        let url = parse_controller_url(path)?;

        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        let tls = match (self.secure, &self.ca_cert) {
            (false, _) => TlsVerification::DangerAcceptInvalid,
            (true, Some(ca)) => TlsVerification::CustomCa(ca.clone()),
            (true, None) => TlsVerification::SystemDefaults,
        };

        Ok(ControllerConfig {
            url,
            username: user.to_owned(),
            password: pass.clone(),
            tls,
            timeout: Duration::from_secs(self.timeout),
        })
    }
}

/// Parse `OMADA_SECURE`: `0`, `1`, `true` or `false` (any case).
pub fn parse_secure(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ConfigError::Validation {
            field: "OMADA_SECURE".into(),
            reason: format!("invalid value {raw:?}, expected 0, 1, true or false"),
        }),
    }
}

fn parse_controller_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::Validation {
        field: "path".into(),
        reason: format!("invalid URL {raw:?}: {e}"),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "path".into(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}
