// Omada API response types
//
// Every controller response is wrapped in the `Envelope<T>` shape. Fields
// use `#[serde(default)]` liberally because controller generations disagree
// about which fields are present. Listing fields also accept an explicit
// `null`, which reads as the field's default.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

// ── Response Envelope ────────────────────────────────────────────────

/// Standard Omada response envelope.
///
/// ```json
/// { "errorCode": 0, "msg": "Success.", "result": { ... } }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap `result`, turning a non-zero `errorCode` into
    /// [`Error::Protocol`].
    pub fn into_result(self) -> Result<T, Error> {
        self.into_optional()?.ok_or_else(|| Error::Protocol {
            message: "envelope has no result".into(),
            code: Some(0),
        })
    }

    /// Like [`into_result`](Self::into_result), but an absent `result` is
    /// not an error.
    pub fn into_optional(self) -> Result<Option<T>, Error> {
        if self.error_code != 0 {
            return Err(self.protocol_error());
        }
        Ok(self.result)
    }

    fn protocol_error(&self) -> Error {
        let msg = self.msg.as_deref().unwrap_or("no message");
        Error::Protocol {
            message: format!("errorCode {}: {msg}", self.error_code),
            code: Some(self.error_code),
        }
    }
}

// ── Discovery & login ────────────────────────────────────────────────

/// Unauthenticated controller info from `GET /api/info`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerInfo {
    /// Opaque identifier prefixing every authenticated path.
    #[serde(default)]
    pub omadac_id: Option<String>,
    #[serde(default)]
    pub controller_ver: Option<String>,
    #[serde(default)]
    pub api_ver: Option<String>,
    #[serde(default)]
    pub configured: Option<bool>,
}

/// Result payload of `POST {base}/api/v2/login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    #[serde(default)]
    pub role_type: Option<i64>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Deserialize a field whose `null` means "not reported".
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ── Pagination ───────────────────────────────────────────────────────

/// Paged listing payload: `{ totalRows, currentPage, currentSize, data }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_rows: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_page: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_size: u64,
    #[serde(
        default = "Vec::new",
        deserialize_with = "null_as_default",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    pub data: Vec<T>,
}

// ── Site ─────────────────────────────────────────────────────────────

/// Site entry from `GET {base}/api/v2/sites`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl SiteEntry {
    /// Path segment used for site-scoped calls: the controller id when the
    /// controller reports one, otherwise the site name.
    pub fn key(&self) -> &str {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.name)
    }
}

// ── Connected client (station) ───────────────────────────────────────

/// Connected client from `GET {base}/api/v2/sites/{site}/clients`.
///
/// Rates are reported in Kbit/s, `lastSeen` in epoch milliseconds and
/// `uptime` in seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectedClient {
    #[serde(deserialize_with = "null_as_default")]
    pub mac: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ap_mac: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ap_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ssid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub wireless: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub channel: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub wifi_mode: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub rssi: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub signal_level: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub power_save: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub tx_rate: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub rx_rate: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub traffic_down: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub traffic_up: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub down_packet: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub up_packet: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub last_seen: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub uptime: i64,
}
