// Omada controller session
//
// Owns the authentication state (token + resolved base path) and the
// authenticated-request contract. Endpoint modules (sites, clients) are
// implemented as inherent methods in separate files.
//
// Session state is one immutable `SessionState` value behind an `ArcSwap`.
// `authenticate()` builds the next state and publishes it in a single
// store; every request loads one snapshot, so the token and the base path
// it uses always come from the same login.

use std::future::Future;
use std::sync::Arc;

use arc_swap::ArcSwap;
use reqwest::header::HeaderValue;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, trace};
use url::Url;

use crate::error::Error;
use crate::models::{ControllerInfo, Envelope, LoginResult, Page};
use crate::retry;
use crate::transport::TransportConfig;

/// Header carrying the login token on authenticated calls.
pub const TOKEN_HEADER: &str = "Csrf-Token";

/// Unauthenticated discovery path, relative to the controller root.
const INFO_PATH: &str = "/api/info";

/// Login path, relative to the resolved base path.
const LOGIN_PATH: &str = "/api/v2/login";

/// Rows requested per page on paged listings.
const PAGE_SIZE: u64 = 100;

// ── SessionState ─────────────────────────────────────────────────────

/// Snapshot of the authenticated path and token.
///
/// Replaced as a whole; never mutated in place.
#[derive(Debug, Clone)]
pub struct SessionState {
    base_url: String,
    token: Option<SecretString>,
    controller_id: Option<String>,
}

impl SessionState {
    fn unauthenticated(root: &str) -> Self {
        Self {
            base_url: root.to_owned(),
            token: None,
            controller_id: None,
        }
    }

    /// Base path for authenticated calls: the root, or `{root}/{controller_id}`
    /// after a successful discovery.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    pub fn controller_id(&self) -> Option<&str> {
        self.controller_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

// ── ControllerSession ────────────────────────────────────────────────

/// Authenticated session against one Omada controller.
///
/// Safe to share between concurrent collection cycles. Overlapping cycles
/// may each re-authenticate; logins are serialized so their state writes
/// never interleave.
#[derive(Debug)]
pub struct ControllerSession {
    http: reqwest::Client,
    /// Controller root with the trailing slash trimmed.
    root: String,
    username: String,
    password: SecretString,
    state: ArcSwap<SessionState>,
    auth_lock: Mutex<()>,
}

impl ControllerSession {
    /// Create a session from a `TransportConfig`. Does NOT log in --
    /// call [`authenticate()`](Self::authenticate) first.
    pub fn new(
        root: &Url,
        username: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, root, username, password))
    }

    /// Create a session with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        root: &Url,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        let root = root.as_str().trim_end_matches('/').to_owned();
        let state = ArcSwap::from_pointee(SessionState::unauthenticated(&root));
        Self {
            http,
            root,
            username: username.into(),
            password,
            state,
            auth_lock: Mutex::new(()),
        }
    }

    /// Current session snapshot.
    pub fn state(&self) -> Arc<SessionState> {
        self.state.load_full()
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Discover the controller identifier and log in.
    ///
    /// Clears the stored token and resets the base path to the root before
    /// the unauthenticated discovery call, then publishes
    /// `{root}/{omadacId}` together with the new token. Any failure is
    /// returned unchanged; an HTTP 401 here is an authentication failure,
    /// never [`Error::TokenExpired`].
    pub async fn authenticate(&self) -> Result<(), Error> {
        let _guard = self.auth_lock.lock().await;

        self.state
            .store(Arc::new(SessionState::unauthenticated(&self.root)));

        let info = self.controller_info().await?;
        let controller_id = info
            .omadac_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Authentication {
                message: "controller did not report an identifier (omadacId)".into(),
            })?;

        let base_url = format!("{}/{controller_id}", self.root);
        debug!(%base_url, "resolved controller base path");

        let token = self.login(&base_url).await?;

        self.state.store(Arc::new(SessionState {
            base_url,
            token: Some(token),
            controller_id: Some(controller_id),
        }));

        info!(
            username = %self.username,
            controller_version = info.controller_ver.as_deref().unwrap_or("unknown"),
            "authenticated with controller"
        );
        Ok(())
    }

    /// Unauthenticated `GET {root}/api/info`.
    ///
    /// Returns the controller identifier plus version details. Never carries
    /// a token.
    pub async fn controller_info(&self) -> Result<ControllerInfo, Error> {
        let url = Url::parse(&format!("{}{INFO_PATH}", self.root))?;
        debug!("discovering controller at {}", url);

        let envelope: Envelope<ControllerInfo> =
            self.send_unauthenticated(self.http.get(url)).await?;
        Ok(envelope.into_optional()?.unwrap_or_default())
    }

    /// `POST {base}/api/v2/login`; returns the token.
    async fn login(&self, base_url: &str) -> Result<SecretString, Error> {
        let url = Url::parse(&format!("{base_url}{LOGIN_PATH}"))?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": self.username,
            "password": self.password.expose_secret(),
        });

        let envelope: Envelope<LoginResult> = self
            .send_unauthenticated(self.http.post(url).json(&body))
            .await?;

        let token = envelope
            .result
            .as_ref()
            .and_then(|r| r.token.as_deref())
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::from(t.to_owned()));

        token.ok_or_else(|| Error::Authentication {
            message: format!(
                "login rejected: errorCode {}: {}",
                envelope.error_code,
                envelope.msg.as_deref().unwrap_or("no message")
            ),
        })
    }

    async fn send_unauthenticated<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, Error> {
        let resp = builder.send().await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "controller rejected the request (HTTP 401)".into(),
            });
        }
        decode(resp).await
    }

    // ── Authenticated requests ───────────────────────────────────────

    /// Send a request against the current base path with the current token.
    ///
    /// An HTTP 401 becomes [`Error::TokenExpired`]; this method never
    /// retries. Wrap it in [`retry_once`](Self::retry_once) for that.
    pub async fn authenticated_request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let state = self.state.load_full();
        let url = Url::parse(&format!("{}{path}", state.base_url))?;
        debug!("{} {}", method, url);

        let mut builder = self.http.request(method, url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(token) = state.token() {
            let mut value =
                HeaderValue::from_str(token.expose_secret()).map_err(|e| Error::Authentication {
                    message: format!("invalid token header value: {e}"),
                })?;
            value.set_sensitive(true);
            builder = builder.header(TOKEN_HEADER, value);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        decode(resp).await
    }

    /// Run `operation`, re-authenticating and retrying exactly once if it
    /// reports [`Error::TokenExpired`].
    pub async fn retry_once<T, F, Fut>(&self, operation: F) -> Result<T, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        retry::retry_once(operation, move || self.authenticate()).await
    }

    /// Authenticated GET, unwrapping the envelope's `result`.
    pub(crate) async fn get_result<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        self.authenticated_request::<Envelope<T>, ()>(Method::GET, path, query, None)
            .await?
            .into_result()
    }

    /// Fetch every page of a paged listing.
    ///
    /// Each page is its own retried request. Stops on an empty page or once
    /// `totalRows` rows were received.
    pub(crate) async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<T>, Error> {
        let mut all = Vec::new();
        let mut page: u64 = 1;

        loop {
            let mut query = vec![
                ("currentPage", page.to_string()),
                ("currentPageSize", PAGE_SIZE.to_string()),
            ];
            query.extend(filters.iter().map(|&(k, v)| (k, v.to_owned())));
            let query = query.as_slice();

            let batch: Page<T> = self
                .retry_once(move || self.get_result(path, query))
                .await?;

            let received = batch.data.len();
            all.extend(batch.data);
            trace!(path, page, received, total = batch.total_rows, "page fetched");

            if received == 0 || u64::try_from(all.len()).unwrap_or(u64::MAX) >= batch.total_rows {
                break;
            }
            page += 1;
        }

        Ok(all)
    }
}

/// Map the HTTP status and decode the JSON body.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();

    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::TokenExpired);
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let preview: String = body.chars().take(200).collect();
        return Err(Error::Protocol {
            message: format!("HTTP {status}: {preview}"),
            code: None,
        });
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })
}
