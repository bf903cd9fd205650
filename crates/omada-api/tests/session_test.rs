#![allow(clippy::unwrap_used)]
// Integration tests for `ControllerSession` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use omada_api::{ControllerSession, Error, TOKEN_HEADER};

const CONTROLLER_ID: &str = "abc123";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ControllerSession) {
    let server = MockServer::start().await;
    // Trailing slash on purpose: the session must trim it.
    let root = Url::parse(&format!("{}/", server.uri())).unwrap();
    let session = ControllerSession::with_client(
        reqwest::Client::new(),
        &root,
        "admin",
        SecretString::from("hunter2".to_string()),
    );
    (server, session)
}

fn ok(result: &serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "errorCode": 0,
        "msg": "Success.",
        "result": result,
    }))
}

fn api(suffix: &str) -> String {
    format!("/{CONTROLLER_ID}/api/v2/{suffix}")
}

async fn mount_discovery(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/info"))
        .respond_with(ok(&json!({
            "omadacId": CONTROLLER_ID,
            "controllerVer": "5.13.30.8",
            "apiVer": "3",
        })))
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(api("login")))
        .and(body_json(json!({ "username": "admin", "password": "hunter2" })))
        .respond_with(ok(&json!({ "roleType": 0, "token": token })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn sites_page(total: u64, names: &[&str]) -> serde_json::Value {
    let data: Vec<_> = names
        .iter()
        .map(|n| json!({ "id": format!("id-{n}"), "name": n }))
        .collect();
    json!({
        "totalRows": total,
        "currentPage": 1,
        "currentSize": 100,
        "data": data,
    })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_authenticate_rewrites_base_path() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    mount_login(&server, "tok-1", 1).await;

    session.authenticate().await.unwrap();

    let state = session.state();
    assert_eq!(state.base_url(), format!("{}/{CONTROLLER_ID}", server.uri()));
    assert_eq!(state.controller_id(), Some(CONTROLLER_ID));
    assert_eq!(state.token().unwrap().expose_secret(), "tok-1");
}

#[tokio::test]
async fn test_requests_target_controller_id_path() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    mount_login(&server, "tok-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api("sites")))
        .and(header(TOKEN_HEADER, "tok-1"))
        .respond_with(ok(&sites_page(1, &["Default"])))
        .expect(1)
        .mount(&server)
        .await;

    // Never hit the unprefixed path once discovery has run.
    Mock::given(method("GET"))
        .and(path("/api/v2/sites"))
        .respond_with(ok(&sites_page(0, &[])))
        .expect(0)
        .mount(&server)
        .await;

    session.authenticate().await.unwrap();
    let sites = session.list_sites().await.unwrap();

    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].name, "Default");
    assert_eq!(sites[0].key(), "id-Default");
}

#[tokio::test]
async fn test_discovery_without_identifier_fails() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/info"))
        .respond_with(ok(&json!({ "controllerVer": "5.13.30.8" })))
        .mount(&server)
        .await;

    let result = session.authenticate().await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!session.state().is_authenticated());
}

#[tokio::test]
async fn test_login_without_token_fails() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;

    Mock::given(method("POST"))
        .and(path(api("login")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errorCode": -30109,
            "msg": "Invalid username or password."
        })))
        .mount(&server)
        .await;

    let result = session.authenticate().await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(
                message.contains("-30109") && message.contains("Invalid username"),
                "unexpected message: {message}"
            );
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_login_is_not_token_expired() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;

    Mock::given(method("POST"))
        .and(path(api("login")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = session.authenticate().await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_reauthentication_clears_stale_token_before_discovery() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    mount_login(&server, "tok-1", 2).await;

    session.authenticate().await.unwrap();
    session.authenticate().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let discoveries: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/api/info")
        .collect();

    assert_eq!(discoveries.len(), 2);
    for req in discoveries {
        assert!(
            !req.headers.contains_key(TOKEN_HEADER),
            "discovery must not carry a token"
        );
    }
}

// ── Retry on expiry ─────────────────────────────────────────────────

#[tokio::test]
async fn test_expired_token_reauthenticates_once() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    // Initial login + exactly one re-login.
    mount_login(&server, "tok-1", 2).await;

    Mock::given(method("GET"))
        .and(path(api("sites")))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api("sites")))
        .respond_with(ok(&sites_page(1, &["Default"])))
        .mount(&server)
        .await;

    session.authenticate().await.unwrap();
    let sites = session.list_sites().await.unwrap();

    assert_eq!(sites.len(), 1);
}

#[tokio::test]
async fn test_permanently_expired_token_is_surfaced() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    mount_login(&server, "tok-1", 2).await;

    Mock::given(method("GET"))
        .and(path(api("sites")))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    session.authenticate().await.unwrap();
    let result = session.list_sites().await;

    assert!(
        matches!(result, Err(Error::TokenExpired)),
        "expected TokenExpired, got: {result:?}"
    );
}

// ── Envelope & listing ──────────────────────────────────────────────

#[tokio::test]
async fn test_nonzero_error_code_is_protocol_error() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    mount_login(&server, "tok-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api("sites")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errorCode": -1600,
            "msg": "Unsupported request path."
        })))
        .mount(&server)
        .await;

    session.authenticate().await.unwrap();
    let err = session.list_sites().await.unwrap_err();

    assert_eq!(err.api_error_code(), Some(-1600));
    assert!(err.is_protocol());
}

#[tokio::test]
async fn test_unexpected_status_is_protocol_error() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    mount_login(&server, "tok-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api("sites")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    session.authenticate().await.unwrap();
    let err = session.list_sites().await.unwrap_err();

    match err {
        Error::Protocol { ref message, code } => {
            assert!(message.contains("500"), "unexpected message: {message}");
            assert_eq!(code, None);
        }
        other => panic!("expected Protocol error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    mount_login(&server, "tok-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api("sites")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    session.authenticate().await.unwrap();
    let err = session.list_sites().await.unwrap_err();

    match err {
        Error::Deserialization { ref body, .. } => assert_eq!(body, "<html>login</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_sites_follows_pages() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    mount_login(&server, "tok-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api("sites")))
        .and(query_param("currentPage", "1"))
        .respond_with(ok(&sites_page(3, &["a", "b"])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api("sites")))
        .and(query_param("currentPage", "2"))
        .respond_with(ok(&sites_page(3, &["c"])))
        .mount(&server)
        .await;

    session.authenticate().await.unwrap();
    let names: Vec<_> = session
        .list_sites()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();

    assert_eq!(names, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_list_connected_clients() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    mount_login(&server, "tok-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api("sites/site-1/clients")))
        .and(query_param("filters.active", "true"))
        .and(header(TOKEN_HEADER, "tok-1"))
        .respond_with(ok(&json!({
            "totalRows": 1,
            "data": [{
                "mac": "AA-BB-CC-11-22-33",
                "name": "phone",
                "apMac": "10-20-30-40-50-60",
                "apName": "Office AP",
                "ssid": "home",
                "wireless": true,
                "channel": 36,
                "wifiMode": 5,
                "rssi": -52,
                "signalLevel": 88,
                "powerSave": false,
                "txRate": 866_000,
                "rxRate": 650_000,
                "trafficDown": 123_456,
                "trafficUp": 7890,
                "downPacket": 1000,
                "upPacket": 500,
                "lastSeen": 1_700_000_000_000_i64,
                "uptime": 3600
            }]
        })))
        .mount(&server)
        .await;

    session.authenticate().await.unwrap();
    let clients = session.list_connected_clients("site-1").await.unwrap();

    assert_eq!(clients.len(), 1);
    let sta = &clients[0];
    assert_eq!(sta.ap_name, "Office AP");
    assert_eq!(sta.rssi, -52);
    assert_eq!(sta.tx_rate, 866_000);
    assert_eq!(sta.uptime, 3600);
}

#[tokio::test]
async fn test_station_with_null_fields_keeps_the_page() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    mount_login(&server, "tok-1", 1).await;

    Mock::given(method("GET"))
        .and(path(api("sites/site-1/clients")))
        .respond_with(ok(&json!({
            "totalRows": 2,
            "data": [
                {
                    "mac": "AA-BB-CC-11-22-33",
                    "name": "laptop",
                    "ssid": null,
                    "apName": null,
                    "rssi": null
                },
                {
                    "mac": "AA-BB-CC-44-55-66",
                    "name": "phone",
                    "ssid": "home",
                    "apName": "Office AP",
                    "rssi": -60
                }
            ]
        })))
        .mount(&server)
        .await;

    session.authenticate().await.unwrap();
    let clients = session.list_connected_clients("site-1").await.unwrap();

    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].name, "laptop");
    assert_eq!(clients[0].ssid, "");
    assert_eq!(clients[0].ap_name, "");
    assert_eq!(clients[0].rssi, 0);
    assert_eq!(clients[1].ssid, "home");
}

// ── Shared session ──────────────────────────────────────────────────

#[tokio::test]
async fn test_overlapping_listings_share_one_session() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    // Initial login plus the single re-login triggered by the one 401.
    mount_login(&server, "tok-1", 2).await;

    Mock::given(method("GET"))
        .and(path(api("sites")))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(api("sites")))
        .respond_with(ok(&sites_page(1, &["Default"])))
        .mount(&server)
        .await;

    session.authenticate().await.unwrap();
    let (first, second) = tokio::join!(session.list_sites(), session.list_sites());

    assert_eq!(first.unwrap().len(), 1);
    assert_eq!(second.unwrap().len(), 1);

    let requests = server.received_requests().await.unwrap();
    let logins = requests
        .iter()
        .filter(|r| r.url.path() == api("login"))
        .count();
    assert!(logins <= 2, "expected at most two logins, saw {logins}");

    let listings: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path().ends_with("/api/v2/sites"))
        .collect();
    assert_eq!(listings.len(), 3);
    for req in listings {
        assert!(
            req.url.path().starts_with(&format!("/{CONTROLLER_ID}/")),
            "listing sent outside the controller path: {}",
            req.url.path()
        );
        assert_eq!(
            req.headers
                .get(TOKEN_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("tok-1")
        );
    }
}

#[tokio::test]
async fn test_concurrent_logins_leave_consistent_state() {
    let (server, session) = setup().await;
    mount_discovery(&server).await;
    mount_login(&server, "tok-1", 2).await;

    let (first, second) = tokio::join!(session.authenticate(), session.authenticate());
    first.unwrap();
    second.unwrap();

    let state = session.state();
    assert_eq!(state.base_url(), format!("{}/{CONTROLLER_ID}", server.uri()));
    assert_eq!(state.controller_id(), Some(CONTROLLER_ID));
    assert_eq!(state.token().unwrap().expose_secret(), "tok-1");
}
