#![allow(clippy::unwrap_used)]
// Integration tests for `PlatformClient` using wiremock.

use std::time::Duration;

use chrono::Utc;
use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use xpone_api::probe::{self, Candidate, Capability, parse_list};
use xpone_api::{ApiBase, Credentials, Error, Method, PlatformClient, TokenPair};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_with(api_base: ApiBase) -> (MockServer, PlatformClient) {
    let server = MockServer::start().await;
    let client = PlatformClient::with_client(
        reqwest::Client::new(),
        &server.uri(),
        api_base,
        Duration::from_secs(5),
    )
    .unwrap();
    (server, client)
}

async fn setup() -> (MockServer, PlatformClient) {
    setup_with(ApiBase::Direct).await
}

fn mgmt(suffix: &str) -> String {
    format!("/management/{suffix}")
}

fn tokens(access: &str, refresh: Option<&str>, expires_in: Option<i64>) -> TokenPair {
    TokenPair::new(
        SecretString::from(access.to_owned()),
        refresh.map(|r| SecretString::from(r.to_owned())),
        expires_in,
        None,
        Utc::now(),
    )
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token_pair() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(mgmt("v1/oauth2/token")))
        .and(body_partial_json(json!({
            "grantType": "password",
            "userId": "admin",
            "password": "secret",
            "scope": "ops",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "refresh_token": "ref-1",
            "token_type": "Bearer",
            "expires_in": 3600,
            "idle_timeout": 900,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let creds =
        Credentials::new("admin", SecretString::from("secret".to_owned())).with_scope("ops");
    let pair = client.login(&creds).await.unwrap();

    assert_eq!(pair.access_token.expose_secret(), "tok-1");
    assert!(pair.can_refresh());
    assert_eq!(pair.idle_timeout_secs, Some(900));
    assert!(!pair.is_expired());
    assert!(client.is_authenticated().await);
}

#[tokio::test]
async fn test_login_failure_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(mgmt("v1/oauth2/token")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "errorMessage": "Invalid credentials" }]
        })))
        .mount(&server)
        .await;

    let creds = Credentials::new("admin", SecretString::from("wrong".to_owned()));
    let result = client.login(&creds).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("Invalid credentials"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!client.is_authenticated().await);
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let (server, client) = setup().await;
    client.restore_session(tokens("tok-1", None, None)).await;

    Mock::given(method("GET"))
        .and(path(mgmt("v1/aps")))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "serialNumber": "A1" }])))
        .expect(1)
        .mount(&server)
        .await;

    let aps = client.get_access_points().await.unwrap();
    assert_eq!(aps, vec![json!({ "serialNumber": "A1" })]);
}

#[tokio::test]
async fn test_unauthorized_refreshes_and_retries_once() {
    let (server, client) = setup().await;
    client.restore_session(tokens("old", Some("ref-1"), None)).await;

    Mock::given(method("GET"))
        .and(path(mgmt("v1/stations")))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(mgmt("v1/oauth2/token")))
        .and(body_partial_json(json!({
            "grantType": "refresh_token",
            "refreshToken": "ref-1",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(mgmt("v1/stations")))
        .and(header("authorization", "Bearer new"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "mac": "AA" }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let stations = client.get_stations().await.unwrap();
    assert_eq!(stations.len(), 1);

    // The refresh response omitted a refresh token; the old one is kept.
    let session = client.session().await.unwrap();
    assert_eq!(session.access_token.expose_secret(), "new");
    assert_eq!(
        session.refresh_token.as_ref().map(|t| t.expose_secret().to_owned()),
        Some("ref-1".to_owned())
    );
}

#[tokio::test]
async fn test_failed_refresh_is_session_expired() {
    let (server, client) = setup().await;
    client.restore_session(tokens("old", Some("ref-1"), None)).await;

    Mock::given(method("GET"))
        .and(path(mgmt("v1/services")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(mgmt("v1/oauth2/token")))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let result = client.get_services().await;

    match result {
        Err(ref e @ Error::SessionExpired) => {
            assert!(e.to_string().contains("Session expired"));
        }
        other => panic!("expected SessionExpired, got: {other:?}"),
    }
    assert!(!client.is_authenticated().await);
}

#[tokio::test]
async fn test_expired_token_without_refresh_fails_before_request() {
    let (server, client) = setup().await;
    client.restore_session(tokens("stale", None, Some(0))).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.get_sites().await;
    assert!(matches!(result, Err(Error::SessionExpired)), "got: {result:?}");
}

#[tokio::test]
async fn test_logout_revokes_and_clears() {
    let (server, client) = setup().await;
    client.restore_session(tokens("tok-1", Some("ref-1"), None)).await;

    Mock::given(method("DELETE"))
        .and(path(mgmt("v1/oauth2/token/tok-1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await.unwrap();
    assert!(!client.is_authenticated().await);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_requests_share_one_refresh() {
    let (server, client) = setup().await;
    client
        .restore_session(tokens("stale", Some("ref-1"), Some(0)))
        .await;

    // Refresh tokens rotate: the first exchange spends "ref-1".
    Mock::given(method("POST"))
        .and(path(mgmt("v1/oauth2/token")))
        .and(body_partial_json(json!({ "refreshToken": "ref-1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "access_token": "fresh",
                    "refresh_token": "ref-2",
                    "expires_in": 3600,
                }))
                .set_delay(Duration::from_millis(100)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(mgmt("v1/oauth2/token")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (stations, aps, services, sites) = tokio::join!(
        client.get_stations(),
        client.get_access_points(),
        client.get_services(),
        client.get_sites(),
    );
    assert!(stations.is_ok(), "{stations:?}");
    assert!(aps.is_ok(), "{aps:?}");
    assert!(services.is_ok(), "{services:?}");
    assert!(sites.is_ok(), "{sites:?}");

    let session = client.session().await.unwrap();
    assert_eq!(session.access_token.expose_secret(), "fresh");
    assert_eq!(
        session.refresh_token.as_ref().map(|t| t.expose_secret().to_owned()),
        Some("ref-2".to_owned())
    );
}

#[tokio::test]
async fn test_rejected_token_reuses_pair_refreshed_meanwhile() {
    let (server, client) = setup().await;
    client.restore_session(tokens("old", Some("ref-1"), None)).await;

    Mock::given(method("GET"))
        .and(path(mgmt("v1/aps")))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(mgmt("v1/aps")))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(mgmt("v1/oauth2/token")))
        .and(body_partial_json(json!({ "refreshToken": "ref-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new",
            "refresh_token": "ref-2",
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(mgmt("v1/oauth2/token")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (first, second) = tokio::join!(client.get_access_points(), client.get_access_points());
    assert!(first.is_ok(), "{first:?}");
    assert!(second.is_ok(), "{second:?}");
    assert!(client.is_authenticated().await);
}

// ── Requests ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_success_status_resolves() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(mgmt("v1/aps")))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let resp = client
        .request(Method::GET, "v1/aps", None, None)
        .await
        .unwrap();
    assert!(!resp.ok());
    assert_eq!(resp.status(), 503);
    assert_eq!(resp.text(), "busy");
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(mgmt("v1/aps")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let result = client
        .request(Method::GET, "v1/aps", None, Some(Duration::from_millis(50)))
        .await;

    match result {
        Err(e @ Error::Timeout { .. }) => assert!(e.to_string().contains("timed out")),
        other => panic!("expected Timeout, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_access_point_puts_body() {
    let (server, client) = setup().await;

    let body = json!({ "serialNumber": "AP1", "apName": "Lobby" });
    Mock::given(method("PUT"))
        .and(path(mgmt("v1/aps/AP1")))
        .and(body_partial_json(&body))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let echoed = client.update_access_point("AP1", &body).await.unwrap();
    assert_eq!(echoed, body);
}

#[tokio::test]
async fn test_update_service_validation_error() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(mgmt("v1/services/svc-1")))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": [{ "errorMessage": "vlan out of range", "errorCode": 4022 }]
        })))
        .mount(&server)
        .await;

    let result = client.update_service("svc-1", &json!({ "vlan": 5000 })).await;
    match result {
        Err(Error::Api {
            status,
            ref message,
            ref code,
        }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "vlan out of range");
            assert_eq!(code.as_deref(), Some("4022"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_proxied_base_path() {
    let (server, client) = setup_with(ApiBase::Proxied).await;

    Mock::given(method("GET"))
        .and(path("/api/management/v3/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "s1" }])))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.get_sites().await.unwrap().len(), 1);
}

// ── Capability probing ──────────────────────────────────────────────

#[tokio::test]
async fn test_probe_falls_through_to_next_candidate() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(mgmt("v3/sites")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(mgmt("v1/sites")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "s1" }])))
        .expect(1)
        .mount(&server)
        .await;

    let probed = client.probe(&probe::sites()).await.unwrap();
    assert_eq!(probed.path, "v1/sites");
    assert_eq!(probed.value.len(), 1);
}

#[tokio::test]
async fn test_probe_skips_bodies_the_parser_rejects() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(mgmt("v1/report/dashboard")))
        .respond_with(ResponseTemplate::new(501))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(mgmt("v1/dashboard")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(mgmt("v3/dashboard")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "apCount": 3 })))
        .mount(&server)
        .await;

    let probed = client.probe(&probe::dashboard()).await.unwrap();
    assert_eq!(probed.path, "v3/dashboard");
    assert_eq!(probed.value.get("apCount"), Some(&json!(3)));
}

#[tokio::test]
async fn test_exhausted_analytics_probe_is_suppressed() {
    let (_server, client) = setup().await;

    let result = client.probe(&probe::ap_report("AP1")).await;

    match result {
        Err(ref e @ Error::SuppressedAnalytics { .. }) => {
            assert!(e.to_string().starts_with(xpone_api::SUPPRESSED_ANALYTICS_ERROR));
            assert!(e.is_suppressed());
        }
        other => panic!("expected SuppressedAnalytics, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_exhausted_probe_is_unavailable() {
    let (_server, client) = setup().await;

    let capability = Capability::new(
        "widgets",
        vec![
            Candidate::new("v1/widgets", parse_list),
            Candidate::new("v2/widgets", parse_list),
        ],
    )
    .with_timeout(Duration::from_secs(1));

    match client.probe(&capability).await {
        Err(Error::CapabilityUnavailable { capability, tried }) => {
            assert_eq!(capability, "widgets");
            assert_eq!(tried, 2);
        }
        other => panic!("expected CapabilityUnavailable, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_aborts_on_session_expiry() {
    let (server, client) = setup().await;
    client.restore_session(tokens("stale", None, Some(0))).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.probe(&probe::sites()).await;
    assert!(matches!(result, Err(Error::SessionExpired)), "got: {result:?}");
}
