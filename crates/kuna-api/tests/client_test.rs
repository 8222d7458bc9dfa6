#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kuna_api::models::CameraPatch;
use kuna_api::transport::TransportConfig;
use kuna_api::{ApiClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_base_url(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

fn camera_json(serial: &str, name: &str) -> serde_json::Value {
    json!({
        "serial_number": serial,
        "name": name,
        "owner": { "email": "owner@example.com", "username": "owner" },
        "status": true,
        "bulb_on": false,
        "led_mask": true,
        "notifications_enabled": true,
        "recording_active": false,
        "volume": 75,
        "build": "7.51",
    })
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_authenticate_success_sets_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/account/auth/"))
        .and(body_json(json!({
            "email": "user@example.com",
            "password": "hunter2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-abc" })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter2".to_string().into();
    client.authenticate("user@example.com", &secret).await.unwrap();

    assert!(client.has_token());
    assert_eq!(client.token().as_deref(), Some("tok-abc"));
}

#[tokio::test]
async fn test_authenticate_missing_token_fails() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/account/auth/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.authenticate("user@example.com", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.has_token());
}

#[tokio::test]
async fn test_token_attached_to_subsequent_requests() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/account/auth/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-xyz" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/cameras/"))
        .and(header("Authorization", "Token tok-xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "pw".to_string().into();
    client.authenticate("user@example.com", &secret).await.unwrap();

    let cameras = client.list_cameras().await.unwrap();
    assert!(cameras.is_empty());
}

// ── Camera tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_cameras() {
    let (server, client) = setup().await;

    let body = json!({
        "results": [
            camera_json("SN001", "Front Door"),
            camera_json("SN002", "Garage"),
        ]
    });

    Mock::given(method("GET"))
        .and(path("/user/cameras/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let cameras = client.list_cameras().await.unwrap();

    assert_eq!(cameras.len(), 2);
    assert_eq!(cameras[0].serial_number, "SN001");
    assert_eq!(cameras[0].name.as_deref(), Some("Front Door"));
    assert!(cameras[0].status);
    assert_eq!(cameras[0].volume, Some(75));
    assert_eq!(
        cameras[0].owner.as_ref().unwrap().email.as_deref(),
        Some("owner@example.com")
    );
}

#[tokio::test]
async fn test_get_camera_requests_live_state() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/cameras/SN001/"))
        .and(query_param("live", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(camera_json("SN001", "Front Door")))
        .mount(&server)
        .await;

    let camera = client.get_camera("SN001").await.unwrap();

    assert_eq!(camera.serial_number, "SN001");
    assert_eq!(camera.build.as_deref(), Some("7.51"));
}

#[tokio::test]
async fn test_set_camera_properties_sends_only_set_keys() {
    let (server, client) = setup().await;

    // Exact body match: a volume-only patch must not carry the other keys.
    Mock::given(method("PATCH"))
        .and(path("/cameras/SN001/"))
        .and(body_json(json!({ "volume": 50 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let patch = CameraPatch {
        volume: Some(50),
        ..CameraPatch::default()
    };
    client.set_camera_properties("SN001", &patch).await.unwrap();
}

#[tokio::test]
async fn test_set_light_patches_bulb_only() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/cameras/SN001/"))
        .and(body_json(json!({ "bulb_on": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.set_light("SN001", true).await.unwrap();
}

#[tokio::test]
async fn test_set_notifications_targets_owner_subresource() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/cameras/SN001/users/owner@example.com/"))
        .and(body_json(json!({ "notifications_enabled": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .set_notifications("SN001", "owner@example.com", false)
        .await
        .unwrap();
}

// ── Recording tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_recordings_within_filters_client_side() {
    let (server, client) = setup().await;

    let now = chrono::Utc::now();
    let fmt = |ts: chrono::DateTime<chrono::Utc>| ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string();

    let body = json!({
        "results": [
            {
                "id": 1,
                "label": "Person",
                "timestamp": fmt(now - chrono::TimeDelta::minutes(30)),
                "duration": 12,
                "camera": { "serial_number": "SN001" },
                "mp4": "/recordings/1/mp4",
            },
            {
                "id": 2,
                "label": "Person",
                "timestamp": fmt(now - chrono::TimeDelta::hours(5)),
                "duration": 9,
                "camera": { "serial_number": "SN001" },
                "mp4": "/recordings/2/mp4",
            },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/cameras/SN001/recordings/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let recent = client
        .recordings_within("SN001", chrono::TimeDelta::hours(2))
        .await
        .unwrap();

    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, 1);
}

#[tokio::test]
async fn test_get_download_link_reads_location_header() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    // Exercise the pre-built-client constructor: the redirect client must
    // not follow the 302.
    let client = ApiClient::with_clients(
        reqwest::Client::new(),
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap(),
        base_url,
    );

    Mock::given(method("GET"))
        .and(path("/recordings/42/mp4/"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "https://cdn.example.com/42.mp4?sig=abc"),
        )
        .mount(&server)
        .await;

    let recording: kuna_api::Recording = serde_json::from_value(json!({
        "id": 42,
        "mp4": format!("{}/recordings/42/mp4", server.uri()),
    }))
    .unwrap();

    let link = client.get_download_link(&recording).await.unwrap();
    assert_eq!(link, "https://cdn.example.com/42.mp4?sig=abc");
}

#[tokio::test]
async fn test_get_download_link_without_location_fails() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/recordings/42/mp4/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let recording: kuna_api::Recording = serde_json::from_value(json!({
        "id": 42,
        "mp4": format!("{}/recordings/42/mp4", server.uri()),
    }))
    .unwrap();

    let result = client.get_download_link(&recording).await;

    assert!(
        matches!(result, Err(Error::MissingRedirect { .. })),
        "expected MissingRedirect, got: {result:?}"
    );
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_forbidden_maps_to_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/cameras/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = client.list_cameras().await;

    assert!(
        matches!(result, Err(Error::Unauthorized)),
        "expected Unauthorized, got: {result:?}"
    );
}

#[tokio::test]
async fn test_server_error_maps_to_typed_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/cameras/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let result = client.list_cameras().await;

    match result {
        Err(Error::Api { status, ref body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/cameras/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_cameras().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
