//! Integration tests for `GeocodeClient` using wiremock HTTP mocks.

use courtfinder_geocode::{GeocodeClient, GeocodeError};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "courtfinder-test/1.0";

fn test_client(base_url: &str) -> GeocodeClient {
    GeocodeClient::with_base_url(
        Some("test-key"),
        &format!("{base_url}/geocode/json"),
        5,
        USER_AGENT,
    )
    .expect("client construction should not fail")
}

fn kitsilano_body() -> serde_json::Value {
    serde_json::json!({
        "status": "OK",
        "results": [
            {
                "formatted_address": "Kitsilano, Vancouver, BC, Canada",
                "geometry": { "location": { "lat": 49.2684, "lng": -123.1683 } }
            },
            {
                "formatted_address": "Kitsilano Beach, Vancouver, BC, Canada",
                "geometry": { "location": { "lat": 49.2733, "lng": -123.1536 } }
            }
        ]
    })
}

#[tokio::test]
async fn geocode_returns_first_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "Kitsilano"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kitsilano_body()))
        .mount(&server)
        .await;

    let coordinate = test_client(&server.uri())
        .geocode("Kitsilano")
        .await
        .expect("should geocode")
        .expect("should find a match");

    assert!((coordinate.latitude - 49.2684).abs() < 1e-9);
    assert!((coordinate.longitude + 123.1683).abs() < 1e-9);
}

#[tokio::test]
async fn geocode_trims_address() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("address", "Kitsilano"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kitsilano_body()))
        .mount(&server)
        .await;

    let found = test_client(&server.uri())
        .geocode("  Kitsilano \n")
        .await
        .expect("should geocode");
    assert!(found.is_some());
}

#[tokio::test]
async fn zero_results_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .mount(&server)
        .await;

    let found = test_client(&server.uri())
        .geocode("Atlantis")
        .await
        .expect("zero results is not an error");
    assert!(found.is_none());
}

#[tokio::test]
async fn request_denied_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .geocode("Kitsilano")
        .await
        .unwrap_err();
    assert!(matches!(err, GeocodeError::ApiError(_)), "got: {err:?}");
}

#[tokio::test]
async fn blank_address_is_rejected_without_a_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kitsilano_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).geocode("   ").await.unwrap_err();
    assert!(matches!(err, GeocodeError::EmptyAddress));
}

#[tokio::test]
async fn server_error_without_json_is_upstream_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .geocode("Kitsilano")
        .await
        .unwrap_err();
    assert!(
        matches!(err, GeocodeError::UpstreamStatus(500)),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn envelope_without_geometry_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [{ "formatted_address": "Somewhere" }]
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .geocode("Somewhere")
        .await
        .unwrap_err();
    assert!(
        matches!(err, GeocodeError::Deserialize { .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn lookup_raw_returns_body_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kitsilano_body()))
        .mount(&server)
        .await;

    let body = test_client(&server.uri())
        .lookup_raw("Kitsilano")
        .await
        .expect("raw body");
    let parsed: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(parsed, kitsilano_body());
}

#[tokio::test]
async fn lookup_raw_keeps_upstream_bytes() {
    let server = MockServer::start().await;
    let raw = r#"{"results":[],"status":"ZERO_RESULTS","html_attributions":[]}"#;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(raw, "application/json"))
        .mount(&server)
        .await;

    let body = test_client(&server.uri())
        .lookup_raw("Nowhere")
        .await
        .expect("raw body");
    assert_eq!(body, raw);
}

#[tokio::test]
async fn error_status_with_json_envelope_is_returned() {
    let server = MockServer::start().await;
    let envelope = serde_json::json!({
        "status": "INVALID_REQUEST",
        "error_message": "Invalid request.",
        "results": []
    });

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(&envelope))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let body = client.lookup_raw("Kitsilano").await.expect("raw body");
    let parsed: serde_json::Value = serde_json::from_str(&body).expect("json");
    assert_eq!(parsed, envelope);

    let err = client.geocode("Kitsilano").await.unwrap_err();
    assert!(
        matches!(err, GeocodeError::ApiError(ref m) if m == "INVALID_REQUEST: Invalid request."),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn configured_user_agent_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(kitsilano_body()))
        .expect(1)
        .mount(&server)
        .await;

    let found = test_client(&server.uri())
        .geocode("Kitsilano")
        .await
        .expect("should geocode");
    assert!(found.is_some());
}

#[tokio::test]
async fn proxy_client_omits_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/geocode"))
        .and(query_param("address", "Kitsilano"))
        .and(query_param_is_missing("key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kitsilano_body()))
        .mount(&server)
        .await;

    let client =
        GeocodeClient::via_proxy(&format!("{}/api/geocode", server.uri()), 5, USER_AGENT)
            .expect("proxy client");
    let found = client.geocode("Kitsilano").await.expect("should geocode");
    assert!(found.is_some());
}
