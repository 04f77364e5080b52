//! End-to-end tests: the full pipeline through the HTTP surface with
//! wiremock standing in for the geocoding and forecast collaborators.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use weathervane::api;
use weathervane::{
    AppState, ClientForecast, ForecastCache, ForecastService, WeathervaneConfig, WeathervaneError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

// ============================================================================
// Test harness
// ============================================================================

fn test_config(geocoder: &MockServer, provider: &MockServer) -> WeathervaneConfig {
    let mut config = WeathervaneConfig::default();
    config.geocoding.base_url = geocoder.uri();
    config.weather.base_url = provider.uri();
    config
}

async fn serve(service: ForecastService) -> String {
    let state = AppState {
        service: Arc::new(service),
    };
    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn spawn_app(geocoder: &MockServer, provider: &MockServer) -> String {
    let service = ForecastService::new(&test_config(geocoder, provider)).expect("service wires up");
    serve(service).await
}

async fn get_forecast(base: &str, params: &[(&str, &str)]) -> (u16, Value) {
    let response = reqwest::Client::new()
        .get(format!("{base}/v1/forecast"))
        .query(params)
        .send()
        .await
        .expect("request completes");
    let status = response.status().as_u16();
    let body = response.json().await.expect("json body");
    (status, body)
}

/// Geocoder match for `address` with the given postcode
async fn mount_geocoder_match(geocoder: &MockServer, address: &str, postcode: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", address))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "lat": "52.5200066",
            "lon": "13.404954",
            "display_name": "Berlin, Deutschland",
            "address": { "city": "Berlin", "postcode": postcode, "country": "Deutschland" }
        }])))
        .expect(hits)
        .mount(geocoder)
        .await;
}

fn current_body() -> Value {
    json!({
        "current": { "time": "2025-11-13T10:00", "interval": 900, "temperature_2m": 12.5 },
        "current_units": { "time": "iso8601", "temperature_2m": "°C" },
        "daily": {
            "time": ["2025-11-13"],
            "temperature_2m_max": [21],
            "temperature_2m_min": [10]
        },
        "daily_units": { "temperature_2m_max": "°C", "temperature_2m_min": "°C" }
    })
}

fn daily_body() -> Value {
    json!({
        "current": { "time": "2025-11-13T10:00", "interval": 900, "temperature_2m": 12.5 },
        "current_units": { "time": "iso8601", "temperature_2m": "°C" },
        "daily": {
            "time": ["2025-11-13", "2025-11-14"],
            "temperature_2m_max": [21, 19.5],
            "temperature_2m_min": [10, 8],
            "temperature_2m_mean": [18, 14.5]
        },
        "daily_units": {
            "temperature_2m_max": "°C",
            "temperature_2m_min": "°C",
            "temperature_2m_mean": "°C"
        }
    })
}

fn hourly_body() -> Value {
    json!({
        "current": { "time": "2025-11-13T10:00", "interval": 900, "temperature_2m": 12.5 },
        "current_units": { "time": "iso8601", "temperature_2m": "°C" },
        "daily": {
            "time": ["2025-11-13"],
            "temperature_2m_max": [21],
            "temperature_2m_min": [10]
        },
        "daily_units": { "temperature_2m_max": "°C", "temperature_2m_min": "°C" },
        "hourly": {
            "time": ["2025-11-13T10:00", "2025-11-13T11:00"],
            "temperature_2m": [12.5, 13]
        },
        "hourly_units": { "temperature_2m": "°C" }
    })
}

// ============================================================================
// Success paths
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_reports_ok() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    let base = spawn_app(&geocoder, &provider).await;

    let response = reqwest::get(format!("{base}/health"))
        .await
        .expect("request completes");
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_current_forecast_end_to_end() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    mount_geocoder_match(&geocoder, "Alexanderplatz 1, Berlin", "10115", 1).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("forecast_days", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&provider)
        .await;

    let base = spawn_app(&geocoder, &provider).await;
    let (status, body) =
        get_forecast(&base, &[("address", "Alexanderplatz 1, Berlin")]).await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], "Forecast fetched successfully");
    assert_eq!(body["data"]["address"], "Berlin, Deutschland");
    assert_eq!(body["data"]["current_forecast"]["temperature"], "12.5°C");
    assert_eq!(body["data"]["current_forecast"]["min_temperature"], "10°C");
    assert_eq!(body["data"]["current_forecast"]["max_temperature"], "21°C");
    assert!(body["data"].get("extended_forecast").is_none());
}

#[tokio::test]
async fn test_daily_forecast_end_to_end() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    mount_geocoder_match(&geocoder, "Berlin", "10115", 1).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("forecast_days", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(1)
        .mount(&provider)
        .await;

    let base = spawn_app(&geocoder, &provider).await;
    let (status, body) =
        get_forecast(&base, &[("address", "Berlin"), ("forecast_type", "daily")]).await;

    assert_eq!(status, 200);
    assert_eq!(
        body["data"]["extended_forecast"][0],
        json!({
            "date": "2025-11-13",
            "min_temperature": "10°C",
            "max_temperature": "21°C",
            "mean_temperature": "18°C"
        })
    );
    assert_eq!(
        body["data"]["extended_forecast"][1]["mean_temperature"],
        "14.5°C"
    );
}

#[tokio::test]
async fn test_hourly_forecast_end_to_end() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    mount_geocoder_match(&geocoder, "Berlin", "10115", 1).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("forecast_hours", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body()))
        .expect(1)
        .mount(&provider)
        .await;

    let base = spawn_app(&geocoder, &provider).await;
    let (status, body) = get_forecast(
        &base,
        &[
            ("address", "Berlin"),
            ("forecast_type", "hourly"),
            ("forecast_hours", "2"),
        ],
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(
        body["data"]["extended_forecast"][0],
        json!({ "time": "2025-11-13T10:00", "temperature": "12.5°C" })
    );
    // today's bounds still come from the daily summary
    assert_eq!(body["data"]["current_forecast"]["min_temperature"], "10°C");
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_missing_address_is_rejected() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    let base = spawn_app(&geocoder, &provider).await;

    let (status, body) = get_forecast(&base, &[]).await;

    assert_eq!(status, 400);
    assert_eq!(body["message"], "Invalid parameters");
    assert_eq!(body["errors"], json!(["Address is required."]));
}

#[tokio::test]
async fn test_invalid_forecast_type_is_rejected() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    let base = spawn_app(&geocoder, &provider).await;

    let (status, body) = get_forecast(
        &base,
        &[("address", "Berlin"), ("forecast_type", "monthly")],
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(
        body["errors"],
        json!(["Forecast type must be either 'daily' or 'hourly'."])
    );
}

#[tokio::test]
async fn test_both_validation_errors_are_reported() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    let base = spawn_app(&geocoder, &provider).await;

    let (status, body) =
        get_forecast(&base, &[("address", ""), ("forecast_type", "monthly")]).await;

    assert_eq!(status, 400);
    assert_eq!(
        body["errors"],
        json!([
            "Address is required.",
            "Forecast type must be either 'daily' or 'hourly'."
        ])
    );
}

// ============================================================================
// Failure mapping
// ============================================================================

#[tokio::test]
async fn test_unknown_address_is_not_found() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&geocoder)
        .await;

    let base = spawn_app(&geocoder, &provider).await;
    let (status, body) = get_forecast(&base, &[("address", "Nowhere In Particular")]).await;

    assert_eq!(status, 404);
    assert_eq!(body["message"], "Fetching failed");
    assert_eq!(body["errors"], json!(["Location not found."]));
}

#[tokio::test]
async fn test_geocoder_outage_is_bad_gateway() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&geocoder)
        .await;

    let base = spawn_app(&geocoder, &provider).await;
    let (status, body) = get_forecast(&base, &[("address", "Berlin")]).await;

    assert_eq!(status, 502);
    assert_eq!(body["message"], "Fetching failed");
    let detail = body["errors"][0].as_str().expect("error detail");
    assert!(detail.starts_with("Geocoding failed:"), "got: {detail}");
}

#[tokio::test]
async fn test_provider_error_becomes_a_structured_failure() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    mount_geocoder_match(&geocoder, "Berlin", "10115", 1).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Temporarily unavailable" })),
        )
        .mount(&provider)
        .await;

    let base = spawn_app(&geocoder, &provider).await;
    let (status, body) = get_forecast(&base, &[("address", "Berlin")]).await;

    // an error-shaped provider payload must never serialize as success
    assert_eq!(status, 502);
    assert_eq!(body["message"], "Fetching failed");
    assert_eq!(body["errors"], json!(["Temporarily unavailable"]));
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_malformed_provider_body_is_internal_error() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    mount_geocoder_match(&geocoder, "Berlin", "10115", 1).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&provider)
        .await;

    let base = spawn_app(&geocoder, &provider).await;
    let (status, body) = get_forecast(&base, &[("address", "Berlin")]).await;

    assert_eq!(status, 500);
    assert_eq!(body["errors"], json!(["Invalid JSON response from the API."]));
}

// ============================================================================
// Caching behavior
// ============================================================================

#[tokio::test]
async fn test_repeat_request_is_served_from_cache() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    // resolution happens on every request; the provider must be hit once
    mount_geocoder_match(&geocoder, "Berlin", "10115", 2).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&provider)
        .await;

    let base = spawn_app(&geocoder, &provider).await;
    let (first_status, first_body) = get_forecast(&base, &[("address", "Berlin")]).await;
    let (second_status, second_body) = get_forecast(&base, &[("address", "Berlin")]).await;

    assert_eq!(first_status, 200);
    assert_eq!(second_status, 200);
    assert_eq!(first_body["data"], second_body["data"]);
}

#[tokio::test]
async fn test_distinct_spans_are_cached_separately() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    mount_geocoder_match(&geocoder, "Berlin", "10115", 2).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("forecast_days", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(1)
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("forecast_days", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(1)
        .mount(&provider)
        .await;

    let base = spawn_app(&geocoder, &provider).await;
    let (first, _) = get_forecast(
        &base,
        &[
            ("address", "Berlin"),
            ("forecast_type", "daily"),
            ("forecast_days", "3"),
        ],
    )
    .await;
    let (second, _) = get_forecast(
        &base,
        &[
            ("address", "Berlin"),
            ("forecast_type", "daily"),
            ("forecast_days", "5"),
        ],
    )
    .await;

    assert_eq!(first, 200);
    assert_eq!(second, 200);
}

struct FailingCache;

#[async_trait]
impl ForecastCache for FailingCache {
    async fn read(&self, _key: &str) -> weathervane::Result<Option<ClientForecast>> {
        Err(WeathervaneError::cache("backend offline"))
    }

    async fn write(
        &self,
        _key: &str,
        _payload: ClientForecast,
        _ttl: Duration,
    ) -> weathervane::Result<()> {
        Err(WeathervaneError::cache("backend offline"))
    }
}

#[tokio::test]
async fn test_cache_failure_does_not_fail_the_request() {
    let geocoder = MockServer::start().await;
    let provider = MockServer::start().await;
    mount_geocoder_match(&geocoder, "Berlin", "10115", 1).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&provider)
        .await;

    let service = ForecastService::with_cache(
        &test_config(&geocoder, &provider),
        Arc::new(FailingCache),
    )
    .expect("service wires up");
    let base = serve(service).await;

    let (status, body) = get_forecast(&base, &[("address", "Berlin")]).await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], "Forecast fetched successfully");
}
