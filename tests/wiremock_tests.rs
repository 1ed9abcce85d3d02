//! Integration tests for the forecast client using wiremock
//!
//! These tests run the client against a mock Dark Sky server to check the
//! request it sends, how responses are stored, and how failures surface.

use darksky_summary::{AppError, Block, ClientConfig, ForecastClient, Period, SummaryStyle};
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const FORECAST_PATH: &str = "/forecast/test-key/37.8267,-122.4233";

/// Sample Dark Sky response for testing
fn sample_forecast_response() -> serde_json::Value {
    serde_json::json!({
        "latitude": 37.8267,
        "longitude": -122.4233,
        "timezone": "America/Los_Angeles",
        "currently": {
            "time": 1509993277,
            "summary": "Drizzle",
            "icon": "rain",
            "precipIntensity": 0.0089,
            "temperature": 15.8,
            "apparentTemperature": 14.3,
            "humidity": 0.83
        },
        "hourly": {
            "summary": "Light precipitation until this evening.",
            "icon": "rain",
            "data": []
        },
        "daily": {
            "summary": "Mixed precipitation throughout the week, with temperatures falling to -1°C on Sunday.",
            "icon": "rain",
            "data": [
                {"time": 1509951600, "summary": "Rain starting in the afternoon.", "temperatureMin": 10.4, "temperatureMax": 16.9},
                {"time": 1510038000, "summary": "Light precipitation overnight.", "temperatureMin": 8.2, "temperatureMax": 13.7},
                {"time": 1510124400, "summary": "Partly cloudy.", "temperatureMin": -1.3, "temperatureMax": 7.6}
            ]
        },
        "alerts": [
            {
                "title": "Flood Watch for Mason, WA",
                "time": 1509993360,
                "expires": 1510036680,
                "severity": "watch",
                "description": "...FLOOD WATCH REMAINS IN EFFECT...",
                "uri": "https://alerts.weather.gov/cap/wwacapget.php?x=WA1255E4DB8494.FloodWatch"
            }
        ],
        "flags": {"units": "si"}
    })
}

fn test_config(mock_server: &MockServer) -> ClientConfig {
    ClientConfig::new("test-key", "37.8267", "-122.4233")
        .unwrap()
        .with_base_url(format!("{}/forecast", mock_server.uri()))
        .with_timeout(Duration::from_secs(5))
}

fn create_test_client(config: ClientConfig) -> ForecastClient {
    ForecastClient::new(config).expect("Failed to create client")
}

async fn setup_forecast_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

fn ok_response() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(sample_forecast_response())
        .insert_header("Cache-Control", "max-age=3600")
        .insert_header("Expires", "Mon, 06 Nov 2017 19:34:37 +0000")
        .insert_header("X-Forecast-API-Calls", "42")
        .insert_header("X-Response-Time", "85.123ms")
}

// ============================================================================
// Success scenarios
// ============================================================================

#[tokio::test]
async fn test_fetch_and_summarize_today() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(&mock_server, ok_response()).await;

    let mut client = create_test_client(test_config(&mock_server));
    let result = client.fetch().await;
    assert!(result.is_ok(), "Expected success, got: {:?}", result.err());

    let text = client.summarize(Period::Today).unwrap();
    assert_eq!(
        text,
        "Alert for Flood Watch for Mason, WA. Drizzle and 15 degrees feeling like 14. \
         Expect Light rain until this evening."
    );
}

#[tokio::test]
async fn test_summarize_day_offsets() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(&mock_server, ok_response()).await;

    let mut client = create_test_client(test_config(&mock_server));
    client.fetch().await.unwrap();

    let tomorrow = client.summarize(Period::parse("tomorrow")).unwrap();
    assert_eq!(tomorrow, client.summarize(Period::from(1)).unwrap());
    assert_eq!(
        tomorrow,
        "Light rain overnight. With temperatures from 8 to 13 degrees"
    );

    assert_eq!(
        client.summarize(Period::Day(2)).unwrap(),
        "Partly cloudy. With temperatures from minus 1 to 7 degrees"
    );

    assert_eq!(
        client.summarize(Period::parse("bogus")).unwrap(),
        client.summarize(Period::Today).unwrap()
    );

    assert!(matches!(
        client.summarize(Period::Day(7)),
        Err(AppError::MissingField(_))
    ));
}

#[tokio::test]
async fn test_brief_style_wording() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(&mock_server, ok_response()).await;

    let config = test_config(&mock_server).with_style(SummaryStyle::Brief);
    let mut client = create_test_client(config);
    client.fetch().await.unwrap();

    let text = client.summarize(Period::Today).unwrap();
    assert!(text.ends_with("Expect Light rain until the this evening."), "{}", text);
    assert_eq!(
        client.summarize(Period::Day(2)).unwrap(),
        "Partly cloudy. With temperatures from -1 to 7 degrees"
    );
}

#[tokio::test]
async fn test_raw_response_is_verbatim() {
    let mock_server = MockServer::start().await;
    let body = r#"{"currently": {"summary": "Clear", "temperature": 1.0},   "hourly": {"summary": "calm."}}"#;
    setup_forecast_mock(&mock_server, ResponseTemplate::new(200).set_body_string(body)).await;

    let mut client = create_test_client(test_config(&mock_server));
    client.fetch().await.unwrap();

    assert_eq!(client.raw(), Some(body));
    assert_eq!(
        client.summarize(Period::Today).unwrap(),
        "Clear and 1 degrees. Expect calm."
    );
}

#[tokio::test]
async fn test_response_headers_are_recorded() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(&mock_server, ok_response()).await;

    let mut client = create_test_client(test_config(&mock_server));
    client.fetch().await.unwrap();

    let metadata = client.metadata().unwrap();
    assert_eq!(metadata.cache_control.as_deref(), Some("max-age=3600"));
    assert_eq!(
        metadata.expires.as_deref(),
        Some("Mon, 06 Nov 2017 19:34:37 +0000")
    );
    assert_eq!(metadata.api_calls.as_deref(), Some("42"));
    assert_eq!(metadata.response_time.as_deref(), Some("85.123ms"));
}

#[tokio::test]
async fn test_missing_headers_are_absent_not_errors() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_forecast_response()),
    )
    .await;

    let mut client = create_test_client(test_config(&mock_server));
    let result = client.fetch().await;
    assert!(result.is_ok(), "Expected success, got: {:?}", result.err());

    let metadata = client.metadata().unwrap();
    assert!(metadata.cache_control.is_none());
    assert!(metadata.expires.is_none());
    assert!(metadata.api_calls.is_none());
    assert!(metadata.response_time.is_none());
}

// ============================================================================
// Request verification
// ============================================================================

#[tokio::test]
async fn test_request_contains_query_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("units", "si"))
        .and(query_param("exclude", "minutely,alerts"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ok_response())
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server).with_exclude([Block::Alerts, Block::Minutely]);
    let mut client = create_test_client(config);
    let result = client.fetch().await;

    assert!(result.is_ok(), "Expected success, got: {:?}", result.err());
}

// ============================================================================
// Error handling scenarios
// ============================================================================

#[tokio::test]
async fn test_non_200_status_is_an_error() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(403).set_body_string("daily usage limit exceeded"),
    )
    .await;

    let mut client = create_test_client(test_config(&mock_server));
    let result = client.fetch().await;

    assert!(
        matches!(result, Err(AppError::HttpStatus { status: 403 })),
        "Expected HttpStatus, got: {:?}",
        result.err()
    );
    assert!(matches!(
        client.summarize(Period::Today),
        Err(AppError::NotFetched)
    ));
    assert!(client.raw().is_none());
}

#[tokio::test]
async fn test_failed_fetch_clears_previous_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ok_response())
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let mut client = create_test_client(test_config(&mock_server));
    client.fetch().await.unwrap();
    assert!(client.summarize(Period::Today).is_ok());

    let result = client.fetch().await;
    assert!(matches!(result, Err(AppError::HttpStatus { status: 500 })));
    assert!(matches!(
        client.summarize(Period::Today),
        Err(AppError::NotFetched)
    ));
}

#[tokio::test]
async fn test_invalid_json_response() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("not valid json"),
    )
    .await;

    let mut client = create_test_client(test_config(&mock_server));
    let result = client.fetch().await;

    assert!(
        matches!(result, Err(AppError::Parse(_))),
        "Expected Parse, got: {:?}",
        result.err()
    );
    assert_eq!(client.raw(), Some("not valid json"));
    assert!(matches!(
        client.summarize(Period::Today),
        Err(AppError::NotFetched)
    ));
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let mock_server = MockServer::start().await;
    setup_forecast_mock(
        &mock_server,
        ok_response().set_delay(Duration::from_secs(2)),
    )
    .await;

    let config = test_config(&mock_server).with_timeout(Duration::from_millis(200));
    let mut client = create_test_client(config);
    let result = client.fetch().await;

    assert!(
        matches!(result, Err(AppError::Timeout(_))),
        "Expected Timeout, got: {:?}",
        result.err()
    );
}

#[tokio::test]
async fn test_redirect_loop_is_reported() {
    let mock_server = MockServer::start().await;
    let location = format!("{}{}?units=si&exclude=hourly", mock_server.uri(), FORECAST_PATH);
    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(302).insert_header("Location", location.as_str()),
    )
    .await;

    let mut client = create_test_client(test_config(&mock_server));
    let result = client.fetch().await;

    assert!(
        matches!(result, Err(AppError::TooManyRedirects(_))),
        "Expected TooManyRedirects, got: {:?}",
        result.err()
    );
}

#[tokio::test]
async fn test_connection_failure_is_reported() {
    let config = ClientConfig::new("test-key", "37.8267", "-122.4233")
        .unwrap()
        .with_base_url("http://127.0.0.1:1/forecast")
        .with_timeout(Duration::from_secs(5));
    let mut client = create_test_client(config);
    let result = client.fetch().await;

    assert!(
        matches!(result, Err(AppError::Request(_))),
        "Expected Request, got: {:?}",
        result.err()
    );
}
