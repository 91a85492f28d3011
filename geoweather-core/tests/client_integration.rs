//! Integration tests for OpenWeatherClient using wiremock.

use geoweather_core::{Coordinate, ErrorKind, OpenWeatherClient, WeatherClient, WeatherError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetch_sends_coordinates_and_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"name":"London"}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), mock_server.uri());
    let body = client
        .fetch(Coordinate::new(51.5, -0.12))
        .await
        .expect("request succeeds");

    assert_eq!(body, br#"{"name":"London"}"#.to_vec());
}

#[tokio::test]
async fn fetch_returns_body_untouched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let client = OpenWeatherClient::with_base_url("KEY".into(), mock_server.uri());
    let body = client
        .fetch(Coordinate::new(0.0, 0.0))
        .await
        .expect("client does not decode");

    assert_eq!(body, b"not json at all".to_vec());
}

#[tokio::test]
async fn unauthorized_is_a_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .mount(&mock_server)
        .await;

    let client = OpenWeatherClient::with_base_url("WRONG".into(), mock_server.uri());
    let err = client.fetch(Coordinate::new(1.0, 2.0)).await.unwrap_err();

    match &err {
        WeatherError::Status { status, body } => {
            assert_eq!(*status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Port 9 (discard) on loopback is closed on any sane test machine.
    let client = OpenWeatherClient::with_base_url("KEY".into(), "http://127.0.0.1:9");
    let err = client.fetch(Coordinate::new(1.0, 2.0)).await.unwrap_err();

    assert!(matches!(err, WeatherError::Request(_)));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn malformed_base_url_makes_no_request() {
    let client = OpenWeatherClient::with_base_url("KEY".into(), "::not a url::");
    let err = client.fetch(Coordinate::new(1.0, 2.0)).await.unwrap_err();

    assert!(matches!(err, WeatherError::InvalidUrl(_)));
}
