//! Integration Tests for the HTTP Prediction Service
//!
//! Runs the real client against a one-shot HTTP server on a loopback port
//! and checks request shape, response parsing and error mapping.

use std::time::Duration;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use predictor_core::error::{GENERIC_SERVICE_MESSAGE, GENERIC_TRANSPORT_MESSAGE};
use predictor_core::{
    HttpPredictionService, ParameterInputModel, Pollutant, PredictionError, PredictionService,
    RequestOrchestrator, RequestState,
};

// ============================================================================
// One-shot Server
// ============================================================================

/// What the server saw
#[derive(Debug)]
struct CapturedRequest {
    method: String,
    path: String,
    body: Value,
}

/// Serve one canned response and report the request
async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed mid-body");
            buf.extend_from_slice(&chunk[..n]);
        }

        let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
        let method = request_line.next().unwrap_or_default().to_string();
        let path = request_line.next().unwrap_or_default().to_string();
        let request_body: Value =
            serde_json::from_slice(&buf[header_end..header_end + content_length])
                .unwrap_or(Value::Null);

        let response = format!(
            "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        CapturedRequest {
            method,
            path,
            body: request_body,
        }
    });

    (base_url, handle)
}

fn june_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn client(base_url: &str) -> HttpPredictionService {
    HttpPredictionService::new(base_url, Some(Duration::from_secs(5))).unwrap()
}

// ============================================================================
// Requests and successful responses
// ============================================================================

#[tokio::test]
async fn test_date_request_shape_and_result() {
    let (base_url, server) = serve_once(200, r#"{"category":"Baik"}"#).await;

    let result = client(&base_url).predict_by_date(june_first()).await.unwrap();
    assert_eq!(result.category, "Baik");
    assert_eq!(result.critical_parameters, None);

    let request = server.await.unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/predict/date");
    assert_eq!(request.body, json!({ "date": "2024-06-01" }));
}

#[tokio::test]
async fn test_parameter_request_shape_and_critical_parameters() {
    let (base_url, server) = serve_once(
        200,
        r#"{"category":"Tidak Sehat","critical_parameters":["PM10","O3"],"max_value":182.0}"#,
    )
    .await;

    let mut model = ParameterInputModel::new();
    model.set(Pollutant::Pm10, 180.0);
    let result = client(&base_url)
        .predict_by_parameters(&model.snapshot())
        .await
        .unwrap();

    assert_eq!(
        result.critical_parameters,
        Some(vec!["PM10".to_string(), "O3".to_string()])
    );
    assert_eq!(result.max_value, Some(182.0));

    let request = server.await.unwrap();
    assert_eq!(request.path, "/api/predict/weather");
    assert_eq!(
        request.body,
        json!({ "pm10": 180.0, "co": 1.5, "so2": 20.0, "no2": 25.0, "o3": 35.0 })
    );
}

#[tokio::test]
async fn test_camel_case_fields_accepted() {
    let (base_url, _server) = serve_once(
        200,
        r#"{"category":"Sedang","criticalParameters":["CO"],"maxValue":64.5}"#,
    )
    .await;

    let result = client(&base_url)
        .predict_by_parameters(&ParameterInputModel::new().snapshot())
        .await
        .unwrap();
    assert_eq!(result.critical_parameters, Some(vec!["CO".to_string()]));
    assert_eq!(result.max_value, Some(64.5));
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn test_service_error_message_is_verbatim() {
    let (base_url, _server) = serve_once(400, r#"{"error":"bad date"}"#).await;

    let mut orchestrator = RequestOrchestrator::new(client(&base_url));
    orchestrator.submit_date_request(Some(june_first()));
    let state = timeout(Duration::from_secs(10), orchestrator.settle())
        .await
        .unwrap();

    assert_eq!(state, &RequestState::Failed("bad date".to_string()));
}

#[tokio::test]
async fn test_unreadable_error_body_uses_generic_message() {
    let (base_url, _server) = serve_once(500, "Internal Server Error").await;

    let err = client(&base_url)
        .predict_by_date(june_first())
        .await
        .unwrap_err();
    match err {
        PredictionError::Service { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, GENERIC_SERVICE_MESSAGE);
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_blank_error_message_uses_generic_message() {
    for body in [r#"{"error":""}"#, r#"{"error":"   "}"#] {
        let (base_url, _server) = serve_once(400, body).await;

        let mut orchestrator = RequestOrchestrator::new(client(&base_url));
        orchestrator.submit_date_request(Some(june_first()));
        let state = timeout(Duration::from_secs(10), orchestrator.settle())
            .await
            .unwrap();

        assert_eq!(
            state,
            &RequestState::Failed(GENERIC_SERVICE_MESSAGE.to_string()),
            "error body {body}"
        );
    }
}

#[tokio::test]
async fn test_malformed_success_body_is_transport_error() {
    let (base_url, _server) = serve_once(200, r#"{"prediction":"Baik"}"#).await;

    let mut orchestrator = RequestOrchestrator::new(client(&base_url));
    orchestrator.submit_date_request(Some(june_first()));
    let state = timeout(Duration::from_secs(10), orchestrator.settle())
        .await
        .unwrap();

    assert_eq!(state, &RequestState::Failed(GENERIC_TRANSPORT_MESSAGE.to_string()));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/api"))
        .predict_by_date(june_first())
        .await
        .unwrap_err();
    assert!(matches!(err, PredictionError::Transport(_)));
    assert_eq!(err.user_message(), GENERIC_TRANSPORT_MESSAGE);
}
