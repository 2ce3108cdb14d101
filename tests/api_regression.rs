//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! every endpoint using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port.

use std::f64::consts::PI;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use tremorscope::api::{create_app, ApiState};
use tremorscope::config::ServiceConfig;

fn create_test_state() -> ApiState {
    ApiState::new(ServiceConfig::default())
}

/// 5 Hz tremor on x, 1 Hz sway on y, small 3 Hz component on z; 22 Hz clock.
fn tremor_recording(n: usize) -> Value {
    let accelerometer: Vec<Value> = (0..n)
        .map(|i| {
            let t = i as f64 / 22.0;
            json!({
                "x": (2.0 * PI * 5.0 * t).sin(),
                "y": (2.0 * PI * 1.0 * t).cos(),
                "z": 0.1 * (2.0 * PI * 3.0 * t).sin(),
                "timestamp": t,
            })
        })
        .collect();
    json!({ "accelerometer": accelerometer, "gyroscope": [] })
}

async fn post(uri: &str, body: &Value) -> (StatusCode, Value) {
    let app = create_app(create_test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

/// GET endpoints should return 200 JSON objects.
#[tokio::test]
async fn test_get_endpoints_return_200() {
    for endpoint in ["/", "/health"] {
        let app = create_app(create_test_state());
        let resp = app
            .oneshot(Request::builder().uri(endpoint).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK, "GET {endpoint}");
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json.is_object(), "GET {endpoint} should return a JSON object");
    }
}

/// Full analysis returns every section with the established key spellings.
#[tokio::test]
async fn test_analyze_signal_full_payload() {
    let (status, v) = post("/analyze_signal", &tremor_recording(44)).await;
    assert_eq!(status, StatusCode::OK, "{v}");

    for section in [
        "original_metrics",
        "correlations",
        "fft",
        "wavelet",
        "entropy",
        "movement_analysis",
        "clinical_metrics",
    ] {
        assert!(v[section].is_object(), "missing section {section}");
    }

    assert!(v["original_metrics"]["min amplitude"].is_number());
    assert!(v["original_metrics"]["range amplitude"].is_number());
    assert!(v["movement_analysis"]["axis_symetry"].is_number());
    for pair in ["x_y", "x_z", "y_z"] {
        let p = &v["correlations"][pair];
        assert!(p["correlation"].is_number());
        assert!(p["p_value"].is_number());
        assert!(p["significance"].is_string());
    }

    let dominant = v["fft"]["dominat_frequency"].as_f64().unwrap();
    assert!((dominant - 5.0).abs() <= 0.5, "dominant = {dominant}");
    assert_eq!(v["fft"]["frequency"].as_array().unwrap().len(), 22);
    assert_eq!(v["fft"]["spectrum"].as_array().unwrap().len(), 22);

    assert_eq!(v["wavelet"]["scales"].as_array().unwrap().len(), 31);
    assert_eq!(v["wavelet"]["frequencies"].as_array().unwrap().len(), 31);
    let rows = v["wavelet"]["coefficients"].as_array().unwrap();
    assert_eq!(rows.len(), 31);
    assert!(rows.iter().all(|r| r.as_array().unwrap().len() == 44));

    assert_eq!(v["entropy"]["status"], "computed");
    assert!(v["entropy"]["amplitude_metrics"]["std_amplitude"].is_number());
    assert_eq!(v["sampling_rate_hz"], 22.0);
}

/// `sampling_rate_hz` in the body overrides the configured default.
#[tokio::test]
async fn test_request_sampling_rate_override() {
    let mut body = tremor_recording(44);
    body["sampling_rate_hz"] = json!(44.0);

    let (status, v) = post("/analyze_signal", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["sampling_rate_hz"], 44.0);
    let dominant = v["fft"]["dominat_frequency"].as_f64().unwrap();
    assert!((dominant - 10.0).abs() <= 0.5, "dominant = {dominant}");
}

/// POST /fft returns the half-spectrum only.
#[tokio::test]
async fn test_fft_endpoint_shape() {
    let (status, v) = post("/fft", &tremor_recording(44)).await;
    assert_eq!(status, StatusCode::OK);

    let freqs = v["frequency"].as_array().unwrap();
    let mags = v["spectrum"].as_array().unwrap();
    assert_eq!(freqs.len(), 22);
    assert_eq!(mags.len(), 22);
    assert_eq!(freqs[0], 0.0);
    assert!((freqs[10].as_f64().unwrap() - 5.0).abs() < 1e-9);
}

/// A flat x axis cannot be scored: 422 DEGENERATE_INPUT, never NaN.
#[tokio::test]
async fn test_all_zero_signal_is_degenerate() {
    let accelerometer: Vec<Value> = (0..44)
        .map(|i| json!({ "x": 0.0, "y": 0.0, "z": 0.0, "timestamp": i as f64 / 22.0 }))
        .collect();
    let (status, v) = post("/analyze_signal", &json!({ "accelerometer": accelerometer })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["error"]["code"], "DEGENERATE_INPUT");
    assert!(v["meta"]["version"].is_string());
}

/// A record missing an axis is rejected by the extractor.
#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let body = json!({ "accelerometer": [ { "x": 1.0, "y": 2.0, "timestamp": 0.0 } ] });
    let (status, v) = post("/analyze_signal", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_non_positive_sampling_rate_rejected() {
    let mut body = tremor_recording(44);
    body["sampling_rate_hz"] = json!(-1.0);

    let (status, v) = post("/fft", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"]["code"], "INVALID_SAMPLING_RATE");
}

#[tokio::test]
async fn test_too_few_samples_rejected() {
    let (status, v) = post("/fft", &tremor_recording(3)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["error"]["code"], "INSUFFICIENT_LENGTH");
}

/// Windows above `analysis.max_samples` never reach the numeric core.
#[tokio::test]
async fn test_oversized_window_rejected() {
    let mut config = ServiceConfig::default();
    config.analysis.max_samples = 64;

    for uri in ["/analyze_signal", "/fft"] {
        let app = create_app(ApiState::new(config.clone()));
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(tremor_recording(65).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "POST {uri}");
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["error"]["code"], "WINDOW_TOO_LONG");
    }

    // At the limit the window is accepted
    let (status, _) = post("/fft", &tremor_recording(64)).await;
    assert_eq!(status, StatusCode::OK);
}

/// Unknown routes fall through to 404.
#[tokio::test]
async fn test_unknown_route_404() {
    let app = create_app(create_test_state());
    let resp = app
        .oneshot(Request::builder().uri("/items/1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
