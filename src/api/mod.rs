//! REST API module using Axum
//!
//! JSON endpoints for wearable and phone clients:
//! - `POST /analyze_signal` full movement analysis
//! - `POST /fft` spectrum of the x axis
//! - `GET /health` and `GET /` for probes

pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::ApiState;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Build a CORS layer for the configured origins.
///
/// An empty list means same-origin only.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "CORS: ignoring unparseable origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return base;
    }

    tracing::info!(origins = ?origins, "CORS: allowing configured origins");
    base.allow_origin(allowed).allow_credentials(true)
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    let server: &ServerConfig = &state.config.server;
    let cors = build_cors_layer(&server.cors_origins);
    let timeout = Duration::from_secs(server.request_timeout_secs);
    let body_limit = server.max_body_bytes;

    routes::api_routes(state)
        // Middleware
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = create_app(ApiState::new(ServiceConfig::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_unknown_origin() {
        let app = create_app(ApiState::new(ServiceConfig::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://evil.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_body_limit_enforced() {
        let mut config = ServiceConfig::default();
        config.server.max_body_bytes = 64;
        let app = create_app(ApiState::new(config));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/fft")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::CONTENT_LENGTH, "1024")
                    .body(Body::from(vec![b' '; 1024]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
