//! Shared helpers for integration tests: build the real router against a
//! mock upstream and drive it in-process.

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use nasa_explorer::config::AppConfig;
use nasa_explorer::handlers::AppState;
use nasa_explorer::routes::build_router;
use serde_json::Value;
use tower::ServiceExt;

/// Build the application with every upstream base URL pointed at the mock
/// server.
pub fn build_test_app(upstream_url: &str) -> Router {
    let config = AppConfig {
        port: 0,
        nasa_api_key: "TEST_KEY".to_string(),
        nasa_api_url: upstream_url.to_string(),
        epic_api_url: upstream_url.to_string(),
        eonet_api_url: upstream_url.to_string(),
        images_api_url: upstream_url.to_string(),
    };
    let state = AppState::from_config(&config).expect("client construction cannot fail");
    build_router(state)
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request"),
    )
    .await
    .expect("infallible router call")
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("JSON body")
}
