mod dlsite;

use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use dlmeta_scraper::{DlsiteClient, ScraperError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<DlsiteClient>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

/// Error response. Serializes as `{"error": "<code or message>"}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }

    pub fn missing_code() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "MISSING_CODE")
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND")
    }
}

impl From<&ScraperError> for ApiError {
    fn from(error: &ScraperError) -> Self {
        let status = match error {
            ScraperError::ProductNotFound { .. } => StatusCode::NOT_FOUND,
            ScraperError::UpstreamRequest { .. } => StatusCode::BAD_GATEWAY,
            ScraperError::EmptyCode => StatusCode::BAD_REQUEST,
            ScraperError::Http(_) | ScraperError::InvalidBaseUrl { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/dlsite", get(dlsite::lookup_product))
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

async fn fallback() -> ApiError {
    ApiError::not_found()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_app(base_url: &str) -> Router {
        let client = DlsiteClient::with_base_url(5, "dlmeta-test/0.1", base_url)
            .expect("failed to build test client");
        build_app(AppState {
            client: Arc::new(client),
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    #[test]
    fn api_error_maps_scraper_errors_to_status() {
        let not_found = ApiError::from(&ScraperError::ProductNotFound {
            code: "RJ1".to_string(),
        });
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.error, "DLSITE_PRODUCT_NOT_FOUND");

        let upstream = ApiError::from(&ScraperError::UpstreamRequest {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            url: "https://www.dlsite.com/".to_string(),
        });
        assert_eq!(upstream.status, StatusCode::BAD_GATEWAY);
        assert_eq!(upstream.error, "DLsite request failed: 503 Service Unavailable");

        let empty = ApiError::from(&ScraperError::EmptyCode);
        assert_eq!(empty.status, StatusCode::BAD_REQUEST);

        let config = ApiError::from(&ScraperError::InvalidBaseUrl {
            base_url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        });
        assert_eq!(config.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, json) = get_json(test_app("http://127.0.0.1:9"), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn missing_or_blank_code_is_bad_request() {
        for uri in ["/api/dlsite", "/api/dlsite?code=", "/api/dlsite?code=%20%20"] {
            let (status, json) = get_json(test_app("http://127.0.0.1:9"), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json["error"], "MISSING_CODE", "{uri}");
        }
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let (status, json) = get_json(test_app("http://127.0.0.1:9"), "/api/other").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn preflight_is_answered_with_cors_headers() {
        let response = test_app("http://127.0.0.1:9")
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/dlsite?code=RJ1")
                    .header(header::ORIGIN, "https://example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let response = test_app("http://127.0.0.1:9")
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "req-abc")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-abc")
        );
    }

    #[tokio::test]
    async fn lookup_returns_product_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maniax/work/=/product_id/RJ01527759.html"))
            .and(query_param("locale", "zh_CN"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body>
                <h1 id="work_name">【20%OFF】JKフェラチオ！ だぶるアニメ！</h1>
                <table id="work_maker"><tr><th>サークル名</th><td>
                  <a href="/maniax/circle/profile/=/maker_id/RG41088.html">Whisp</a>
                </td></tr></table>
                </body></html>"#,
            ))
            .mount(&server)
            .await;

        let (status, json) = get_json(test_app(&server.uri()), "/api/dlsite?code=rj01527759").await;

        assert_eq!(status, StatusCode::OK);
        let data = &json["data"];
        assert_eq!(data["rj_code"], "RJ01527759");
        assert_eq!(data["title_default"], "JKフェラチオ！ だぶるアニメ！");
        assert_eq!(data["circle_name"], "Whisp");
        // Secondary pages were not mounted, so both titles are omitted.
        assert!(data.get("title_jp").is_none());
        assert!(data.get("title_en").is_none());
    }

    #[tokio::test]
    async fn lookup_of_unknown_product_is_not_found() {
        let server = MockServer::start().await;

        let (status, json) = get_json(test_app(&server.uri()), "/api/dlsite?code=RJ09999999").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "DLSITE_PRODUCT_NOT_FOUND");
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (status, json) = get_json(test_app(&server.uri()), "/api/dlsite?code=RJ01527759").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "DLsite request failed: 500 Internal Server Error");
    }
}
