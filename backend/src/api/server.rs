//! HTTP server for the mission control API.
//!
//! # API Endpoints
//!
//! | Method | Path                | Description                              |
//! |--------|---------------------|------------------------------------------|
//! | GET    | `/health`           | Health check                             |
//! | POST   | `/api/analyze`      | Multipart upload: `file` + `mode` fields |
//! | POST   | `/api/analyze/text` | JSON body: `{ "csv": ..., "mode": ... }` |
//! | GET    | `/api/logs`         | SSE stream for real-time logs            |

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_info, LOG_BROADCASTER};
use super::types::{analysis_error_response, error_response, AnalysisResponse, AnalyzeRequest};
use crate::analysis::{analyze_bytes, analyze_text};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, ServerResult};
use crate::models::FlightMode;

type ApiError = (StatusCode, Json<Value>);

/// Shared, read-only server state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AnalysisConfig>,
}

/// Build the router with its routes and CORS layer.
pub fn router(config: AnalysisConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/analyze", post(analyze_upload))
        .route("/api/analyze/text", post(analyze_json))
        .route("/api/logs", get(sse_logs))
        // Uploads are bounded by memory only
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(port: u16, config: AnalysisConfig) -> ServerResult<()> {
    let app = router(config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    eprintln!("🚀 Mission control server running on http://localhost:{}", port);
    eprintln!("   POST /api/analyze       - Upload CSV file");
    eprintln!("   POST /api/analyze/text  - Analyze CSV text");
    eprintln!("   GET  /api/logs          - SSE log stream");
    eprintln!("   GET  /health            - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "mission-control",
        "version": env!("CARGO_PKG_VERSION"),
        "modes": FlightMode::ALL,
        "endpoints": {
            "analyze": "POST /api/analyze",
            "analyzeText": "POST /api/analyze/text",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // Lagged receivers drop the missed entries and keep streaming
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Multipart upload endpoint
async fn analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut mode: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("Read error: {}", e)))?;
                file_data = Some(bytes.to_vec());
            }
            "mode" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Read error: {}", e)))?;
                mode = Some(text);
            }
            _ => {}
        }
    }

    let bytes = file_data.ok_or_else(|| bad_request("No file provided".to_string()))?;
    let mode = parse_mode(mode.as_deref())?;

    log_info(format!(
        "📄 Upload: {} ({} bytes, {} mode)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len(),
        mode
    ));

    let report = analyze_bytes(&bytes, mode, &state.config).map_err(unprocessable)?;
    Ok(Json(AnalysisResponse::from(report)))
}

/// JSON text endpoint
async fn analyze_json(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| bad_request(e.body_text()))?;
    let report = analyze_text(&request.csv, request.mode, &state.config).map_err(unprocessable)?;
    Ok(Json(AnalysisResponse::from(report)))
}

fn parse_mode(raw: Option<&str>) -> Result<FlightMode, ApiError> {
    let raw = raw.ok_or_else(|| bad_request("No mode provided".to_string()))?;
    raw.parse().map_err(|e: crate::models::ParseModeError| bad_request(e.to_string()))
}

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(error_response("badRequest", &message)))
}

fn unprocessable(error: AnalysisError) -> ApiError {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(analysis_error_response(&error)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    const BOUNDARY: &str = "telemetry-boundary";

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = router(AnalysisConfig::default()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::post("/api/analyze/text")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload_request(mode: &str, csv: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"mode\"\r\n\r\n{mode}\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"flight.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n{csv}\r\n--{b}--\r\n",
            b = BOUNDARY,
        );
        Request::post("/api/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode(Some("rocket")).unwrap(), FlightMode::Rocket);

        let (status, body) = parse_mode(Some("glider")).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0["errorKind"], "badRequest");

        let (status, _) = parse_mode(None).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unprocessable_status() {
        let (status, body) = unprocessable(AnalysisError::EmptyInput);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.0["errorKind"], "emptyInput");
    }

    #[tokio::test]
    async fn test_analyze_json_handler() {
        let state = AppState {
            config: Arc::new(AnalysisConfig::default()),
        };
        let request = AnalyzeRequest {
            csv: "roll,pitch,yaw\n-5,3,1\n10,-12,2".to_string(),
            mode: FlightMode::Drone,
        };

        let Json(response) = analyze_json(State(state), Ok(Json(request))).await.unwrap();
        assert_eq!(response.data["stabilityScore"], 89.0);
        assert_eq!(response.status, "complete");
    }

    #[tokio::test]
    async fn test_analyze_json_handler_error() {
        let state = AppState {
            config: Arc::new(AnalysisConfig::default()),
        };
        let request = AnalyzeRequest {
            csv: "altitude,velocity\n1,2".to_string(),
            mode: FlightMode::Rocket,
        };

        let (status, body) = analyze_json(State(state), Ok(Json(request))).await.unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.0["errorKind"], "missingColumn");
    }

    #[tokio::test]
    async fn test_text_endpoint_accepts_any_mode_case() {
        let (status, body) =
            send(json_request(r#"{ "csv": "roll,pitch,yaw\n1,2,3", "mode": "Drone" }"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "drone");
        assert_eq!(body["data"]["stabilityScore"], 98.5);
    }

    #[tokio::test]
    async fn test_text_endpoint_bad_body_is_bad_request() {
        let (status, body) = send(json_request(r#"{ "csv": "roll,pitch,yaw", "mode": "glider" }"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["errorKind"], "badRequest");

        let (status, body) = send(json_request("not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorKind"], "badRequest");
    }

    #[tokio::test]
    async fn test_upload_endpoint() {
        let (status, body) =
            send(upload_request("rocket", "altitude,velocity,acceleration\n100,50,10\n200,80,5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["maxAltitude"], 200.0);
        assert_eq!(body["metadata"]["validRows"], 2);
    }

    #[tokio::test]
    async fn test_large_upload_is_accepted() {
        let mut csv = String::from("altitude,velocity,acceleration\n");
        for i in 0..400_000 {
            csv.push_str(&format!("{},{},9.81\n", i, i % 100));
        }
        assert!(csv.len() > 3 * 1024 * 1024);

        let (status, body) = send(upload_request("rocket", &csv)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["maxAltitude"], 399_999.0);
        assert_eq!(body["data"]["maxAcceleration"], 1.0);
        assert_eq!(body["metadata"]["validRows"], 400_000);
    }
}
