// HCRIS Hospital Analytics Dashboard - Web Server
// REST API with Axum over the shared sample data cache

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use hcris_dashboard::config::{
    year_or, DashboardConfig, DEFAULT_LISTEN, LISTEN_ENV, SERVER_LOG_FILTER, YEAR_ENV,
};
use hcris_dashboard::{
    export_filename, render_view, to_csv_bytes, DataQualityEngine, SampleDataCache, View,
    ViewOptions, DEFAULT_YEAR, VERSION,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// HTTP API for the HCRIS dashboard views
#[derive(Parser)]
#[command(name = "hcris-server", version, about = "HCRIS dashboard HTTP API")]
struct Args {
    /// Address to listen on
    #[arg(long, env = LISTEN_ENV, default_value = DEFAULT_LISTEN)]
    listen: String,

    /// Contract labor year used when a request gives none
    #[arg(long, env = YEAR_ENV, default_value_t = DEFAULT_YEAR)]
    year: u16,
}

impl Args {
    fn config(&self) -> DashboardConfig {
        DashboardConfig::default()
            .with_listen(&self.listen)
            .with_year(self.year)
    }
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    cache: Arc<SampleDataCache>,
    default_year: u16,
}

impl AppState {
    fn new(default_year: u16) -> Self {
        Self {
            cache: Arc::new(SampleDataCache::new()),
            default_year,
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: String) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    records: usize,
}

#[derive(Serialize)]
struct ViewSummary {
    slug: &'static str,
    label: &'static str,
    heading: &'static str,
    summary: &'static str,
}

impl From<View> for ViewSummary {
    fn from(view: View) -> Self {
        Self {
            slug: view.slug(),
            label: view.label(),
            heading: view.heading(),
            summary: view.summary(),
        }
    }
}

/// Kept as text so a malformed year falls back instead of rejecting the request
#[derive(Deserialize)]
struct ViewQuery {
    year: Option<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.cache.sample_data();
    Json(ApiResponse::ok(HealthResponse {
        status: "OK",
        version: VERSION,
        records: data.total_records(),
    }))
}

/// GET /api/views - Selectable views in navigation order
async fn list_views() -> impl IntoResponse {
    let views: Vec<ViewSummary> = View::ALL.iter().copied().map(ViewSummary::from).collect();
    Json(ApiResponse::ok(views))
}

/// GET /api/views/:view?year= - One rendered view; unknown names render the overview
async fn get_view(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let data = state.cache.sample_data();
    let options = ViewOptions::for_year(year_or(query.year.as_deref(), state.default_year));
    let report = render_view(View::select(&view), &data, &options);
    Json(ApiResponse::ok(report))
}

/// GET /api/export - All base tables as one CSV download
async fn export_csv(State(state): State<AppState>) -> Response {
    let data = state.cache.sample_data();

    match to_csv_bytes(&data) {
        Ok(bytes) => {
            let filename = export_filename(chrono::Local::now().date_naive());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                    (header::ETAG, format!("\"{}\"", data.fingerprint())),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "export failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::err(e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /api/quality - Base-table validation report
async fn get_quality(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.cache.sample_data();
    let report = DataQualityEngine::new().validate(&data);
    Json(ApiResponse::ok(report))
}

fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/views", get(list_views))
        .route("/views/:view", get(get_view))
        .route("/export", get(export_csv))
        .route("/quality", get(get_quality))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(SERVER_LOG_FILTER)),
        )
        .init();

    let config = Args::parse().config();
    let state = AppState::new(config.year);

    // Build the tables before the first request arrives
    let data = state.cache.sample_data();
    info!(records = data.total_records(), fingerprint = %data.fingerprint(), "sample data ready");

    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen))?;

    info!(listen = %config.listen, "🚀 hcris-server running");
    axum::serve(listener, app(state))
        .await
        .context("Server terminated")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app(AppState::new(DEFAULT_YEAR))
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "OK");
        assert_eq!(body["data"]["records"], 60);
    }

    #[tokio::test]
    async fn test_list_views() {
        let (_, body) = get_json("/api/views").await;
        let views = body["data"].as_array().unwrap();
        assert_eq!(views.len(), 6);
        assert_eq!(views[1]["slug"], "contract-labor");
        assert_eq!(views[5]["label"], "Data Quality");
    }

    #[tokio::test]
    async fn test_view_by_slug_and_year() {
        let (status, body) = get_json("/api/views/contract-labor?year=2021").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["view"], "contract-labor");
        assert_eq!(body["data"]["panels"][0]["title"], "Contract Labor Statistics - 2021");
    }

    #[tokio::test]
    async fn test_unknown_view_renders_overview() {
        let (status, body) = get_json("/api/views/not-a-view").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["view"], "overview");
        assert_eq!(body["data"]["title"], "Database Overview");
    }

    #[tokio::test]
    async fn test_unknown_year_gives_placeholders() {
        let (_, body) = get_json("/api/views/contract-labor?year=2019").await;
        assert_eq!(body["data"]["panels"][0]["body"]["type"], "placeholder");
    }

    #[tokio::test]
    async fn test_malformed_year_falls_back() {
        for uri in [
            "/api/views/contract-labor?year=abc",
            "/api/views/contract-labor?year=",
            "/api/views/contract-labor?year=99999",
        ] {
            let (status, body) = get_json(uri).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert_eq!(body["success"], true);
            assert_eq!(body["data"]["panels"][0]["title"], "Contract Labor Statistics - 2023");
        }

        let (status, body) = get_json("/api/views/nonsense?year=x").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["view"], "overview");
    }

    #[test]
    fn test_args_feed_config() {
        let config = Args::try_parse_from(["hcris-server", "--listen", "127.0.0.1:8080", "--year", "2022"])
            .unwrap()
            .config();
        assert_eq!(config.listen, "127.0.0.1:8080");
        assert_eq!(config.year, 2022);

        let defaults = Args::try_parse_from(["hcris-server"]).unwrap().config();
        assert_eq!(defaults.listen, DEFAULT_LISTEN);
    }

    #[tokio::test]
    async fn test_quality_report() {
        let (_, body) = get_json("/api/quality").await;
        assert_eq!(body["data"]["failed_count"], 1);
        assert_eq!(body["data"]["issues"][0]["severity"], "Warning");
    }

    #[tokio::test]
    async fn test_export_headers_and_body() {
        let response = app(AppState::new(DEFAULT_YEAR))
            .oneshot(Request::builder().uri("/api/export").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"hcris_dashboard_data_"));
        let etag = response.headers()[header::ETAG].to_str().unwrap().to_string();
        assert_eq!(etag.len(), 64 + 2);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("Year,State,Hospital_Count"));
        assert_eq!(text.lines().count(), 61);
    }
}
