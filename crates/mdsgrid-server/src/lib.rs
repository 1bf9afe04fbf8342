//! HTTP frame server.
//!
//! `GET /` renders one frame of the logo with a fresh renderer session and
//! returns it as plain text. `GET /health` reports the host load the
//! animation is reacting to.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::Serialize;
use tokio::sync::Mutex;

use mdsgrid_core::{HostMetrics, LoadSampler, MetricsSource, RendererConfig, RendererSession};

/// Shared server state. Frames come from a fresh session per request;
/// `/health` keeps one sampler so `cpu_delta` compares successive calls.
struct AppState<M = HostMetrics> {
    config: RendererConfig,
    sampler: Mutex<LoadSampler<M>>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    cpu_load: f64,
    memory_usage: f64,
    cpu_delta: f64,
}

async fn handle_frame(State(state): State<Arc<AppState>>) -> Response {
    // Session setup reads /proc and seeds from the OS.
    let config = state.config.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let mut session = RendererSession::new(config);
        session.render_frame(Instant::now())
    })
    .await;

    match rendered {
        Ok(frame) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            frame,
        )
            .into_response(),
        Err(e) => {
            log::error!("frame render task failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn handle_health<M: MetricsSource>(
    State(state): State<Arc<AppState<M>>>,
) -> Json<HealthResponse> {
    let sample = state.sampler.lock().await.sample();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: mdsgrid_core::VERSION.to_string(),
        cpu_load: sample.cpu_load,
        memory_usage: sample.memory_usage,
        cpu_delta: sample.cpu_delta,
    })
}

fn build_router(config: RendererConfig) -> Router {
    let state = Arc::new(AppState {
        sampler: Mutex::new(LoadSampler::host(config.load_cache())),
        config,
    });

    Router::new()
        .route("/", get(handle_frame))
        .route("/health", get(handle_health::<HostMetrics>))
        .with_state(state)
}

/// Run the HTTP frame server until the process exits.
pub async fn run_server(config: RendererConfig, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(config);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("serving frames on http://{addr}");
    axum::serve(listener, app).await
}
