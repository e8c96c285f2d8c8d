//! Premium Estimator API Server
//!
//! REST API serving premium quotes and model-ready feature vectors.

use anyhow::Context;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use feature_engine::{FeaturePipeline, PreprocessingArtifact};
use inference_engine::{load_model, InferenceEngine};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
pub mod rate_limit;
mod routes;

pub use config::{LoggingConfig, ServiceConfig};
pub use error::{ApiError, ErrorBody};

/// Application state shared across handlers
///
/// Nothing in here is mutated after startup, so handlers share it without
/// locking.
pub struct AppState {
    /// Pipeline and model
    pub engine: InferenceEngine,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus exporter, when installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(engine: InferenceEngine) -> Self {
        Self {
            engine,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
        }
    }

    /// Load the preprocessing artifact and model named by the configuration
    pub fn from_config(config: &ServiceConfig) -> anyhow::Result<Self> {
        let artifact = PreprocessingArtifact::load(&config.pipeline.preprocessing_path)
            .with_context(|| {
                format!(
                    "loading preprocessing artifact {}",
                    config.pipeline.preprocessing_path.display()
                )
            })?;
        let pipeline = FeaturePipeline::from_artifact(
            artifact,
            config.pipeline.validation.to_config(),
            config.pipeline.age_group_policy,
        )
        .context("building feature pipeline")?;
        let model = load_model(&config.model).context("loading premium model")?;

        Ok(Self::new(InferenceEngine::new(pipeline, model)))
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: String,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/quote", post(routes::quote::post_quote))
        .route("/api/v1/features", post(routes::features::post_features))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: state.engine.model_description(),
    })
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = Level::from_str(&config.level)
        .with_context(|| format!("invalid log level '{}'", config.level))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.context("failed to set tracing subscriber")
}

/// Run the server until ctrl-c
pub async fn run_server(config: &ServiceConfig) -> anyhow::Result<()> {
    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("installing prometheus recorder")?;

    let state = Arc::new(AppState::from_config(config)?.with_metrics(metrics));

    let governor_config = rate_limit::create_governor_config(&config.server.rate_limit)
        .context("invalid rate limit configuration")?;

    let app = create_router(state)
        .layer(GovernorLayer {
            config: governor_config,
        })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!("Starting API server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.server.bind_addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
