//! HTTP server mode for triggering syncs over REST

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::connector::Connector;
use crate::error::{Error, Result};
use crate::types::{format_timestamp, Timestamp};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
}

impl ServerConfig {
    /// Create a server config
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

/// App state shared across handlers
#[derive(Clone)]
struct AppState {
    connector: Arc<Connector>,
}

/// Request body for the sync endpoint
#[derive(Debug, Default, Deserialize)]
struct SyncRequest {
    /// Window start; the stored checkpoint is used when absent
    #[serde(default, alias = "lastSyncTime")]
    last_sync_time: Option<Timestamp>,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Build the router for a started connector
pub fn router(connector: Arc<Connector>) -> Router {
    // Allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/state", get(get_state))
        .route("/sync", post(sync))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { connector })
}

/// Start the HTTP server; closes the connector on Ctrl-C
pub async fn serve(config: ServerConfig, connector: Arc<Connector>) -> Result<()> {
    let app = router(Arc::clone(&connector));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {}: {e}", config.port)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for shutdown signal: {e}");
            }
        })
        .await
        .map_err(|e| Error::Other(format!("Server error: {e}")))?;

    connector.close().await
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "sync": state.connector.phase(),
    }))
}

/// Current checkpoint
async fn get_state(State(state): State<AppState>) -> Response {
    let last_sync_time = state.connector.engine().state().last_sync_time().await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({
            "last_sync_time": last_sync_time,
            "last_sync": last_sync_time.map(format_timestamp),
        }))),
    )
        .into_response()
}

/// Trigger one sync
///
/// 200 with the report on success, 409 if a sync is already running,
/// 502 if the sync aborted.
async fn sync(State(state): State<AppState>, body: Bytes) -> Response {
    let request = if body.is_empty() {
        SyncRequest::default()
    } else {
        match serde_json::from_slice::<SyncRequest>(&body) {
            Ok(req) => req,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<()>::error(format!("Invalid request body: {e}"))),
                )
                    .into_response()
            }
        }
    };

    let result = match request.last_sync_time {
        Some(start) => state.connector.sync(Some(start)).await,
        None => state.connector.sync_from_checkpoint().await,
    };

    match result {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(report.to_json())),
        )
            .into_response(),
        Err(Error::SyncInProgress) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error(Error::SyncInProgress.to_string())),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ApiResponse::<()>::error(e.to_string())),
        )
            .into_response(),
    }
}
