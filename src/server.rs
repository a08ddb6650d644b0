//! HTTP transport for the visualizer.
//!
//! `GET /gopath?dir=<relative path>&name=<receiver>` answers one navigation
//! request with the indented JSON node array, or `500` with the error text.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tokio::signal;
use tracing::{debug, info, warn};

use crate::report;
use crate::workspace::{NavRequest, WorkspaceResolver};

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<WorkspaceResolver>,
}

/// Query string of `/gopath`.
#[derive(Debug, Default, Deserialize)]
pub struct GopathQuery {
    pub dir: Option<String>,
    pub name: Option<String>,
}

pub fn router(resolver: Arc<WorkspaceResolver>) -> Router {
    Router::new()
        .route("/gopath", get(gopath_handler))
        .with_state(AppState { resolver })
}

pub async fn gopath_handler(
    State(state): State<AppState>,
    Query(query): Query<GopathQuery>,
) -> Response {
    let request = NavRequest::new(query.dir, query.name);
    debug!(?request, "gopath request");

    let resolver = Arc::clone(&state.resolver);
    let outcome = tokio::task::spawn_blocking(move || {
        let nodes = resolver.resolve(&request)?;
        Ok::<_, anyhow::Error>(report::json_bytes(&nodes)?)
    })
    .await;

    match outcome {
        Ok(Ok(body)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Ok(Err(err)) => failure(err.to_string()),
        Err(join_err) => failure(format!("request task failed: {join_err}")),
    }
}

fn failure(message: String) -> Response {
    warn!(error = %message, "gopath request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

/// Serve until Ctrl+C.
pub async fn serve(addr: &str, resolver: Arc<WorkspaceResolver>) -> anyhow::Result<()> {
    let root = resolver.root().display().to_string();
    let app = router(resolver);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, root = %root, "serving workspace");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
