//! HTTP endpoint serving resolver results.
//!
//! - `GET /extensions/<namespace>/api/metadata?appName=<id>` → 200 or 500 envelope
//! - `GET /healthz` → `ok`

use anyhow::{Context, Result};
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::LinkPanelConfig;
use crate::envelope::MetadataEnvelope;
use crate::resolver::{MetadataResolver, ResolutionError};

#[derive(Clone)]
struct ServerState {
    resolver: Arc<MetadataResolver>,
}

/// Query parameter carrying the application identifier.
pub const APP_NAME_PARAM: &str = "appName";

/// First `appName` value in a raw query string. Unknown and repeated
/// parameters are ignored, so no query string is ever rejected.
pub fn app_name_from_query(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == APP_NAME_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Build the router serving `metadata_path` and the health check.
pub fn router(resolver: Arc<MetadataResolver>, metadata_path: &str) -> Router {
    Router::new()
        .route(metadata_path, get(get_metadata))
        .route("/healthz", get(health_check))
        .with_state(ServerState { resolver })
}

async fn health_check() -> &'static str {
    "ok"
}

async fn get_metadata(
    State(state): State<ServerState>,
    RawQuery(query): RawQuery,
) -> Response {
    let app_name = app_name_from_query(query.as_deref());
    let span = tracing::info_span!(
        "metadata_request",
        app = app_name.as_deref().unwrap_or("")
    );
    let resolver = Arc::clone(&state.resolver);

    // curl is blocking; keep it off the runtime threads.
    let result = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        resolver.resolve_with_echo(app_name.as_deref())
    })
    .await
    .unwrap_or_else(|e| Err(ResolutionError::Transport(format!("resolver task: {}", e))));

    let envelope = MetadataEnvelope::from_resolution(result, Utc::now());
    let status = if envelope.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(envelope)).into_response()
}

/// Serve `app` on `listener` until `shutdown` completes.
pub async fn serve_on<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("metadata server")?;
    Ok(())
}

/// Bind the configured (or overridden) address and serve until Ctrl+C.
pub async fn serve(cfg: &LinkPanelConfig, bind_override: Option<&str>) -> Result<()> {
    let addr = bind_override.unwrap_or(cfg.bind_addr.as_str());
    let resolver = Arc::new(MetadataResolver::from_config(cfg));
    let app = router(resolver, &cfg.metadata_path());

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {}", addr))?;
    tracing::info!(
        "metadata endpoint listening on http://{}{}",
        listener.local_addr()?,
        cfg.metadata_path()
    );

    serve_on(listener, app, shutdown_signal()).await?;
    tracing::info!("metadata server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
