//! Implementation of the `etomyte serve` command.
//!
//! Every GET request is rendered by the synchronous engine on tokio's
//! blocking pool. Pages are served as `text/html; charset=utf-8` with the
//! render status; resolution failures become a plain 500. The request path is
//! percent-decoded before rendering, and a decoded path that is not a valid
//! request path is a 400.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

use etomyte_core::{
    application::PageRenderer,
    domain::{DomainError, RenderResult},
    error::EtomyteError,
};

use crate::{
    cli::{ServeArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(
    args: ServeArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project = global.project_dir();
    let renderer = Arc::new(super::site_renderer(&project, &config)?);
    let address = config
        .server
        .clone()
        .with_overrides(args.host, args.port)
        .address();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_cli_context(|| "Failed to start the async runtime")?;

    runtime.block_on(async {
        let listener = TcpListener::bind(address.as_str())
            .await
            .with_cli_context(|| format!("Failed to bind {address}"))?;
        let local = listener.local_addr()?;

        output.success(&format!("Serving {} at http://{local}", project.display()))?;
        output.info("Press Ctrl+C to stop")?;
        info!(address = %local, "Server started");

        axum::serve(listener, router(renderer))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .with_cli_context(|| "HTTP server failed")?;

        info!("Server stopped");
        Ok::<(), CliError>(())
    })
}

/// Catch-all GET router over `renderer`.
pub fn router(renderer: Arc<PageRenderer>) -> Router {
    Router::new()
        .route("/", get(render_root))
        .route("/{*path}", get(render_page))
        .with_state(renderer)
        .layer(TraceLayer::new_for_http())
}

async fn render_root(State(renderer): State<Arc<PageRenderer>>) -> Response {
    render(renderer, String::new()).await
}

/// `path` arrives percent-decoded and without its leading `/`.
async fn render_page(
    State(renderer): State<Arc<PageRenderer>>,
    Path(path): Path<String>,
) -> Response {
    render(renderer, path).await
}

#[instrument(skip(renderer))]
async fn render(renderer: Arc<PageRenderer>, path: String) -> Response {
    match tokio::task::spawn_blocking(move || renderer.render_str(&path)).await {
        Ok(Ok(page)) => page_response(page),
        Ok(Err(err)) => error_response(&err),
        Err(join) => {
            error!(error = %join, "Render task failed");
            internal_error()
        }
    }
}

fn page_response(page: RenderResult) -> Response {
    let status = StatusCode::from_u16(page.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Html(page.body)).into_response()
}

fn error_response(err: &EtomyteError) -> Response {
    match err {
        EtomyteError::Domain(DomainError::InvalidPath { .. }) => {
            warn!(error = %err, "Rejected request path");
            (StatusCode::BAD_REQUEST, "400 Bad Request").into_response()
        }
        _ => {
            error!(error = %err, resolution = err.is_resolution_failure(), "Render failed");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error").into_response()
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler the server runs until killed.
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
