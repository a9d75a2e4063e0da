//! HTTP server: static assets plus the servlet-backed API endpoints.

mod manifest;
mod repositories;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::{ALLOW, CACHE_CONTROL, CONTENT_TYPE};
use axum::routing::get;
use serde::Serialize;
use tower_http::services::ServeDir;

use crate::config::{AppConfig, ServerConfig};
use crate::repository::RepositoryProvider;
use crate::servlet::{ServletResponse, mount};
use crate::web::{SERVICE_WORKER_PATH, service_worker_js};

pub use manifest::{MANIFEST_CONTENT_TYPE, Manifest, WebManifest};
pub use repositories::RepositoryList;

/// Mount point of the manifest servlet.
pub const MANIFEST_PATH: &str = "/api/manifest";

/// Mount point of the repository list servlet.
pub const REPOSITORIES_PATH: &str = "/api/repositories";

/// Refuses the request with 405 and no body.
fn method_not_allowed(response: &mut ServletResponse) {
    response.set_status(StatusCode::METHOD_NOT_ALLOWED);
    response.set_header(ALLOW, HeaderValue::from_static("GET, HEAD"));
}

/// Writes `value` as a JSON body with the manifest content type.
///
/// Answers 500 with no body if `value` cannot be serialized.
fn send_json<T: Serialize + ?Sized>(response: &mut ServletResponse, value: &T) {
    match serde_json::to_vec(value) {
        Ok(body) => {
            response.set_header(CONTENT_TYPE, HeaderValue::from_static(MANIFEST_CONTENT_TYPE));
            response.send(body);
        }
        Err(e) => {
            log::error!("Cannot serialize response body: {e}");
            response.set_status(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

/// Builds the full application router.
///
/// The API servlets and the generated worker script take precedence; every
/// other path is served from the document root.
///
/// # Errors
///
/// Returns an error if the worker script cannot be rendered.
pub fn router(
    config: &AppConfig,
    repositories: Arc<dyn RepositoryProvider>,
) -> crate::Result<Router> {
    let script = service_worker_js(&config.worker)?;

    Ok(Router::new()
        .nest_service(MANIFEST_PATH, mount(Arc::new(Manifest::new())))
        .nest_service(
            REPOSITORIES_PATH,
            mount(Arc::new(RepositoryList::new(repositories))),
        )
        .route(
            SERVICE_WORKER_PATH,
            get(move || {
                let script = script.clone();
                async move {
                    (
                        [
                            (CONTENT_TYPE, "text/javascript; charset=utf-8"),
                            (CACHE_CONTROL, "no-cache"),
                        ],
                        script,
                    )
                }
            }),
        )
        .fallback_service(ServeDir::new(&config.server.web_root)))
}

/// Builds the router for the static-only server.
pub fn static_router(config: &ServerConfig) -> Router {
    Router::new().fallback_service(ServeDir::new(&config.web_root))
}

/// Runs the full application server until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address is invalid or cannot be bound.
pub async fn run_server(
    config: &AppConfig,
    repositories: Arc<dyn RepositoryProvider>,
) -> crate::Result<()> {
    serve(&config.server, router(config, repositories)?).await
}

/// Runs a server that only serves the document root.
///
/// # Errors
///
/// Returns an error if the address is invalid or cannot be bound.
pub async fn run_static(config: &ServerConfig) -> crate::Result<()> {
    serve(config, static_router(config)).await
}

async fn serve(config: &ServerConfig, app: Router) -> crate::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;

    log::info!("port: {}", local.port());
    log::info!(
        "Serving {} on http://{local}",
        config.web_root.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Shutdown complete");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    log::warn!("Cannot listen for SIGTERM: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => log::info!("Received SIGINT"),
            () = terminate => log::info!("Received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        log::info!("Received SIGINT");
    }
}
