//! Browser front end and JSON API.

mod chart;
mod handlers;
mod page;
mod view;

pub use chart::SimulatedAccuracy;
pub use handlers::{ApiError, ClassificationBody, Health};
pub use page::render;
pub use view::{ConfidenceBar, ImagePreview, Notice, NoticeLevel, PageState, ResultView};

use crate::error::{Error, Result};
use crate::inference::ClassifierHandle;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    handle: Arc<ClassifierHandle>,
    show_confidence: bool,
    max_upload_bytes: usize,
}

impl AppState {
    /// Build state around a loaded classifier.
    pub const fn new(
        handle: Arc<ClassifierHandle>,
        show_confidence: bool,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            handle,
            show_confidence,
            max_upload_bytes,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::index))
        .route("/classify", post(handlers::classify_page))
        .route("/api/classify", post(handlers::classify_api))
        .route("/api/species", get(handlers::species))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| Error::ServerBind { addr, source })?;

    let local = listener.local_addr()?;
    info!("Serving on http://{local}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| Error::Server { source })?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
