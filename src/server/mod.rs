//! # HTTP Server for Template Storage and Certificate Generation
//!
//! Exposes the engine over JSON: template CRUD backed by the in-memory
//! store, plus preview and export endpoints that run the full resolve →
//! rasterize → (PDF) pipeline per request.
//!
//! ## Usage
//!
//! ```bash
//! laurea serve --listen 0.0.0.0:8080
//! ```

mod handlers;
mod state;

pub use state::ServerConfig;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::LaureaError;
use state::AppState;

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use laurea::server::{ServerConfig, serve};
///
/// # async fn example() -> Result<(), laurea::error::LaureaError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), LaureaError> {
    let app_state = Arc::new(AppState::new(config));

    let app = Router::new()
        // Template API
        .route("/api/templates", get(handlers::templates::list))
        .route("/api/templates", post(handlers::templates::create))
        .route("/api/templates/:id", get(handlers::templates::fetch))
        .route("/api/templates/:id", put(handlers::templates::update))
        // Certificate API (10MB limit for inline data-URI assets)
        .route(
            "/api/certificates/preview",
            post(handlers::certificates::preview)
                .layer(DefaultBodyLimit::max(10 * 1024 * 1024)),
        )
        .route(
            "/api/certificates/export",
            post(handlers::certificates::export)
                .layer(DefaultBodyLimit::max(10 * 1024 * 1024)),
        )
        // Asset API (20MB limit for uploads)
        .route(
            "/api/assets/upload",
            post(handlers::assets::upload).layer(DefaultBodyLimit::max(20 * 1024 * 1024)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state.clone());

    let listen_addr = &app_state.config.listen_addr;
    println!("Laurea HTTP server starting...");
    println!("Listening on: {}", listen_addr);

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .map_err(|e| {
            LaureaError::Transport(format!("Failed to bind to {}: {}", listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| LaureaError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}
