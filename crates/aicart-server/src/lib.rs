//! # aicart-server
//!
//! HTTP surface over [`aicart_access::AccessService`].
//!
//! The store is probed once in [`AppState::init`]; the resulting mode is
//! reported by `/healthz` and never changes until restart.

pub mod error;
pub mod middleware;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use aicart_core::AicartConfig;
use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use middleware::auth::{require_admin, require_session};
use middleware::handlers;
use tower_http::trace::TraceLayer;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/api/auth/me", get(handlers::me))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    // Layers added later run first: session check, then admin check.
    let admin_routes = Router::new()
        .route("/api/admin/session", get(handlers::admin_session))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/auth/admin/login", post(handlers::login_admin))
        .route("/api/auth/login", post(handlers::login_user))
        .route("/api/auth/signup", post(handlers::signup))
        .merge(session_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Probe the store, bind, and serve until ctrl-c.
pub async fn serve(config: AicartConfig) -> anyhow::Result<()> {
    let state = AppState::init(&config).await?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(address = %config.server.bind, "aicart-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("aicart-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
