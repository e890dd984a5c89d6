//! # hue-api — HTTP Surface for the hue Registries
//!
//! Axum routes over the issuance services. Handlers parse the request,
//! call one service operation, and map the result; every rule lives in
//! the services below.
//!
//! ## API Surface
//!
//! | Prefix                  | Module               | Domain                  |
//! |-------------------------|----------------------|-------------------------|
//! | `/v1/colors/*`          | [`routes::colors`]   | Colour registry         |
//! | `/v1/words/*`           | [`routes::words`]    | Word registry           |
//! | `/v1/admin/{registry}/*`| [`routes::admin`]    | Owner administration    |
//! | `/health/*`             | this module          | Probes                  |
//!
//! ## Caller Identity
//!
//! Mutating routes read the calling account from the `x-hue-caller`
//! header ([`extractors::Caller`]). Read routes are open.

pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::colors::router())
        .merge(routes::words::router())
        .merge(routes::admin::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Bind `0.0.0.0:{port}` and serve until the process is stopped.
pub async fn serve(state: AppState) -> std::io::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "hue API listening");
    axum::serve(listener, app(state)).await
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once the registries are built.
async fn readiness() -> &'static str {
    "ready"
}
