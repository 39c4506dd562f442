//! Axum router configuration with middleware.
//!
//! Routes are served at the root and again under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Teams
        .route("/team/add", post(handlers::team::add_team))
        .route("/team/get", get(handlers::team::get_team))
        // Users
        .route("/users/setIsActive", post(handlers::user::set_is_active))
        .route("/users/getReview", get(handlers::user::get_review))
        // Pull requests
        .route(
            "/pullRequest/create",
            post(handlers::pull_request::create_pull_request),
        )
        .route(
            "/pullRequest/merge",
            post(handlers::pull_request::merge_pull_request),
        )
        .route(
            "/pullRequest/reassign",
            post(handlers::pull_request::reassign_reviewer),
        );

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes.clone())
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
