pub mod api;
mod middleware;

pub use api::{ApiState, build_api_router};

use axum::{Router, middleware as axum_middleware, routing::get};

/// Full HTTP surface: REST routes, health probe and the shared logging layers.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/healthz", get(api::handlers::healthz))
        .merge(build_api_router(state))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
}
