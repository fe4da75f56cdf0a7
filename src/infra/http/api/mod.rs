pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

pub fn build_api_router(state: ApiState) -> Router {
    let auth_state = state.clone();

    Router::new()
        .route(
            "/blog/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/blog/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/blog/generate-post", post(handlers::generate_post))
        .route("/blog/summarize", post(handlers::summarize))
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/{id}",
            axum::routing::put(handlers::update_category).delete(handlers::delete_category),
        )
        .route("/auth/verify-token", post(handlers::verify_token))
        .route("/public/posts", get(handlers::public_posts))
        .route("/public/posts/{slug}", get(handlers::public_post))
        .route("/public/featured", get(handlers::featured_posts))
        .route("/public/recent", get(handlers::recent_posts))
        .route("/admin/stats", get(handlers::dashboard_stats))
        .route("/admin/posts", get(handlers::admin_posts))
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(
            auth_state,
            middleware::authenticate,
        ))
}
