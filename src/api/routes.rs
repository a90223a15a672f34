use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/genres", get(handlers::list_genres))
        // Current user
        .route(
            "/user",
            post(handlers::create_user)
                .get(handlers::get_user)
                .delete(handlers::clear_user),
        )
        // Active service variant
        .route(
            "/service",
            get(handlers::get_service).put(handlers::set_service),
        )
        .route("/recommendations", get(handlers::get_recommendations))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
