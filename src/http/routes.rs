use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Sessions
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        // Library
        .route("/api/browse", get(handlers::browse))
        .route("/api/transcript", get(handlers::get_transcript))
        .route("/api/absolutePath", get(handlers::absolute_path))
        // Media
        .route("/audio/*path", get(handlers::stream_audio));

    if state.debug {
        router = router.route("/api/debug", get(handlers::debug_listing));
    }

    // Browser UI
    if let Some(dir) = &state.static_dir {
        router = router
            .route_service("/", ServeFile::new(dir.join("index.html")))
            .route_service("/login.html", ServeFile::new(dir.join("login.html")))
            .nest_service("/static", ServeDir::new(dir));
    }

    router
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
