//! API routes

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Origins allowed when none are configured
const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Build the CORS layer from `*` or a comma-separated origin list
fn cors_layer(origins: Option<&str>) -> CorsLayer {
    let allow_origin = match origins {
        Some("*") => AllowOrigin::any(),
        Some(origins) => AllowOrigin::list(
            origins
                .split(',')
                .filter_map(|s| s.trim().parse::<HeaderValue>().ok()),
        ),
        // Default: allow localhost origins for development
        None => AllowOrigin::list(DEV_ORIGINS.map(HeaderValue::from_static)),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.cors_origins.as_deref());

    let api_routes = Router::new()
        .route("/generate/epub", post(handlers::generate_epub))
        .route("/generate/mobi", post(handlers::generate_mobi));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
