use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::bootstrap::state::AppState;
use classmint_adapters::incoming::http_axum::routes::build_application_router;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8081";

pub fn create_router(state: &AppState) -> Router {
    let cors_layer = create_cors_layer(state.config.server.cors_origin.as_deref());

    build_application_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(state.to_adapters_state())
}

fn create_cors_layer(origin: Option<&str>) -> CorsLayer {
    let base_cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("x-request-id"),
        ]);

    let origin = origin
        .and_then(|value| {
            value
                .parse::<HeaderValue>()
                .inspect_err(|_| warn!(origin = value, "Ignoring unparsable CORS origin"))
                .ok()
        })
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CORS_ORIGIN));

    base_cors.allow_origin(origin)
}
