pub mod control;
pub mod forward;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::ProxyState;

/// Prefix of the proxy's own endpoints; everything else is forwarded
pub const CONTROL_PREFIX: &str = "/__proxy";

pub fn control_routes() -> Router<ProxyState> {
    Router::new()
        .route("/health", get(control::health))
        .route("/status", get(control::status))

        // Error injection
        .route("/errors", get(control::list_errors).delete(control::clear_error))
        .route("/errors/:name", post(control::activate_error))

        // Hot reload events
        .route("/reload", get(control::reload_stream))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

pub fn proxy_router(state: ProxyState) -> Router {
    Router::new()
        .nest(CONTROL_PREFIX, control_routes())
        .fallback(forward::forward)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
