use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::config::ServerConfig;

fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return AllowOrigin::any();
    }

    let values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    AllowOrigin::list(values)
}

pub fn apply_cors(router: Router, server: &ServerConfig) -> Router {
    router.layer(
        CorsLayer::new()
            .allow_origin(allowed_origins(&server.cors_allowed_origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
