use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
}

/// Restricts browsers to `origin` when one is configured.
pub fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return permissive_cors();
    };
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(value),
        Err(err) => {
            tracing::warn!(%origin, error = %err, "invalid CORS_ORIGIN, allowing any origin");
            permissive_cors()
        }
    }
}
