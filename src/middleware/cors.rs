//! CORS policy for browser clients.
//!
//! Policy:
//! - Development: permissive (Allow-Origin: *), WITHOUT credentials. Browser
//!   clients send the session as `Authorization: Bearer`.
//! - Production: allowlist origins from Config, WITH credentials so the
//!   `__session` cookie reaches the verifier.
//!
//! The allowlist is usually the same set as the authorized parties.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;
use crate::middleware::http::REQUEST_ID_HEADER;

/// Apply CORS policy to the given Router.
///
/// IMPORTANT:
/// - Do not combine wildcard origin (`Any`) with `allow_credentials(true)`.
pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config.app_env.is_production(), &config.cors_allowed_origins))
}

fn layer(production: bool, allowed_origins: &[String]) -> CorsLayer {
    let headers = [
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static(REQUEST_ID_HEADER),
    ];

    let cors = if production {
        // An empty allowlist allows nothing.
        let allowed: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_credentials(true)
            .allow_headers(headers)
    } else {
        CorsLayer::new().allow_origin(Any).allow_headers(headers)
    };

    cors.allow_methods([Method::GET, Method::OPTIONS])
        .max_age(std::time::Duration::from_secs(60 * 10))
}
