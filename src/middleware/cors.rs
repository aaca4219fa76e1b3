//! CORS policy for browser clients.
//!
//! Policy:
//! - Development: any origin, without credentials.
//! - Production: exact-match allowlist (`CORS_ALLOWED_ORIGINS`), without credentials.
//!   An empty allowlist allows no cross-origin browser access at all.
//!
//! Token auth travels in the `Authorization` header, so cookies/credentials are never needed.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::AppEnv;

pub fn apply(router: Router, app_env: AppEnv, allowed_origins: &[String]) -> Router {
    router.layer(layer(app_env, allowed_origins))
}

fn layer(app_env: AppEnv, allowed_origins: &[String]) -> CorsLayer {
    let cors = if app_env.is_production() {
        let allowed: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _req| allowed.iter().any(|v| v == origin),
        ))
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    cors.allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static("x-request-id"),
    ])
    .max_age(std::time::Duration::from_secs(60 * 10))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    async fn allow_origin(app_env: AppEnv, allowed: &[String], origin: &str) -> Option<String> {
        let router = apply(Router::new().route("/", get(|| async { "ok" })), app_env, allowed);
        let res = router
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[tokio::test]
    async fn development_allows_any_origin() {
        let got = allow_origin(AppEnv::Development, &[], "https://anywhere.example").await;
        assert_eq!(got.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn production_only_allows_listed_origins() {
        let allowed = vec!["https://app.example".to_string()];
        let got = allow_origin(AppEnv::Production, &allowed, "https://app.example").await;
        assert_eq!(got.as_deref(), Some("https://app.example"));

        let got = allow_origin(AppEnv::Production, &allowed, "https://evil.example").await;
        assert_eq!(got, None);
    }
}
