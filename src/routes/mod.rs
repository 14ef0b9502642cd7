//! Route definitions for the preview service.
//!
//! ## Routes
//!
//! - `GET /health` - Health check (JSON)
//! - `GET /robots.txt` - Crawler instructions
//! - `GET /novedades/{key}` / `GET /novedades?id=` - News preview
//! - `GET /partners/{key}` / `GET /partners?id=` - Partner preview
//!
//! HEAD on any GET route returns the same headers with an empty body.

pub mod headers;
mod health;
mod preview;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::state::AppState;

/// Build the complete preview service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/robots.txt", get(robots_txt))
        .route("/novedades", get(preview::news_query))
        .route("/novedades/{key}", get(preview::news_path))
        .route("/partners", get(preview::partner_query))
        .route("/partners/{key}", get(preview::partner_path))
        .with_state(state)
}

/// Serve robots.txt allowing all crawlers.
///
/// Preview pages must stay fetchable for link unfurling; the pages
/// themselves carry noindex meta tags.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nAllow: /\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::{Config, RedirectStrategy};

    fn test_router() -> Router {
        let config = Config {
            bind_addr: "127.0.0.1:0".to_string(),
            store_url: "https://store.example.com".to_string(),
            store_api_key: "anon".to_string(),
            store_service_token: "service".to_string(),
            site_name: "Fundación".to_string(),
            locale: "es_AR".to_string(),
            redirect_strategy: RedirectStrategy::Status,
            fallback_host: "fundacion.test".to_string(),
        };
        router(AppState::new(config).unwrap())
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "fundacion-preview");
    }

    #[tokio::test]
    async fn robots_txt_allows_all() {
        let response = test_router()
            .oneshot(Request::get("/robots.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"User-agent: *\nAllow: /\n");
    }

    #[tokio::test]
    async fn head_matches_get_with_empty_body() {
        let get = test_router()
            .oneshot(Request::get("/robots.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let head = test_router()
            .oneshot(Request::head("/robots.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(head.status(), StatusCode::OK);
        assert_eq!(head.headers(), get.headers());

        let body = head.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn news_without_key_is_400() {
        let response = test_router()
            .oneshot(Request::get("/novedades").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn partners_without_key_is_400() {
        let response = test_router()
            .oneshot(Request::get("/partners").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_key_response_is_not_cacheable() {
        let response = test_router()
            .oneshot(Request::get("/novedades").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cache = response
            .headers()
            .get("cache-control")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cache.contains("no-store"));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = test_router()
            .oneshot(Request::get("/otra-cosa").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
