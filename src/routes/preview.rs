//! Preview route handlers.
//!
//! Handles `GET /novedades/{key}`, `GET /partners/{key}` and their
//! query-parameter variants. The pipeline per request:
//!
//! 1. Extract and validate the content key (400 before any store call)
//! 2. Resolve the key to an id or slug filter
//! 3. Fetch the single matching row from the content store
//! 4. Classify the client from its User-Agent
//! 5. Bots get the cacheable metadata document; humans get the redirect

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_TYPE, HOST, LOCATION, USER_AGENT};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::headers::{bot_cache_headers, no_store_headers};
use crate::classify::{Client, classify};
use crate::config::RedirectStrategy;
use crate::error::PreviewError;
use crate::query::EntityKind;
use crate::render::{self, RequestContext};
use crate::resolve::resolve;
use crate::state::AppState;

/// Key arriving as a query parameter; both `id` and `slug` are accepted,
/// `id` winning when both are present.
#[derive(Debug, Default, Deserialize)]
pub struct KeyParams {
    id: Option<String>,
    slug: Option<String>,
}

impl KeyParams {
    fn into_key(self) -> Option<String> {
        self.id.or(self.slug)
    }
}

/// `GET /novedades/{key}`
pub async fn news_path(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Response, PreviewError> {
    preview(&state, EntityKind::News, Some(key), headers).await
}

/// `GET /novedades?id=...` (or `?slug=...`)
pub async fn news_query(
    State(state): State<AppState>,
    Query(params): Query<KeyParams>,
    headers: HeaderMap,
) -> Result<Response, PreviewError> {
    preview(&state, EntityKind::News, params.into_key(), headers).await
}

/// `GET /partners/{key}`
pub async fn partner_path(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Response, PreviewError> {
    preview(&state, EntityKind::Partner, Some(key), headers).await
}

/// `GET /partners?id=...` (or `?slug=...`)
pub async fn partner_query(
    State(state): State<AppState>,
    Query(params): Query<KeyParams>,
    headers: HeaderMap,
) -> Result<Response, PreviewError> {
    preview(&state, EntityKind::Partner, params.into_key(), headers).await
}

/// The shared preview pipeline for both entity kinds.
async fn preview(
    state: &AppState,
    kind: EntityKind,
    key: Option<String>,
    headers: HeaderMap,
) -> Result<Response, PreviewError> {
    let key = key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(PreviewError::MissingKey)?
        .to_string();

    let ctx = request_context(&headers, state, &key);
    let descriptor = kind.descriptor();

    let filter = resolve(&key);
    let content = state
        .store
        .fetch(kind, &filter)
        .await?
        .ok_or_else(|| PreviewError::NotFound {
            kind: descriptor.label,
            key: key.clone(),
        })?;

    let response = match classify(&ctx.user_agent) {
        Client::Bot => {
            tracing::debug!(kind = descriptor.label, key = %key, "serving metadata document");
            let markup = render::metadata_page(
                descriptor,
                &content,
                &ctx,
                &state.config.site_name,
                &state.config.locale,
            );
            metadata_response(markup.into_string())
        }
        Client::Human => {
            let canonical = render::canonical_url(descriptor, &content, &ctx);
            tracing::debug!(kind = descriptor.label, key = %key, target = %canonical, "redirecting human client");
            redirect_response(
                state.config.redirect_strategy,
                &canonical,
                &state.config.site_name,
            )
        }
    };

    Ok(response)
}

/// Derive the per-request context from headers and configuration.
///
/// Proxy-forwarded values win over the direct ones; the configured fallback
/// host covers clients that send no Host header at all.
fn request_context(headers: &HeaderMap, state: &AppState, key: &str) -> RequestContext {
    let header_str = |name: &axum::http::header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    // The forwarded proto is attacker-controlled and ends up in the
    // canonical URL and Location header, so anything but a literal
    // "http" is normalized to "https".
    let scheme = match headers.get("x-forwarded-proto").and_then(|v| v.to_str().ok()) {
        None => "http",
        Some(proto) if proto.eq_ignore_ascii_case("http") => "http",
        Some(_) => "https",
    }
    .to_string();

    let host = headers
        .get("x-forwarded-host")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| header_str(&HOST))
        .unwrap_or_else(|| state.config.fallback_host.clone());

    let user_agent = header_str(&USER_AGENT).unwrap_or_default();

    RequestContext {
        scheme,
        host,
        user_agent,
        requested_key: key.to_string(),
    }
}

/// 200 response carrying the crawler metadata document, shared-cacheable.
fn metadata_response(html: String) -> Response {
    let mut headers = bot_cache_headers();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    (StatusCode::OK, headers, html).into_response()
}

/// Redirect response for human clients, per the configured strategy. Both
/// variants carry a self-contained fallback body and are never cacheable.
fn redirect_response(strategy: RedirectStrategy, canonical: &str, site_name: &str) -> Response {
    let mut headers = no_store_headers();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    match strategy {
        RedirectStrategy::Status => {
            if let Ok(location) = HeaderValue::from_str(canonical) {
                headers.insert(LOCATION, location);
            }
            let body = render::redirect_page(canonical, site_name, false).into_string();
            (StatusCode::FOUND, headers, body).into_response()
        }
        RedirectStrategy::Refresh => {
            let body = render::redirect_page(canonical, site_name, true).into_string();
            (StatusCode::OK, headers, body).into_response()
        }
    }
}
