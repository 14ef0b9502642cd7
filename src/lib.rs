//! Fundación Preview - social link-preview pages for foundation content.
//!
//! This crate provides a lightweight HTTP server that answers share-link
//! requests for news articles (`/novedades/`) and partner profiles
//! (`/partners/`). Link-preview crawlers receive a static HTML document with
//! Open Graph and Twitter Card tags; human visitors are redirected to the
//! canonical page on the main site.
//!
//! # Architecture
//!
//! - **Resolve**: Classifies the content key as a UUID or a slug and builds
//!   the store lookup filter
//! - **Query**: Performs a single authenticated read against the hosted
//!   content store (PostgREST-style REST API)
//! - **Classify**: Decides bot vs. human from the request's User-Agent
//! - **Render**: Generates HTML with Open Graph tags using maud
//!   (compile-time templates) or a redirect document
//! - **Headers**: Cache-Control per branch; bot pages are CDN-cacheable,
//!   redirects and errors are never cached
//!
//! # URL Patterns
//!
//! ```text
//! GET /novedades/{key}      GET /novedades?id={key}
//! GET /partners/{key}       GET /partners?id={key}
//! ```
//!
//! The key is either a content UUID or a human-readable slug.
//!
//! # Security
//!
//! - All dynamic content is HTML-escaped by maud
//! - Image URLs are validated (HTTP/HTTPS only) before use in attributes
//! - Store credentials are validated once at startup and never logged

pub mod classify;
pub mod config;
pub mod error;
pub mod query;
pub mod render;
pub mod resolve;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
