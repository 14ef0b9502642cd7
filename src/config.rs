//! Application configuration loaded from environment variables.
//!
//! Store credentials are validated here, once, at startup. A missing
//! credential aborts the process before the listener binds, so request
//! handlers never re-check configuration.

use std::fmt;

/// How the human-facing branch redirects to the canonical page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectStrategy {
    /// HTTP 302 with a `Location` header plus a meta-refresh fallback body.
    Status,
    /// HTTP 200 with a meta-refresh + JavaScript redirect body. Avoids
    /// partial-content anomalies in HTTP stacks that mix redirects with
    /// range requests.
    Refresh,
}

impl RedirectStrategy {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "status" | "302" => Ok(Self::Status),
            "refresh" | "200" => Ok(Self::Refresh),
            other => anyhow::bail!(
                "invalid PREVIEW_REDIRECT_STRATEGY '{other}' (expected 'status' or 'refresh')"
            ),
        }
    }
}

impl fmt::Display for RedirectStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status => write!(f, "status"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8081").
    pub bind_addr: String,

    /// Base URL of the hosted content store (no trailing slash).
    pub store_url: String,

    /// Store API key, sent as the `apikey` header.
    pub store_api_key: String,

    /// Store service token, sent as `Authorization: Bearer`.
    pub store_service_token: String,

    /// Site name shown in OG tags and page titles.
    pub site_name: String,

    /// OG locale (e.g., "es_AR").
    pub locale: String,

    /// Redirect strategy for human visitors.
    pub redirect_strategy: RedirectStrategy,

    /// Host used for canonical URLs when the request carries no Host header.
    pub fallback_host: String,
}

/// Read a variable under its preferred name, falling back to a legacy alias.
/// The preferred name wins when both are set.
fn var_or_alias(preferred: &str, alias: &str) -> Option<String> {
    std::env::var(preferred)
        .or_else(|_| std::env::var(alias))
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required (either naming convention; `CONTENT_STORE_*` preferred):
    /// - `CONTENT_STORE_URL` / `SUPABASE_URL`
    /// - `CONTENT_STORE_API_KEY` / `SUPABASE_ANON_KEY`
    /// - `CONTENT_STORE_SERVICE_TOKEN` / `SUPABASE_SERVICE_ROLE_KEY`
    ///
    /// Optional:
    /// - `PREVIEW_BIND_ADDR`: Server bind address (default: "0.0.0.0:8081")
    /// - `PREVIEW_SITE_NAME`: Site name (default: "Fundación")
    /// - `PREVIEW_LOCALE`: OG locale (default: "es_AR")
    /// - `PREVIEW_REDIRECT_STRATEGY`: "status" or "refresh" (default: "status")
    /// - `PREVIEW_FALLBACK_HOST`: Host for canonical URLs when the request
    ///   has no Host header (default: "localhost:8081")
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("PREVIEW_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let store_url = var_or_alias("CONTENT_STORE_URL", "SUPABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("CONTENT_STORE_URL (or SUPABASE_URL) is not set"))?
            .trim_end_matches('/')
            .to_string();

        let store_api_key = var_or_alias("CONTENT_STORE_API_KEY", "SUPABASE_ANON_KEY")
            .ok_or_else(|| {
                anyhow::anyhow!("CONTENT_STORE_API_KEY (or SUPABASE_ANON_KEY) is not set")
            })?;

        let store_service_token =
            var_or_alias("CONTENT_STORE_SERVICE_TOKEN", "SUPABASE_SERVICE_ROLE_KEY").ok_or_else(
                || {
                    anyhow::anyhow!(
                        "CONTENT_STORE_SERVICE_TOKEN (or SUPABASE_SERVICE_ROLE_KEY) is not set"
                    )
                },
            )?;

        let site_name =
            std::env::var("PREVIEW_SITE_NAME").unwrap_or_else(|_| "Fundación".to_string());

        let locale = std::env::var("PREVIEW_LOCALE").unwrap_or_else(|_| "es_AR".to_string());

        let redirect_strategy = match std::env::var("PREVIEW_REDIRECT_STRATEGY") {
            Ok(value) => RedirectStrategy::parse(&value)?,
            Err(_) => RedirectStrategy::Status,
        };

        let fallback_host = std::env::var("PREVIEW_FALLBACK_HOST")
            .unwrap_or_else(|_| "localhost:8081".to_string());

        // Credential values are secrets; log presence only.
        tracing::info!(
            bind_addr = %bind_addr,
            store_url = %store_url,
            site_name = %site_name,
            locale = %locale,
            redirect_strategy = %redirect_strategy,
            "preview configuration loaded"
        );

        Ok(Self {
            bind_addr,
            store_url,
            store_api_key,
            store_service_token,
            site_name,
            locale,
            redirect_strategy,
            fallback_host,
        })
    }
}
