//! Content store read layer.
//!
//! The store is a hosted tabular database exposed over a PostgREST-style
//! HTTPS API. Every preview request performs exactly one read: an equality
//! filter on the id or slug column with a minimal field projection. No
//! retries; preview traffic is ephemeral and a failed fetch simply fails
//! the request.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;

use crate::config::Config;
use crate::error::PreviewError;
use crate::resolve::LookupFilter;

/// Outbound request timeout. Expiry surfaces as an upstream error so the
/// serving slot is never blocked indefinitely.
const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// The two shareable content kinds, each with its own table, field names,
/// and canonical path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// News article (`/novedades/`).
    News,
    /// Partner profile (`/partners/`).
    Partner,
}

/// Static description of an entity kind: where it lives in the store and how
/// its preview is addressed and rendered.
#[derive(Debug)]
pub struct KindDescriptor {
    /// Store table name.
    pub table: &'static str,
    /// Select-field projection sent to the store.
    pub select: &'static str,
    /// Canonical path segment on the main site.
    pub canonical_segment: &'static str,
    /// Default image asset path when the entity has none.
    pub default_image: &'static str,
    /// Open Graph object type.
    pub og_type: &'static str,
    /// Human-readable label used in logs and error bodies.
    pub label: &'static str,
}

const NEWS: KindDescriptor = KindDescriptor {
    table: "novedades",
    select: "id,slug,title,content,image,created_at",
    canonical_segment: "novedades",
    default_image: "/images/og-novedades.jpg",
    og_type: "article",
    label: "novedad",
};

const PARTNER: KindDescriptor = KindDescriptor {
    table: "partners",
    select: "id,slug,nombre,descripcion,logo,created_at",
    canonical_segment: "partners",
    default_image: "/images/og-partners.jpg",
    og_type: "website",
    label: "partner",
};

impl EntityKind {
    /// The kind's static descriptor.
    pub fn descriptor(self) -> &'static KindDescriptor {
        match self {
            Self::News => &NEWS,
            Self::Partner => &PARTNER,
        }
    }
}

/// A news row as projected by [`NEWS.select`].
#[derive(Debug, Clone, Deserialize)]
struct NewsRow {
    id: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

/// A partner row as projected by [`PARTNER.select`].
#[derive(Debug, Clone, Deserialize)]
struct PartnerRow {
    id: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    nombre: Option<String>,
    #[serde(default)]
    descripcion: Option<String>,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

/// Normalized shareable content, independent of the kind-specific column
/// names. Read-only; this service never writes to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareableContent {
    /// Entity identity (UUID).
    pub id: String,
    /// Human-readable slug, preferred for canonical URLs when present.
    pub slug: Option<String>,
    /// Display title; may be absent.
    pub title: Option<String>,
    /// Body text; may contain markup.
    pub body: String,
    /// Image URL or asset path; may be relative.
    pub image: Option<String>,
    /// Raw creation timestamp as stored.
    pub created_at: Option<String>,
}

impl ShareableContent {
    /// The key used in the canonical human-facing URL: slug when present,
    /// id otherwise.
    pub fn canonical_key(&self) -> &str {
        self.slug.as_deref().filter(|s| !s.is_empty()).unwrap_or(&self.id)
    }
}

impl From<NewsRow> for ShareableContent {
    fn from(row: NewsRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            body: row.content.unwrap_or_default(),
            image: row.image.filter(|s| !s.is_empty()),
            created_at: row.created_at,
        }
    }
}

impl From<PartnerRow> for ShareableContent {
    fn from(row: PartnerRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.nombre,
            body: row.descripcion.unwrap_or_default(),
            image: row.logo.filter(|s| !s.is_empty()),
            created_at: row.created_at,
        }
    }
}

/// Authenticated client for the content store.
///
/// Credentials are attached as default headers at construction time, after
/// startup validation; handlers never touch the environment.
#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    /// Build a store client from validated configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(&config.store_api_key)
            .map_err(|_| anyhow::anyhow!("store API key contains invalid header characters"))?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.store_service_token))
            .map_err(|_| anyhow::anyhow!("store service token contains invalid header characters"))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(STORE_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.store_url.clone(),
        })
    }

    /// Fetch the single row matching `filter`, or `None` when the store
    /// returns an empty result set. Zero rows is an expected outcome, not an
    /// error; a non-success status is mirrored back via
    /// [`PreviewError::Upstream`].
    pub async fn fetch(
        &self,
        kind: EntityKind,
        filter: &LookupFilter,
    ) -> Result<Option<ShareableContent>, PreviewError> {
        let url = self.request_url(kind, filter);

        let response = self.http.get(&url).send().await.map_err(|err| {
            if err.is_timeout() {
                PreviewError::Upstream { status: 504 }
            } else {
                err.into()
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PreviewError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let content = decode_rows(kind, &body)?;

        tracing::debug!(
            kind = kind.descriptor().label,
            filter = %filter.to_query(),
            found = content.is_some(),
            "store fetch completed"
        );

        Ok(content)
    }

    /// Full request URL for a kind + filter. The filter value is already
    /// percent-encoded by the resolver.
    fn request_url(&self, kind: EntityKind, filter: &LookupFilter) -> String {
        let d = kind.descriptor();
        format!(
            "{}/rest/v1/{}?select={}&{}&limit=1",
            self.base_url,
            d.table,
            d.select,
            filter.to_query()
        )
    }
}

/// Decode a store response body into at most one normalized content row.
/// A shape mismatch is a decode error, distinct from upstream failures.
fn decode_rows(kind: EntityKind, body: &str) -> Result<Option<ShareableContent>, PreviewError> {
    match kind {
        EntityKind::News => {
            let rows: Vec<NewsRow> = serde_json::from_str(body).map_err(PreviewError::Decode)?;
            Ok(rows.into_iter().next().map(Into::into))
        }
        EntityKind::Partner => {
            let rows: Vec<PartnerRow> = serde_json::from_str(body).map_err(PreviewError::Decode)?;
            Ok(rows.into_iter().next().map(Into::into))
        }
    }
}
