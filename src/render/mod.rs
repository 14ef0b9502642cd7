//! HTML rendering for preview responses.
//!
//! Two documents exist: the crawler-facing metadata page (Open Graph +
//! Twitter Card tags with a visible fallback body) and the human-facing
//! redirect page (meta refresh plus a clickable link, optionally with a
//! script redirect for the always-200 strategy).
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! generation; every interpolated value is escaped, so content fields cannot
//! inject markup.

pub mod components;

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::query::{KindDescriptor, ShareableContent};
use components::{
    Esc, OG_IMAGE_HEIGHT, OG_IMAGE_WIDTH, absolutize, describe, encode_path_segment,
    published_instant,
};

/// Fixed placeholder when the entity carries no title.
const UNTITLED: &str = "Sin título";

/// Per-request context derived at the HTTP boundary. Never shared across
/// requests; discarded when the response completes.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request scheme ("http" or "https").
    pub scheme: String,
    /// Request host, including port when present.
    pub host: String,
    /// Declared client identity string; empty when absent.
    pub user_agent: String,
    /// The raw content key the client asked for.
    pub requested_key: String,
}

/// Canonical human-facing URL for a piece of content, slug preferred over id,
/// percent-encoded for the path.
pub fn canonical_url(kind: &KindDescriptor, content: &ShareableContent, ctx: &RequestContext) -> String {
    format!(
        "{}://{}/{}/{}",
        ctx.scheme,
        ctx.host,
        kind.canonical_segment,
        encode_path_segment(content.canonical_key())
    )
}

/// Render the crawler-facing metadata document.
///
/// Contains the full OG/Twitter tag set, a canonical link, a noindex robots
/// tag, and a visible fallback card for clients that render the page.
pub fn metadata_page(
    kind: &KindDescriptor,
    content: &ShareableContent,
    ctx: &RequestContext,
    site_name: &str,
    locale: &str,
) -> Markup {
    let title = content
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(UNTITLED);
    let description = describe(&content.body);
    let canonical = canonical_url(kind, content, ctx);

    let image = absolutize(
        content.image.as_deref().unwrap_or(kind.default_image),
        &ctx.scheme,
        &ctx.host,
    );
    let image_is_https = image.starts_with("https://");

    // News timestamps become article:published_time; an unparseable value is
    // logged and the tag omitted rather than guessed.
    let published = if kind.og_type == "article" {
        content.created_at.as_deref().and_then(|raw| {
            let parsed = published_instant(raw);
            if parsed.is_none() {
                tracing::warn!(
                    kind = kind.label,
                    id = %content.id,
                    raw_timestamp = raw,
                    "stored creation timestamp is unparseable, omitting published_time"
                );
            }
            parsed
        })
    } else {
        None
    };

    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (Esc(title)) }
                meta name="description" content=(Esc(&description));
                meta name="robots" content="noindex, nofollow";
                link rel="canonical" href=(Esc(&canonical));

                // Open Graph
                meta property="og:type" content=(kind.og_type);
                meta property="og:title" content=(Esc(title));
                meta property="og:description" content=(Esc(&description));
                meta property="og:url" content=(Esc(&canonical));
                meta property="og:site_name" content=(Esc(site_name));
                meta property="og:locale" content=(locale);
                meta property="og:image" content=(Esc(&image));
                @if image_is_https {
                    meta property="og:image:secure_url" content=(Esc(&image));
                }
                meta property="og:image:width" content=(OG_IMAGE_WIDTH);
                meta property="og:image:height" content=(OG_IMAGE_HEIGHT);
                @if let Some(instant) = &published {
                    meta property="article:published_time" content=(instant);
                }

                // Twitter Card
                meta name="twitter:card" content="summary_large_image";
                meta name="twitter:title" content=(Esc(title));
                meta name="twitter:description" content=(Esc(&description));
                meta name="twitter:image" content=(Esc(&image));

                style { (PreEscaped(components::PAGE_CSS)) }
            }
            body {
                main class="preview-card" {
                    h1 { (Esc(title)) }
                    p { (Esc(&description)) }
                    a href=(Esc(&canonical)) { "Ver en " (Esc(site_name)) }
                }
            }
        }
    }
}

/// Render the human-facing redirect document.
///
/// Always carries a meta refresh and a clickable link; `with_script` adds a
/// `location.replace` script for the always-200 redirect strategy, where no
/// Location header is sent.
pub fn redirect_page(canonical: &str, site_name: &str, with_script: bool) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta http-equiv="refresh" content=(Esc(&format!("0;url={canonical}")));
                title { "Redirigiendo…" }
                meta name="robots" content="noindex, nofollow";
                @if with_script {
                    script { (PreEscaped(format!(
                        "location.replace({});",
                        serde_json::to_string(canonical).unwrap_or_default()
                    ))) }
                }
                style { (PreEscaped(components::PAGE_CSS)) }
            }
            body {
                main class="preview-card" {
                    p { "Redirigiendo a " (Esc(site_name)) "…" }
                    a href=(Esc(canonical)) { "Continuar" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::EntityKind;

    fn ctx() -> RequestContext {
        RequestContext {
            scheme: "https".to_string(),
            host: "fundacion.test".to_string(),
            user_agent: "Twitterbot/1.0".to_string(),
            requested_key: "mi-noticia-2024".to_string(),
        }
    }

    fn news_content() -> ShareableContent {
        ShareableContent {
            id: "a1b2c3d4-e5f6-4789-8abc-1234567890ab".to_string(),
            slug: Some("mi-noticia-2024".to_string()),
            title: Some("Una noticia".to_string()),
            body: "<p>El cuerpo de la noticia.</p>".to_string(),
            image: Some("https://cdn.test/foto.jpg".to_string()),
            created_at: Some("2024-05-01T12:00:00+00:00".to_string()),
        }
    }

    #[test]
    fn canonical_url_prefers_slug() {
        let url = canonical_url(EntityKind::News.descriptor(), &news_content(), &ctx());
        assert_eq!(url, "https://fundacion.test/novedades/mi-noticia-2024");
    }

    #[test]
    fn canonical_url_encodes_key() {
        let mut content = news_content();
        content.slug = Some("dos palabras".to_string());
        let url = canonical_url(EntityKind::News.descriptor(), &content, &ctx());
        assert_eq!(url, "https://fundacion.test/novedades/dos%20palabras");
    }

    #[test]
    fn metadata_page_contains_og_and_twitter_tags() {
        let html = metadata_page(
            EntityKind::News.descriptor(),
            &news_content(),
            &ctx(),
            "Fundación",
            "es_AR",
        )
        .into_string();

        assert!(html.contains(r#"property="og:type" content="article""#));
        assert!(html.contains(r#"property="og:title" content="Una noticia""#));
        assert!(html.contains(r#"property="og:url" content="https://fundacion.test/novedades/mi-noticia-2024""#));
        assert!(html.contains(r#"property="og:site_name" content="Fundación""#));
        assert!(html.contains(r#"property="og:locale" content="es_AR""#));
        assert!(html.contains(r#"property="og:image" content="https://cdn.test/foto.jpg""#));
        assert!(html.contains(r#"property="og:image:secure_url""#));
        assert!(html.contains(r#"property="og:image:width" content="1200""#));
        assert!(html.contains(r#"property="og:image:height" content="630""#));
        assert!(html.contains(r#"name="twitter:card" content="summary_large_image""#));
        assert!(html.contains(r#"name="twitter:title" content="Una noticia""#));
        assert!(html.contains(r#"rel="canonical""#));
        assert!(html.contains(r#"name="robots" content="noindex, nofollow""#));
        assert!(html.contains("El cuerpo de la noticia."));
    }

    #[test]
    fn metadata_page_escapes_content_fields() {
        let mut content = news_content();
        content.title = Some(r#"<script>"x" & 'y'</script>"#.to_string());
        content.body = r#"Tom & Jerry, "comillas" y 'simples'"#.to_string();

        let html = metadata_page(
            EntityKind::News.descriptor(),
            &content,
            &ctx(),
            "Fundación",
            "es_AR",
        )
        .into_string();

        assert!(!html.contains("<script>\"x\""));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&quot;x&quot;"));
        assert!(html.contains("&amp;"));
        assert!(html.contains("&apos;y&apos;"));
        assert!(!html.contains("'y'"));
        // Body interpolations are escaped too
        assert!(html.contains("Tom &amp; Jerry, &quot;comillas&quot; y &apos;simples&apos;"));
    }

    #[test]
    fn metadata_page_title_placeholder_when_absent() {
        let mut content = news_content();
        content.title = None;
        let html = metadata_page(
            EntityKind::News.descriptor(),
            &content,
            &ctx(),
            "Fundación",
            "es_AR",
        )
        .into_string();
        assert!(html.contains("Sin título"));
    }

    #[test]
    fn metadata_page_default_image_absolutized() {
        let mut content = news_content();
        content.image = None;
        let html = metadata_page(
            EntityKind::News.descriptor(),
            &content,
            &ctx(),
            "Fundación",
            "es_AR",
        )
        .into_string();
        assert!(html.contains(
            r#"property="og:image" content="https://fundacion.test/images/og-novedades.jpg""#
        ));
    }

    #[test]
    fn metadata_page_relative_image_absolutized() {
        let mut content = news_content();
        content.image = Some("/uploads/foto.png".to_string());
        let html = metadata_page(
            EntityKind::News.descriptor(),
            &content,
            &ctx(),
            "Fundación",
            "es_AR",
        )
        .into_string();
        assert!(html.contains(r#"content="https://fundacion.test/uploads/foto.png""#));
    }

    #[test]
    fn metadata_page_published_time_for_news() {
        let html = metadata_page(
            EntityKind::News.descriptor(),
            &news_content(),
            &ctx(),
            "Fundación",
            "es_AR",
        )
        .into_string();
        assert!(html.contains(
            r#"property="article:published_time" content="2024-05-01T12:00:00Z""#
        ));
    }

    #[test]
    fn metadata_page_bad_timestamp_omits_published_time() {
        let mut content = news_content();
        content.created_at = Some("mañana".to_string());
        let html = metadata_page(
            EntityKind::News.descriptor(),
            &content,
            &ctx(),
            "Fundación",
            "es_AR",
        )
        .into_string();
        assert!(!html.contains("article:published_time"));
    }

    #[test]
    fn metadata_page_no_published_time_for_partners() {
        let html = metadata_page(
            EntityKind::Partner.descriptor(),
            &news_content(),
            &ctx(),
            "Fundación",
            "es_AR",
        )
        .into_string();
        assert!(!html.contains("article:published_time"));
        assert!(html.contains(r#"property="og:type" content="website""#));
    }

    #[test]
    fn metadata_page_is_deterministic() {
        let a = metadata_page(
            EntityKind::News.descriptor(),
            &news_content(),
            &ctx(),
            "Fundación",
            "es_AR",
        )
        .into_string();
        let b = metadata_page(
            EntityKind::News.descriptor(),
            &news_content(),
            &ctx(),
            "Fundación",
            "es_AR",
        )
        .into_string();
        assert_eq!(a, b);
    }

    #[test]
    fn redirect_page_has_refresh_and_link() {
        let html = redirect_page(
            "https://fundacion.test/novedades/mi-noticia-2024",
            "Fundación",
            false,
        )
        .into_string();
        assert!(html.contains("http-equiv=\"refresh\""));
        assert!(html.contains("0;url=https://fundacion.test/novedades/mi-noticia-2024"));
        assert!(html.contains(r#"href="https://fundacion.test/novedades/mi-noticia-2024""#));
        assert!(!html.contains("location.replace"));
    }

    #[test]
    fn redirect_page_escapes_target_url() {
        let html = redirect_page(
            "https://fundacion.test/novedades/nota-d'agua",
            "Fundación",
            false,
        )
        .into_string();
        assert!(html.contains("0;url=https://fundacion.test/novedades/nota-d&apos;agua"));
        assert!(html.contains(r#"href="https://fundacion.test/novedades/nota-d&apos;agua""#));
        assert!(!html.contains("nota-d'agua"));
    }

    #[test]
    fn redirect_page_script_variant() {
        let html = redirect_page("https://fundacion.test/partners/acme", "Fundación", true)
            .into_string();
        assert!(html.contains(r#"location.replace("https://fundacion.test/partners/acme");"#));
    }
}
