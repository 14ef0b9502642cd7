//! Text and URL helpers shared by the preview renderers.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Maximum description length in characters, after tag stripping and
/// whitespace collapsing. Truncation may split mid-word; accepted policy.
pub const DESCRIPTION_MAX: usize = 180;

/// Standard Open Graph image dimensions.
pub const OG_IMAGE_WIDTH: u32 = 1200;
pub const OG_IMAGE_HEIGHT: u32 = 630;

/// Characters escaped when a key is embedded in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'/')
    .add(b'\\')
    .add(b'^')
    .add(b'|');

/// Inline CSS for the visible fallback body on preview pages.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#fafafa;color:#1a1a2e;padding:1rem}
.preview-card{max-width:480px;text-align:center}
.preview-card h1{font-size:1.4rem;margin-bottom:.75rem;line-height:1.3}
.preview-card p{color:#555;margin-bottom:1.25rem;line-height:1.55}
.preview-card a{display:inline-block;color:#fff;background:#0a6cbc;padding:.55rem 1.2rem;border-radius:6px;text-decoration:none;font-weight:500}
@media(prefers-color-scheme:dark){
body{background:#0f0f17;color:#e0e0e8}
.preview-card p{color:#aaa}
}
"#;

/// Inline CSS for error pages.
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#fafafa;color:#1a1a2e;padding:1rem}
.error-page{text-align:center;max-width:400px}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#666;margin-bottom:1rem;line-height:1.5}
.error-page a{color:#0a6cbc}
@media(prefers-color-scheme:dark){
body{background:#0f0f17;color:#e0e0e8}
.error-page p{color:#aaa}
.error-page a{color:#5ab0f0}
}
"#;

/// Percent-encode a key for use as a URL path segment.
pub fn encode_path_segment(key: &str) -> String {
    utf8_percent_encode(key, PATH_SEGMENT).to_string()
}

/// Escaping wrapper for store-supplied strings.
///
/// Maud's default escaper covers `&`, `<`, `>` and `"`; content fields also
/// need `'` replaced so no raw quote ever lands inside markup. Wrap any
/// interpolated store value in `Esc` instead of relying on the default.
pub struct Esc<'a>(pub &'a str);

impl maud::Render for Esc<'_> {
    fn render_to(&self, buffer: &mut String) {
        for c in self.0.chars() {
            match c {
                '&' => buffer.push_str("&amp;"),
                '<' => buffer.push_str("&lt;"),
                '>' => buffer.push_str("&gt;"),
                '"' => buffer.push_str("&quot;"),
                '\'' => buffer.push_str("&apos;"),
                _ => buffer.push(c),
            }
        }
    }
}

/// Replace every `<...>` tag span with a single space. An unterminated `<`
/// swallows the remainder of the string, matching the span rule.
pub fn strip_tags(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut in_tag = false;
    for c in body.chars() {
        match c {
            '<' if !in_tag => {
                in_tag = true;
                out.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Derive the preview description from a body that may contain markup:
/// strip tags, collapse whitespace runs to single spaces, trim, and truncate
/// to [`DESCRIPTION_MAX`] characters.
pub fn describe(body: &str) -> String {
    let stripped = strip_tags(body);
    let collapsed: String = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(DESCRIPTION_MAX).collect()
}

/// Whether a URL is already absolute.
pub fn is_absolute_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Make an image reference absolute against the request's scheme and host,
/// inserting exactly one separating slash. Absolute URLs pass through.
pub fn absolutize(image: &str, scheme: &str, host: &str) -> String {
    if is_absolute_url(image) {
        image.to_string()
    } else {
        format!("{scheme}://{host}/{}", image.trim_start_matches('/'))
    }
}

/// Parse a stored creation timestamp and reformat it as a UTC RFC 3339
/// instant for `article:published_time`.
///
/// Accepts RFC 3339 with offset, or a naive timestamp (with optional
/// fractional seconds) interpreted as UTC. Returns `None` when the value
/// cannot be parsed; callers log that, never guess.
pub fn published_instant(raw: &str) -> Option<String> {
    let utc: DateTime<Utc> = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.with_timezone(&Utc)
    } else {
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()?;
        naive.and_utc()
    };
    Some(utc.to_rfc3339_opts(SecondsFormat::Secs, true))
}
