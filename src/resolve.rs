//! Content key resolution.
//!
//! A share link carries an opaque key that is either the entity's UUID or its
//! human-readable slug. This module classifies the key and builds the
//! equality filter for the store's query string.

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// RFC 4122 textual UUID: 8-4-4-4-12 hex groups, version nibble 1-5,
/// variant nibble 8/9/a/b, case-insensitive.
static UUID_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    )
    .unwrap()
});

/// Characters escaped when a slug is embedded in a query-string value.
/// Everything outside the RFC 3986 unreserved set is encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The store column an equality filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupColumn {
    /// The entity's identity (UUID) column.
    Id,
    /// The human-readable slug column.
    Slug,
}

impl LookupColumn {
    /// Column name in the store schema.
    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Slug => "slug",
        }
    }
}

/// An equality filter against a single store column, ready for inclusion in
/// a query string. The value is already percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFilter {
    /// Column the filter applies to.
    pub column: LookupColumn,
    /// Percent-encoded filter value.
    pub value: String,
}

impl LookupFilter {
    /// Render as a PostgREST-style query-string fragment, e.g. `slug=eq.mi-nota`.
    pub fn to_query(&self) -> String {
        format!("{}=eq.{}", self.column.name(), self.value)
    }
}

/// Classify a non-empty content key and build the corresponding lookup filter.
///
/// UUID-shaped keys filter on the identity column; everything else filters on
/// the slug column with the raw key percent-encoded. Deterministic, no side
/// effects. Callers reject empty keys before invoking this.
pub fn resolve(raw_key: &str) -> LookupFilter {
    if UUID_RE.is_match(raw_key) {
        LookupFilter {
            column: LookupColumn::Id,
            value: raw_key.to_ascii_lowercase(),
        }
    } else {
        LookupFilter {
            column: LookupColumn::Slug,
            value: utf8_percent_encode(raw_key, QUERY_VALUE).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_v4_selects_id_filter() {
        let filter = resolve("a1b2c3d4-e5f6-4789-8abc-1234567890ab");
        assert_eq!(filter.column, LookupColumn::Id);
        assert_eq!(filter.to_query(), "id=eq.a1b2c3d4-e5f6-4789-8abc-1234567890ab");
    }

    #[test]
    fn uuid_uppercase_accepted_and_lowercased() {
        let filter = resolve("A1B2C3D4-E5F6-4789-8ABC-1234567890AB");
        assert_eq!(filter.column, LookupColumn::Id);
        assert_eq!(filter.value, "a1b2c3d4-e5f6-4789-8abc-1234567890ab");
    }

    #[test]
    fn uuid_v1_accepted() {
        let filter = resolve("a1b2c3d4-e5f6-1789-9abc-1234567890ab");
        assert_eq!(filter.column, LookupColumn::Id);
    }

    #[test]
    fn uuid_all_variant_nibbles_accepted() {
        for variant in ['8', '9', 'a', 'b'] {
            let key = format!("a1b2c3d4-e5f6-4789-{variant}abc-1234567890ab");
            assert_eq!(resolve(&key).column, LookupColumn::Id, "variant {variant}");
        }
    }

    #[test]
    fn uuid_version_zero_falls_through_to_slug() {
        let filter = resolve("a1b2c3d4-e5f6-0789-8abc-1234567890ab");
        assert_eq!(filter.column, LookupColumn::Slug);
    }

    #[test]
    fn uuid_bad_variant_falls_through_to_slug() {
        // variant nibble 'c' is outside 8/9/a/b
        let filter = resolve("a1b2c3d4-e5f6-4789-cabc-1234567890ab");
        assert_eq!(filter.column, LookupColumn::Slug);
    }

    #[test]
    fn uuid_without_dashes_is_a_slug() {
        let filter = resolve("a1b2c3d4e5f647898abc1234567890ab");
        assert_eq!(filter.column, LookupColumn::Slug);
    }

    #[test]
    fn plain_slug_selects_slug_filter() {
        let filter = resolve("mi-noticia-2024");
        assert_eq!(filter.column, LookupColumn::Slug);
        assert_eq!(filter.to_query(), "slug=eq.mi-noticia-2024");
    }

    #[test]
    fn slug_with_spaces_is_percent_encoded() {
        let filter = resolve("mi noticia");
        assert_eq!(filter.value, "mi%20noticia");
    }

    #[test]
    fn slug_with_reserved_chars_is_percent_encoded() {
        let filter = resolve("a&b=c/d");
        assert_eq!(filter.value, "a%26b%3Dc%2Fd");
    }

    #[test]
    fn slug_with_unicode_is_percent_encoded() {
        let filter = resolve("educación");
        assert_eq!(filter.value, "educaci%C3%B3n");
    }

    #[test]
    fn slug_unreserved_chars_untouched() {
        let filter = resolve("a-b_c.d~e");
        assert_eq!(filter.value, "a-b_c.d~e");
    }

    #[test]
    fn resolve_is_deterministic() {
        assert_eq!(resolve("mi-noticia"), resolve("mi-noticia"));
    }
}
