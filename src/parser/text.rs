use std::sync::LazyLock;

use quick_xml::escape::unescape_with;
use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Named entities seen in GitHub-rendered summary HTML, beyond the numeric
/// references quick-xml resolves on its own.
fn resolve_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        "nbsp" => Some("\u{a0}"),
        "ndash" => Some("\u{2013}"),
        "mdash" => Some("\u{2014}"),
        "lsquo" => Some("\u{2018}"),
        "rsquo" => Some("\u{2019}"),
        "ldquo" => Some("\u{201c}"),
        "rdquo" => Some("\u{201d}"),
        "hellip" => Some("\u{2026}"),
        _ => None,
    }
}

/// Decode entity references. Input with stray ampersands or unknown entities
/// comes back unchanged instead of erroring.
pub fn decode_entities(raw: &str) -> String {
    match unescape_with(raw, resolve_entity) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Entity-decode, collapse non-breaking spaces to regular spaces, and trim.
pub fn normalize(raw: &str) -> String {
    decode_entities(raw).replace('\u{a0}', " ").trim().to_string()
}

/// Drop every tag, keeping only text content.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nbsp_collapses_then_trims() {
        assert_eq!(normalize("  Fixed&nbsp;X  "), "Fixed X");
    }

    #[test]
    fn predefined_and_numeric_entities() {
        assert_eq!(normalize("Tom &amp; Jerry&#39;s &lt;fix&gt;"), "Tom & Jerry's <fix>");
    }

    #[test]
    fn typographic_entities() {
        assert_eq!(normalize("wait&hellip; done &mdash; finally"), "wait… done — finally");
    }

    #[test]
    fn stray_ampersand_passes_through() {
        assert_eq!(normalize(" AT&T rocks "), "AT&T rocks");
    }

    #[test]
    fn unknown_entity_passes_through() {
        assert_eq!(normalize("&bogus; text"), "&bogus; text");
    }

    #[test]
    fn strip_tags_keeps_text() {
        assert_eq!(strip_tags("<p>Hello <em>world</em></p>"), "Hello world");
    }
}
