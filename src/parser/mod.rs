pub mod key;
pub mod legacy;
pub mod summary;
pub mod text;

use tracing::{info, warn};

/// One category parsed out of a PR summary: a section title and its items,
/// in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    pub title: String,
    pub items: Vec<String>,
}

/// A category with its derived changelog key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedCategory {
    pub key: String,
    pub title: String,
    pub items: Vec<String>,
}

/// Parse categories out of a PR summary fragment.
///
/// The structured summary parser runs first; when it finds nothing the legacy
/// bold-title scan takes over. An empty result is valid and only logged.
pub fn parse_categories(html: &str) -> Vec<KeyedCategory> {
    let keyed = key::key_categories(summary::parse(html));
    if !keyed.is_empty() {
        info!("summary parser found {} categories", keyed.len());
        return keyed;
    }

    let keyed = key::key_categories(legacy::detect(html));
    if keyed.is_empty() {
        warn!("no categories found in summary fragment");
    } else {
        info!("legacy detector found {} categories", keyed.len());
    }
    keyed
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_parser_wins_when_it_finds_categories() {
        // Structured summary plus a strong-tagged section elsewhere: the
        // strong section must not leak into the result.
        let html = "<h2>Summary by CodeRabbit</h2>\
            <ul><li>New Features<ul><li>Added login</li></ul></li></ul>\
            <p><strong>Ignored</strong></p><ul><li>nope</li></ul>";
        let keyed = parse_categories(html);
        assert_eq!(keyed.len(), 1);
        assert_eq!(keyed[0].key, "new_features");
        assert_eq!(keyed[0].items, vec!["Added login"]);
    }

    #[test]
    fn fallback_runs_when_primary_finds_nothing() {
        let html = std::fs::read_to_string("tests/fixtures/legacy_summary.html").unwrap();
        let keyed = parse_categories(&html);
        assert_eq!(keyed.len(), 2);
        assert_eq!(keyed[0].key, "bug_fixes");
        assert_eq!(keyed[1].key, "chores");
    }

    #[test]
    fn empty_document_yields_empty_result() {
        assert!(parse_categories("<p>nothing to see</p>").is_empty());
    }

    #[test]
    fn summary_list_to_keyed_categories() {
        let html = "<h2>Summary by CodeRabbit</h2><ul><li>New Features<ul><li>Added login</li><li>Added logout</li></ul></li></ul>";
        let keyed = parse_categories(html);
        assert_eq!(keyed.len(), 1);
        assert_eq!(keyed[0].key, "new_features");
        assert_eq!(keyed[0].title, "New Features");
        assert_eq!(keyed[0].items, vec!["Added login", "Added logout"]);
    }
}
