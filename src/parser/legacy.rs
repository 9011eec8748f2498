use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::text;
use super::Category;

static STRONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<strong[^>]*>([^<]+)</strong>").unwrap());
static UL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<ul[^>]*>(.*?)</ul>").unwrap());
static LI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<li[^>]*>(.*?)</li>").unwrap());

/// Fallback scan for summaries without the structured two-level list: every
/// bolded run of text is a candidate section title, and the first `<ul>`
/// after it supplies the items. Titles whose section yields no items are
/// dropped.
pub fn detect(html: &str) -> Vec<Category> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut categories = Vec::new();

    for caps in STRONG_RE.captures_iter(html) {
        let title = caps[1].trim().to_string();
        if title.is_empty() || !seen.insert(title.clone()) {
            continue;
        }
        let items = extract_section_items(html, &title);
        if !items.is_empty() {
            categories.push(Category { title, items });
        }
    }

    categories
}

/// Locate a bolded section title and pull the direct items of the first
/// unordered list that follows it. Patterns run from most to least specific;
/// the first one that matches anywhere wins.
fn extract_section_items(html: &str, title: &str) -> Vec<String> {
    let quoted = regex::escape(title);
    let patterns = [
        format!(r"(?i)<strong[^>]*>{quoted}[^<]*</strong>"),
        format!(r"(?i)<li[^>]*><strong[^>]*>{quoted}[^<]*</strong>"),
        format!(r"(?i)<p[^>]*><strong[^>]*>{quoted}[^<]*</strong></p>"),
    ];

    let section = patterns.iter().find_map(|pattern| match Regex::new(pattern) {
        Ok(re) => re.find(html),
        Err(e) => {
            debug!("skipping unusable section pattern for {:?}: {}", title, e);
            None
        }
    });
    let Some(section) = section else {
        return Vec::new();
    };

    let after = &html[section.end()..];
    let Some(list) = UL_RE.captures(after) else {
        return Vec::new();
    };

    LI_RE
        .captures_iter(&list[1])
        .map(|item| text::normalize(&text::strip_tags(&item[1])))
        .filter(|item| !item.is_empty())
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_title_in_paragraph() {
        let html = "<p><strong>Bug Fixes</strong></p>\
            <ul><li>Fixed A</li><li>Fixed B</li></ul>";
        let cats = detect(html);
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].title, "Bug Fixes");
        assert_eq!(cats[0].items, vec!["Fixed A", "Fixed B"]);
    }

    #[test]
    fn multiple_sections_in_document_order() {
        let html = "<p><strong>Bug Fixes</strong></p><ul><li>a</li></ul>\
            <p><strong>Chores</strong></p><ul><li>b</li></ul>";
        let cats = detect(html);
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].title, "Bug Fixes");
        assert_eq!(cats[1].title, "Chores");
        assert_eq!(cats[1].items, vec!["b"]);
    }

    #[test]
    fn title_without_following_list_is_dropped() {
        let html = "<ul><li>early list</li></ul><p><strong>Notes</strong></p>";
        assert!(detect(html).is_empty());
    }

    #[test]
    fn items_are_tag_stripped_and_decoded() {
        let html = "<p><strong>Polish</strong></p>\
            <ul><li><em>Faster</em> startup &amp; shutdown</li></ul>";
        let cats = detect(html);
        assert_eq!(cats[0].items, vec!["Faster startup & shutdown"]);
    }

    #[test]
    fn duplicate_bold_titles_collapse() {
        let html = "<p><strong>Fixes</strong></p><ul><li>a</li></ul>\
            <p><strong>Fixes</strong></p><ul><li>a</li></ul>";
        let cats = detect(html);
        assert_eq!(cats.len(), 1);
    }

    #[test]
    fn strong_tag_case_is_ignored() {
        let html = "<p><STRONG>Fixes</STRONG></p><ul><li>works</li></ul>";
        let cats = detect(html);
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].items, vec!["works"]);
    }

    #[test]
    fn empty_items_do_not_keep_a_section() {
        let html = "<p><strong>Fixes</strong></p><ul><li>   </li><li></li></ul>";
        assert!(detect(html).is_empty());
    }

    #[test]
    fn legacy_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/legacy_summary.html").unwrap();
        let cats = detect(&html);
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].title, "Bug Fixes");
        assert_eq!(cats[0].items.len(), 2);
        assert_eq!(cats[1].title, "Chores");
    }
}
