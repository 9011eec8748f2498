use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::{Category, KeyedCategory};

// Lowercase ASCII alphanumerics and Hangul syllables survive; every other run
// of characters collapses to a single underscore.
static UNSAFE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9가-힣]+").unwrap());

/// Derive a stable mapping key from a category title. A title with no safe
/// characters falls back to the category's position in the parse result.
pub fn derive_key(title: &str, index: usize) -> String {
    let lowered = title.to_lowercase();
    let collapsed = UNSAFE_RE.replace_all(&lowered, "_");
    let key = collapsed.trim_matches('_');
    if key.is_empty() {
        format!("category_{index}")
    } else {
        key.to_string()
    }
}

/// Assign keys to parsed categories. Placeholders with neither title nor
/// items are skipped but still advance the positional index; duplicate keys
/// get the position appended.
pub fn key_categories(categories: Vec<Category>) -> Vec<KeyedCategory> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keyed = Vec::new();

    for (index, category) in categories.into_iter().enumerate() {
        if category.title.is_empty() && category.items.is_empty() {
            continue;
        }
        let mut key = derive_key(&category.title, index);
        while !seen.insert(key.clone()) {
            key = format!("{key}_{index}");
        }
        let title = if category.title.is_empty() {
            format!("Category {index}")
        } else {
            category.title
        };
        keyed.push(KeyedCategory {
            key,
            title,
            items: category.items,
        });
    }

    keyed
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(title: &str, items: &[&str]) -> Category {
        Category {
            title: title.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn title_to_key() {
        assert_eq!(derive_key("Bug Fixes", 0), "bug_fixes");
        assert_eq!(derive_key("New Features!", 0), "new_features");
        assert_eq!(derive_key("Breaking - Changes", 0), "breaking_changes");
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(derive_key("Bug Fixes", 0), derive_key("Bug Fixes", 7));
    }

    #[test]
    fn hangul_titles_survive() {
        assert_eq!(derive_key("버그 수정", 0), "버그_수정");
    }

    #[test]
    fn unsafe_only_title_falls_back_to_position() {
        assert_eq!(derive_key("!!!", 3), "category_3");
    }

    #[test]
    fn empty_placeholders_skipped_but_index_advances() {
        let keyed = key_categories(vec![cat("", &[]), cat("!!!", &["x"])]);
        assert_eq!(keyed.len(), 1);
        assert_eq!(keyed[0].key, "category_1");
    }

    #[test]
    fn titleless_category_with_items_gets_positional_title() {
        let keyed = key_categories(vec![cat("", &["orphan item"])]);
        assert_eq!(keyed[0].key, "category_0");
        assert_eq!(keyed[0].title, "Category 0");
        assert_eq!(keyed[0].items, vec!["orphan item"]);
    }

    #[test]
    fn duplicate_keys_get_position_suffix() {
        let keyed = key_categories(vec![cat("Bug Fixes", &["a"]), cat("Bug Fixes", &["b"])]);
        assert_eq!(keyed[0].key, "bug_fixes");
        assert_eq!(keyed[1].key, "bug_fixes_1");
        assert_eq!(keyed[1].items, vec!["b"]);
    }
}
