use crate::changelog::{CategoryEntry, Changelog};

/// Render the changelog as Markdown: a metadata header followed by one
/// section per release, newest first.
pub fn render_markdown(changelog: &Changelog) -> String {
    let mut out = String::new();
    out.push_str("# Changelog\n\n");

    out.push_str(&format!(
        "**현재 버전:** {}  \n",
        changelog.metadata.current_version
    ));
    out.push_str(&format!(
        "**마지막 업데이트:** {}  \n\n",
        changelog.metadata.last_updated
    ));
    out.push_str("---\n\n");

    for release in &changelog.releases {
        out.push_str(&format!("## [{}] - {}\n\n", release.version, release.date));
        out.push_str(&format!("**PR:** #{}  \n\n", release.pr_number));

        for (key, entry) in &release.parsed_changes {
            let (title, items) = match entry {
                CategoryEntry::Detailed { title, items } => (title.clone(), items),
                // Bare legacy entries carry no title; derive one from the key.
                CategoryEntry::Bare(items) if !items.is_empty() => (title_case_key(key), items),
                CategoryEntry::Bare(_) => continue,
            };

            out.push_str(&format!("**{}**\n", title));
            for item in items {
                out.push_str(&format!("- {}\n", item));
            }
            out.push('\n');
        }

        out.push_str("---\n\n");
    }

    out
}

/// `bug_fixes` → `Bug Fixes`.
fn title_case_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

// ── Tests ──
