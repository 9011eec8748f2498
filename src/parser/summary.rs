use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use super::text;
use super::Category;

const TRIGGER_PHRASE: &str = "summary by coderabbit";

/// Parse the two-level list that follows a "Summary by CodeRabbit" heading.
///
/// Expected shape:
///
/// ```html
/// <h2>Summary by CodeRabbit</h2>
/// <ul>
///   <li>Category title
///     <ul>
///       <li>item</li>
///       <li>item</li>
///     </ul>
///   </li>
/// </ul>
/// ```
///
/// Only the first `<ul>` after the trigger heading is treated as the summary
/// container. Categories may come back empty; the keying step skips those.
pub fn parse(html: &str) -> Vec<Category> {
    let mut reader = Reader::from_str(html);
    reader.config_mut().check_end_names = false;
    reader.config_mut().allow_unmatched_ends = true;

    let mut parser = SummaryParser::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.handle_start(&tag_name(e.name().as_ref())),
            Ok(Event::End(e)) => parser.handle_end(&tag_name(e.name().as_ref())),
            Ok(Event::Text(e)) => parser.handle_text(&String::from_utf8_lossy(e.as_ref())),
            Ok(Event::Eof) => break,
            Err(e) => {
                // Malformed markup is never fatal; keep what was parsed.
                debug!("stopping at markup error: {}", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }
    parser.categories
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

#[derive(Default)]
struct SummaryParser {
    tag_stack: Vec<String>,
    heading_parts: Vec<String>,
    /// Trigger heading has closed; the next `<ul>` is the summary container.
    heading_matched: bool,
    in_summary_list: bool,
    /// Nesting depth relative to the summary container (container itself = 1).
    depth: usize,
    collecting_title: bool,
    /// A nested list opened inside the current first-level item; from here on
    /// text belongs to items, never the title.
    seen_nested_list: bool,
    collecting_item: bool,
    title_parts: Vec<String>,
    item_parts: Vec<String>,
    categories: Vec<Category>,
}

impl SummaryParser {
    fn handle_start(&mut self, tag: &str) {
        self.tag_stack.push(tag.to_string());

        if is_heading(tag) {
            self.heading_parts.clear();
        }

        if tag == "ul" {
            if self.heading_matched && !self.in_summary_list {
                self.in_summary_list = true;
                self.depth = 1;
            } else if self.in_summary_list {
                self.depth += 1;
            }
            if self.in_summary_list && self.collecting_title && !self.seen_nested_list {
                self.seen_nested_list = true;
            }
        }

        if tag == "li" && self.in_summary_list {
            if self.depth == 1 {
                // First-level item: a new category starts here.
                self.title_parts.clear();
                self.collecting_title = true;
                self.seen_nested_list = false;
                self.categories.push(Category::default());
            } else if self.depth >= 2 && self.seen_nested_list {
                self.collecting_item = true;
                self.item_parts.clear();
            }
        }
    }

    fn handle_end(&mut self, tag: &str) {
        if tag == "li" && self.in_summary_list {
            if self.collecting_item {
                let item = text::normalize(&self.item_parts.concat());
                if !item.is_empty() {
                    if let Some(cat) = self.categories.last_mut() {
                        cat.items.push(item);
                    }
                }
                self.collecting_item = false;
                self.item_parts.clear();
            } else if self.collecting_title {
                let title = text::normalize(&self.title_parts.concat());
                if !title.is_empty() {
                    if let Some(cat) = self.categories.last_mut() {
                        cat.title = title;
                    }
                }
                self.collecting_title = false;
                self.title_parts.clear();
            }
        }

        if tag == "ul" && self.in_summary_list {
            self.depth = self.depth.saturating_sub(1);
            if self.depth == 0 {
                // Summary container closed; later lists are ignored.
                self.in_summary_list = false;
                self.heading_matched = false;
            }
        }

        if is_heading(tag) {
            let heading = text::normalize(&self.heading_parts.concat());
            if heading.to_lowercase().contains(TRIGGER_PHRASE) {
                self.heading_matched = true;
            }
            self.heading_parts.clear();
        }

        // Unmatched closes pop best-effort instead of raising.
        self.tag_stack.pop();
    }

    fn handle_text(&mut self, raw: &str) {
        if self.tag_stack.last().is_some_and(|t| is_heading(t)) {
            self.heading_parts.push(raw.to_string());
            return;
        }
        if !self.in_summary_list {
            return;
        }
        // Fragments stay raw here; they are joined and normalized when the
        // enclosing list item closes.
        if self.collecting_item {
            self.item_parts.push(raw.to_string());
        } else if self.collecting_title && !self.seen_nested_list {
            self.title_parts.push(raw.to_string());
        }
    }
}

// ── Tests ──
