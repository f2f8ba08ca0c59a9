//! Markdown to HTML rendering for article pages.
//!
//! Headings get stable `id` attributes derived with [`slugify`] so readers can
//! link to sections; repeated titles are disambiguated with numeric suffixes
//! the same way article slugs are. Authors may pin an id with
//! `## Title {#custom-id}`; generated ids never reuse a pinned one.

use std::collections::HashSet;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

use super::slug::slugify;

const FALLBACK_ANCHOR: &str = "section";

#[derive(Default)]
struct Anchors {
    used: HashSet<String>,
}

impl Anchors {
    fn claim(&mut self, title: &str) -> String {
        let slug = slugify(title);
        let base = if slug.is_empty() {
            FALLBACK_ANCHOR.to_owned()
        } else {
            slug
        };
        let mut candidate = base.clone();
        let mut suffix = 0_u32;
        while self.used.contains(&candidate) {
            suffix = suffix.saturating_add(1);
            candidate = format!("{base}-{suffix}");
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

fn assign_heading_ids(mut events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut anchors = Anchors {
        used: events
            .iter()
            .filter_map(|event| match event {
                Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
                _ => None,
            })
            .collect(),
    };
    let mut open: Option<(usize, String)> = None;
    let mut assigned = Vec::new();

    for (index, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading { id: None, .. }) => open = Some((index, String::new())),
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, title)) = open.as_mut() {
                    title.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, title)) = open.take() {
                    assigned.push((start, anchors.claim(&title)));
                }
            }
            _ => {}
        }
    }

    for (index, anchor) in assigned {
        if let Some(Event::Start(Tag::Heading { id, .. })) = events.get_mut(index) {
            *id = Some(CowStr::from(anchor));
        }
    }
    events
}

/// Render article markdown to HTML.
///
/// Raw HTML in the source is passed through; only authenticated admins can
/// author content.
///
/// # Examples
/// ```
/// use blog_backend::domain::render_markdown;
///
/// let html = render_markdown("## Getting started\n\nHello *world*.");
/// assert!(html.contains(r#"<h2 id="getting-started">Getting started</h2>"#));
/// assert!(html.contains("<em>world</em>"));
/// ```
pub fn render_markdown(markdown: &str) -> String {
    let events: Vec<Event<'_>> = Parser::new_ext(markdown, parser_options()).collect();
    let mut out = String::with_capacity(markdown.len().saturating_add(markdown.len() / 2));
    html::push_html(&mut out, assign_heading_ids(events).into_iter());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn duplicate_headings_get_suffixed_ids() {
        let html = render_markdown("# Setup\n\n## Setup\n\n### Setup");
        assert!(html.contains(r#"<h1 id="setup">"#), "{html}");
        assert!(html.contains(r#"<h2 id="setup-1">"#), "{html}");
        assert!(html.contains(r#"<h3 id="setup-2">"#), "{html}");
    }

    #[rstest]
    fn inline_code_contributes_to_heading_id() {
        let html = render_markdown("## Using `cargo test`");
        assert!(html.contains(r#"id="using-cargo-test""#), "{html}");
    }

    #[rstest]
    fn symbol_only_heading_uses_fallback_anchor() {
        let html = render_markdown("## ???\n\n## !!!");
        assert!(html.contains(r#"id="section""#), "{html}");
        assert!(html.contains(r#"id="section-1""#), "{html}");
    }

    #[rstest]
    fn generated_ids_avoid_author_supplied_ones() {
        let html = render_markdown("## Setup\n\n## Install {#setup}");
        assert!(html.contains(r#"<h2 id="setup-1">Setup</h2>"#), "{html}");
        assert!(html.contains(r#"<h2 id="setup">Install</h2>"#), "{html}");
    }

    #[rstest]
    fn renders_tables_and_strikethrough() {
        let html = render_markdown("| a | b |\n| - | - |\n| 1 | 2 |\n\n~~old~~");
        assert!(html.contains("<table>"), "{html}");
        assert!(html.contains("<del>old</del>"), "{html}");
    }

    #[rstest]
    fn escapes_code_blocks() {
        let html = render_markdown("```\n<script>alert(1)</script>\n```");
        assert!(html.contains("&lt;script&gt;"), "{html}");
    }
}
