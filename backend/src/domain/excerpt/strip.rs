//! Markdown to plain text.
//!
//! Parsing happens in two passes. [`parse_blocks`] walks lines and groups them
//! into headings, paragraphs, list items, and table rows while dropping fenced
//! code, rules, and reference definitions. [`strip_inline`] then removes span
//! syntax from each block. The result is not a CommonMark renderer; it only
//! needs to be good enough that no markup survives into previews.

use std::sync::OnceLock;

use regex::Regex;

/// Structural role of a parsed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BlockKind {
    Heading,
    Paragraph,
    ListItem,
}

/// One block of text with its structural role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Block {
    pub(super) kind: BlockKind,
    pub(super) text: String,
}

impl Block {
    fn new(kind: BlockKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_owned(),
        }
    }
}

/// Tracks whether the current line sits inside a fenced code block.
#[derive(Debug, Default)]
pub(super) struct Fence {
    open: Option<(char, usize)>,
}

impl Fence {
    /// Feed one line. Returns `true` when the line is a fence delimiter or
    /// part of a fenced block. An unterminated fence runs to the end of input.
    pub(super) fn consume(&mut self, line: &str) -> bool {
        let marker = fence_marker(line);
        match self.open {
            Some((ch, len)) => {
                if let Some((found, found_len, rest)) = marker {
                    if found == ch && found_len >= len && rest.trim().is_empty() {
                        self.open = None;
                    }
                }
                true
            }
            None => match marker {
                Some((found, found_len, _)) => {
                    self.open = Some((found, found_len));
                    true
                }
                None => false,
            },
        }
    }
}

fn fence_marker(line: &str) -> Option<(char, usize, &str)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len().saturating_sub(trimmed.len()) > 3 {
        return None;
    }
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let rest = trimmed.trim_start_matches(first);
    let run = trimmed.len().saturating_sub(rest.len());
    (run >= 3).then_some((first, run, rest))
}

macro_rules! pattern {
    ($name:ident, $source:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| {
                Regex::new($source).unwrap_or_else(|error| {
                    panic!(concat!(stringify!($name), " regex failed to compile: {}"), error)
                })
            })
        }
    };
}

pattern!(quote_marker, r"^\s{0,3}>\s?");
pattern!(atx_heading, r"^\s{0,3}#{1,6}(?:\s+(.*?))?(?:\s+#+)?\s*$");
pattern!(setext_underline, r"^={2,}\s*$");
pattern!(thematic_break, r"^(?:(?:-\s*){3,}|(?:\*\s*){3,}|(?:_\s*){3,})$");
pattern!(reference_definition, r#"^\[[^\]]+\]:\s*\S+(?:\s+(?:"[^"]*"|'[^']*'|\([^)]*\)))?$"#);
pattern!(table_separator, r"^\|?\s*:?-+:?\s*(?:\|\s*:?-+:?\s*)*\|?$");
pattern!(list_item, r"^\s*(?:[-*+•]|\d{1,9}[.)])\s+(?:\[[ xX]\]\s+)?(.*)$");

pattern!(html_comment, r"(?s)<!--.*?-->");
pattern!(inline_image, r"!\[[^\]]*\]\([^)]*\)");
pattern!(reference_image, r"!\[[^\]]*\]\[[^\]]*\]");
pattern!(footnote_reference, r"\[\^[^\]]+\]");
pattern!(empty_link, r"\[\s*\]\([^)]*\)");
pattern!(inline_link, r"\[([^\]]+)\]\([^)]*\)");
pattern!(reference_link, r"\[([^\]]+)\]\[[^\]]*\]");
pattern!(autolink, r"<((?:https?|mailto):[^>\s]+)>");
pattern!(html_tag, r"</?[A-Za-z][A-Za-z0-9-]*(?:\s[^<>]*)?/?>");
pattern!(inline_code, r"`+([^`]*)`+");
pattern!(strong_star, r"\*\*(\S(?:[^*]*\S)?)\*\*");
pattern!(strong_underscore, r"__(\S(?:[^_]*\S)?)__");
pattern!(emphasis_star, r"\*(\S(?:[^*]*\S)?)\*");
pattern!(emphasis_underscore, r"(^|[^\w])_(\S(?:[^_]*\S)?)_($|[^\w])");
pattern!(strikethrough, r"~~([^~]+)~~");
pattern!(escaped_punctuation, r"\\([\\`*_{}\[\]()#+\-.!|~<>])");
pattern!(star_run, r"\*{2,}");
pattern!(image_opener, r"!+\[");

fn strip_quote_markers(line: &str) -> &str {
    let mut rest = line;
    while let Some(found) = quote_marker().find(rest) {
        rest = rest.get(found.end()..).unwrap_or_default();
    }
    rest
}

fn heading_text(line: &str) -> Option<String> {
    atx_heading().captures(line).map(|captures| {
        captures
            .get(1)
            .map(|text| text.as_str().trim().to_owned())
            .unwrap_or_default()
    })
}

fn table_cells(line: &str) -> String {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn flush(current: &mut Option<Block>, blocks: &mut Vec<Block>) {
    if let Some(block) = current.take() {
        blocks.push(block);
    }
}

/// Split markdown into blocks of still-formatted inline text.
pub(super) fn parse_blocks(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;
    let mut fence = Fence::default();

    for raw in markdown.lines() {
        if fence.consume(raw) {
            flush(&mut current, &mut blocks);
            continue;
        }

        let line = strip_quote_markers(raw);
        let trimmed = line.trim();
        if trimmed.is_empty() || thematic_break().is_match(trimmed) {
            flush(&mut current, &mut blocks);
            continue;
        }
        if setext_underline().is_match(trimmed) {
            if let Some(block) = current.as_mut() {
                if block.kind == BlockKind::Paragraph {
                    block.kind = BlockKind::Heading;
                }
            }
            flush(&mut current, &mut blocks);
            continue;
        }
        if let Some(text) = heading_text(line) {
            flush(&mut current, &mut blocks);
            blocks.push(Block {
                kind: BlockKind::Heading,
                text,
            });
            continue;
        }
        if reference_definition().is_match(trimmed) {
            flush(&mut current, &mut blocks);
            continue;
        }
        if trimmed.contains('|') && table_separator().is_match(trimmed) {
            continue;
        }
        if let Some(captures) = list_item().captures(line) {
            flush(&mut current, &mut blocks);
            let item = captures.get(1).map_or("", |text| text.as_str().trim());
            current = Some(Block::new(BlockKind::ListItem, item));
            continue;
        }
        if trimmed.starts_with('|') {
            flush(&mut current, &mut blocks);
            blocks.push(Block {
                kind: BlockKind::Paragraph,
                text: table_cells(trimmed),
            });
            continue;
        }

        match current.as_mut() {
            Some(block) => {
                block.text.push(' ');
                block.text.push_str(trimmed);
            }
            None => current = Some(Block::new(BlockKind::Paragraph, trimmed)),
        }
    }

    flush(&mut current, &mut blocks);
    blocks
}

/// Remove span-level markdown from one block of text.
///
/// Images vanish entirely, links keep their text, code spans keep their
/// content, and emphasis markers are dropped. A final sanitising pass removes
/// any `#`, backtick, `**`, or `![` that slipped through the patterns, then
/// whitespace is collapsed.
pub(super) fn strip_inline(text: &str) -> String {
    let mut out = html_comment().replace_all(text, "").into_owned();
    for (pattern, replacement) in [
        (inline_image(), ""),
        (reference_image(), ""),
        (footnote_reference(), ""),
        (empty_link(), ""),
        (inline_link(), "$1"),
        (reference_link(), "$1"),
        (autolink(), "$1"),
        (html_tag(), ""),
        (inline_code(), "$1"),
        (strong_star(), "$1"),
        (strong_underscore(), "$1"),
        (emphasis_star(), "$1"),
        (emphasis_underscore(), "$1$2$3"),
        // Adjacent matches share a boundary character, so a second pass
        // catches the ones the first skipped.
        (emphasis_underscore(), "$1$2$3"),
        (strikethrough(), "$1"),
        (escaped_punctuation(), "$1"),
    ] {
        out = pattern.replace_all(&out, replacement).into_owned();
    }
    sanitise(&out)
}

fn sanitise(text: &str) -> String {
    let without_markers: String = text.chars().filter(|ch| *ch != '#' && *ch != '`').collect();
    let without_stars = star_run().replace_all(&without_markers, "");
    let without_openers = image_opener().replace_all(&without_stars, "[");
    without_openers.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip all markdown from `markdown`, joining blocks with single spaces.
///
/// # Examples
/// ```
/// use blog_backend::domain::excerpt::strip_markdown;
///
/// let text = strip_markdown("# Title\n\nSome **bold** and [a link](https://example.com).");
/// assert_eq!(text, "Title Some bold and a link.");
/// ```
pub fn strip_markdown(markdown: &str) -> String {
    parse_blocks(markdown)
        .iter()
        .map(|block| strip_inline(&block.text))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
