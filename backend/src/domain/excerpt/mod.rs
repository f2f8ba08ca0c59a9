//! Plain-text previews of markdown articles.
//!
//! The pipeline runs in five stages: table-of-contents removal, markdown
//! stripping, a residual TOC sweep over the stripped blocks, selection of the
//! first block that reads like prose, and truncation at a word boundary.
//! Every stage is total; malformed markdown degrades to a shorter preview,
//! never to an error.

mod classifier;
mod strip;
mod toc;

use std::sync::OnceLock;

use regex::Regex;

pub use classifier::{ClassifierRules, HeadingClassifier, RuleBasedClassifier};
pub use strip::strip_markdown;
pub use toc::remove_toc;

use strip::{Block, BlockKind};

/// Preview length used by list views.
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;

/// Suffix appended to truncated previews.
pub const ELLIPSIS: &str = "...";

/// Generate a plain-text preview of at most `max_length` characters plus
/// [`ELLIPSIS`] using the default classifier.
///
/// # Examples
/// ```
/// use blog_backend::domain::excerpt::generate_excerpt;
///
/// let markdown = "## Table of Contents\n1. [Intro](#intro)\n---\n## Understanding X\nReal prose here...";
/// assert_eq!(generate_excerpt(markdown, 150), "Real prose here...");
/// ```
pub fn generate_excerpt(markdown: &str, max_length: usize) -> String {
    ExcerptGenerator::new(max_length).generate(markdown)
}

/// Configurable excerpt pipeline.
#[derive(Debug, Clone)]
pub struct ExcerptGenerator<C = RuleBasedClassifier> {
    classifier: C,
    max_length: usize,
}

impl ExcerptGenerator {
    /// Generator with the default classifier.
    pub fn new(max_length: usize) -> Self {
        Self::with_classifier(RuleBasedClassifier::default(), max_length)
    }
}

impl Default for ExcerptGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_EXCERPT_LENGTH)
    }
}

impl<C> ExcerptGenerator<C>
where
    C: HeadingClassifier,
{
    /// Generator with a custom classifier.
    pub fn with_classifier(classifier: C, max_length: usize) -> Self {
        Self {
            classifier,
            max_length,
        }
    }

    /// Maximum excerpt length in characters, excluding the ellipsis.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Produce the preview for `markdown`.
    pub fn generate(&self, markdown: &str) -> String {
        let without_toc = remove_toc(markdown, &self.classifier);
        let blocks: Vec<Block> = strip::parse_blocks(&without_toc)
            .into_iter()
            .map(|block| Block {
                kind: block.kind,
                text: strip::strip_inline(&block.text),
            })
            .filter(|block| !block.text.is_empty() && !is_residual_toc(&block.text))
            .collect();
        let body = select_body(&blocks, &self.classifier);
        truncate(&body, self.max_length)
    }
}

fn section_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\d+\.\d+\.")
            .unwrap_or_else(|error| panic!("section number regex failed to compile: {error}"))
    })
}

/// Longest run of words allowed between two section numbers.
const MAX_SECTION_LABEL_WORDS: usize = 5;

/// Stripped text that still carries a TOC signature.
///
/// A block qualifies when it opens with the TOC title, or when it holds at
/// least two section numbers such as `1.2.` and nothing between them but
/// short unpunctuated labels. Prose mentioning version numbers survives.
fn is_residual_toc(text: &str) -> bool {
    if text.to_lowercase().starts_with("table of contents") {
        return true;
    }
    section_number().find_iter(text).nth(1).is_some()
        && section_number().split(text).all(is_section_label)
}

fn is_section_label(segment: &str) -> bool {
    let label = segment.trim();
    label.split_whitespace().count() <= MAX_SECTION_LABEL_WORDS
        && !label.contains(['.', '!', '?', ';'])
}

/// Join blocks from the first prose block onwards, skipping headings.
///
/// When no block reads as prose, fall back to every non-heading block, and
/// to the headings themselves when nothing else exists.
fn select_body<C>(blocks: &[Block], classifier: &C) -> String
where
    C: HeadingClassifier + ?Sized,
{
    let is_body = |block: &&Block| block.kind != BlockKind::Heading;
    let start = blocks
        .iter()
        .position(|block| is_body(&block) && !classifier.is_navigation_text(&block.text));

    let texts: Vec<&str> = match start {
        Some(index) => blocks
            .iter()
            .skip(index)
            .filter(is_body)
            .map(|block| block.text.as_str())
            .collect(),
        None if blocks.iter().any(|block| is_body(&block)) => blocks
            .iter()
            .filter(is_body)
            .map(|block| block.text.as_str())
            .collect(),
        None => blocks.iter().map(|block| block.text.as_str()).collect(),
    };
    texts.join(" ")
}

/// Cut `text` to `max_length` characters, preferring a word boundary in the
/// final fifth of the budget, and append [`ELLIPSIS`].
pub fn truncate(text: &str, max_length: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_length) else {
        return text.to_owned();
    };
    let head = text.get(..cut).unwrap_or(text);

    let boundary = head
        .char_indices()
        .enumerate()
        .filter(|(_, (_, ch))| ch.is_whitespace())
        .last()
        .filter(|(position, _)| position.saturating_mul(5) > max_length.saturating_mul(4))
        .map(|(_, (byte, _))| byte);

    let kept = boundary
        .and_then(|byte| head.get(..byte))
        .unwrap_or(head)
        .trim_end();
    format!("{kept}{ELLIPSIS}")
}
