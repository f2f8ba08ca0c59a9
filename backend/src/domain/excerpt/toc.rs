//! Table-of-contents removal.
//!
//! Generated posts often open with a linked outline. A TOC block starts at a
//! title line the classifier recognises (`## Table of Contents`) or at two
//! consecutive anchor-link list items, and swallows the list lines, blank
//! lines, and numbered section labels that follow. It ends at a horizontal
//! rule (which is removed too), at a heading, or at the first line of prose.
//! Only the head of a document is searched: once prose or code has been
//! kept, later lists stay put even under a `## Contents` heading. Fenced code
//! is never inspected.

use std::sync::OnceLock;

use regex::Regex;

use super::classifier::HeadingClassifier;
use super::strip::Fence;

fn list_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:[-*+•]|\d{1,9}[.)])\s+\S")
            .unwrap_or_else(|error| panic!("toc list regex failed to compile: {error}"))
    })
}

fn anchor_entry() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:(?:[-*+•]|\d{1,9}[.)])\s+)?\[[^\]]+\]\(#[^)]*\)\s*$")
            .unwrap_or_else(|error| panic!("toc anchor regex failed to compile: {error}"))
    })
}

fn section_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*\d+(?:\.\d+)+\.?\s+\S")
            .unwrap_or_else(|error| panic!("toc section regex failed to compile: {error}"))
    })
}

fn rule_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s{0,3}(?:(?:-\s*){3,}|(?:\*\s*){3,}|(?:_\s*){3,})$")
            .unwrap_or_else(|error| panic!("toc rule regex failed to compile: {error}"))
    })
}

fn heading_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s{0,3}#{1,6}(?:\s|$)")
            .unwrap_or_else(|error| panic!("toc heading regex failed to compile: {error}"))
    })
}

/// What to do with a line while inside a TOC block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Swallow,
    SwallowAndClose,
    Close,
}

fn step_inside_toc<C>(line: &str, classifier: &C) -> Step
where
    C: HeadingClassifier + ?Sized,
{
    if line.trim().is_empty() {
        return Step::Swallow;
    }
    if rule_line().is_match(line) {
        return Step::SwallowAndClose;
    }
    if heading_line().is_match(line) {
        if classifier.is_prose_heading(line) {
            return Step::Close;
        }
        let body = line.trim_start().trim_start_matches('#');
        return if anchor_entry().is_match(body) || section_label().is_match(body) {
            Step::Swallow
        } else {
            Step::Close
        };
    }
    if list_line().is_match(line) || anchor_entry().is_match(line) || section_label().is_match(line)
    {
        return Step::Swallow;
    }
    Step::Close
}

fn opens_headerless_toc(lines: &[&str], index: usize) -> bool {
    let is_entry = |at: usize| lines.get(at).is_some_and(|line| anchor_entry().is_match(line));
    is_entry(index) && is_entry(index.saturating_add(1))
}

/// Remove table-of-contents blocks that precede the first prose in `markdown`.
///
/// # Examples
/// ```
/// use blog_backend::domain::excerpt::{RuleBasedClassifier, remove_toc};
///
/// let markdown = "## Table of Contents\n1. [Intro](#intro)\n---\n## Understanding X\nBody";
/// let cleaned = remove_toc(markdown, &RuleBasedClassifier::default());
/// assert_eq!(cleaned, "## Understanding X\nBody");
/// ```
pub fn remove_toc<C>(markdown: &str, classifier: &C) -> String
where
    C: HeadingClassifier + ?Sized,
{
    let lines: Vec<&str> = markdown.lines().collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut fence = Fence::default();
    let mut in_toc = false;
    let mut body_started = false;

    for (index, line) in lines.iter().copied().enumerate() {
        if fence.consume(line) {
            in_toc = false;
            body_started = true;
            kept.push(line);
            continue;
        }

        if in_toc {
            match step_inside_toc(line, classifier) {
                Step::Swallow => continue,
                Step::SwallowAndClose => {
                    in_toc = false;
                    continue;
                }
                Step::Close => in_toc = false,
            }
        }

        if !body_started && (classifier.is_toc_title(line) || opens_headerless_toc(&lines, index)) {
            in_toc = true;
            continue;
        }
        if !line.trim().is_empty() && !heading_line().is_match(line) {
            body_started = true;
        }
        kept.push(line);
    }

    kept.join("\n")
}
