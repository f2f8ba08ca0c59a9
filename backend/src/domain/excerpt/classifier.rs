//! Heuristics deciding what reads as navigation and what reads as prose.
//!
//! The excerpt pipeline never hard-codes these rules; it asks a
//! [`HeadingClassifier`]. [`RuleBasedClassifier`] is the default and is driven
//! by plain data in [`ClassifierRules`], so a deployment can extend the word
//! lists without touching the pipeline.

use std::sync::OnceLock;

use regex::Regex;

/// Classifies heading and block text for the excerpt pipeline.
///
/// Inputs are raw line text: heading markers, emphasis, and list numbering
/// may still be present, so implementations normalise before matching.
pub trait HeadingClassifier: Send + Sync {
    /// `true` when `text` announces a table of contents, e.g.
    /// `## Table of Contents` or a bare `Contents:` line.
    fn is_toc_title(&self, text: &str) -> bool;

    /// `true` when a heading opens real content and therefore ends a table
    /// of contents block, e.g. `## Understanding Lifetimes`.
    fn is_prose_heading(&self, text: &str) -> bool;

    /// `true` when stripped block text looks like a TOC entry or a short
    /// section label rather than a sentence worth previewing.
    fn is_navigation_text(&self, text: &str) -> bool;
}

/// Word lists and thresholds for [`RuleBasedClassifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierRules {
    /// Lower-case titles that introduce a table of contents.
    pub toc_titles: Vec<String>,
    /// Lower-case leading words of headings that start real content.
    pub prose_prefixes: Vec<String>,
    /// Lower-case keywords of short introductory section labels.
    pub intro_keywords: Vec<String>,
    /// Blocks shorter than this that carry list numbering are TOC entries.
    pub toc_entry_max_chars: usize,
    /// Blocks shorter than this that carry an intro keyword are labels.
    pub intro_max_chars: usize,
    /// Upper bound in characters for unpunctuated title-like blocks.
    pub title_max_chars: usize,
    /// Upper bound in words for unpunctuated title-like blocks.
    pub title_max_words: usize,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|word| (*word).to_owned()).collect()
        }

        Self {
            toc_titles: owned(&["table of contents", "contents"]),
            prose_prefixes: owned(&[
                "understanding",
                "introduction",
                "getting started",
                "prerequisites",
                "step",
                "let",
                "we",
                "this",
                "before",
                "the first",
            ]),
            intro_keywords: owned(&[
                "introduction",
                "getting started",
                "prerequisites",
                "requirements",
            ]),
            toc_entry_max_chars: 50,
            intro_max_chars: 100,
            title_max_chars: 60,
            title_max_words: 8,
        }
    }
}

/// Default classifier backed by [`ClassifierRules`].
///
/// # Examples
/// ```
/// use blog_backend::domain::excerpt::{HeadingClassifier, RuleBasedClassifier};
///
/// let classifier = RuleBasedClassifier::default();
/// assert!(classifier.is_toc_title("## Table of Contents"));
/// assert!(classifier.is_prose_heading("## Understanding borrowing"));
/// assert!(!classifier.is_prose_heading("## Appendix"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleBasedClassifier {
    rules: ClassifierRules,
}

impl RuleBasedClassifier {
    /// Build a classifier from custom rules.
    pub fn new(rules: ClassifierRules) -> Self {
        Self { rules }
    }

    /// Rules in effect.
    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }
}

fn heading_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:#{1,6}\s*)?(?:[*_]{1,3})?\s*(?:\d+(?:\.\d+)*\.?\s+)?")
            .unwrap_or_else(|error| panic!("heading prefix regex failed to compile: {error}"))
    })
}

fn numbered_title() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d+\.\d*\.?\s+[A-Z]")
            .unwrap_or_else(|error| panic!("numbered title regex failed to compile: {error}"))
    })
}

fn numbered_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|\s)\d+\.\s+\S")
            .unwrap_or_else(|error| panic!("numbered marker regex failed to compile: {error}"))
    })
}

/// Lower-case `text` with heading markers, emphasis, numbering, and
/// trailing punctuation removed.
fn normalise(text: &str) -> String {
    let body = heading_prefix().replace(text, "");
    body.trim_end_matches(|ch: char| {
        ch == '#' || ch == '*' || ch == '_' || ch == ':' || ch.is_whitespace()
    })
    .to_lowercase()
}

fn starts_with_word(text: &str, prefix: &str) -> bool {
    text.strip_prefix(prefix).is_some_and(|rest| {
        rest.chars()
            .next()
            .is_none_or(|next| !next.is_alphanumeric())
    })
}

fn ends_sentence(text: &str) -> bool {
    text.trim_end()
        .ends_with(['.', '!', '?', ':', ';', '…', '"', '\''])
}

impl RuleBasedClassifier {
    fn looks_like_toc_entry(&self, text: &str, length: usize) -> bool {
        numbered_title().is_match(text)
            || (length < self.rules.toc_entry_max_chars
                && (numbered_marker().is_match(text) || text.contains('•')))
    }

    fn looks_like_intro_label(&self, lower: &str, length: usize, text: &str) -> bool {
        length < self.rules.intro_max_chars
            && !ends_sentence(text)
            && self
                .rules
                .intro_keywords
                .iter()
                .any(|keyword| lower.contains(keyword.as_str()))
    }

    fn looks_like_title(&self, text: &str, length: usize) -> bool {
        length <= self.rules.title_max_chars
            && text.split_whitespace().count() <= self.rules.title_max_words
            && !ends_sentence(text)
    }
}

impl HeadingClassifier for RuleBasedClassifier {
    fn is_toc_title(&self, text: &str) -> bool {
        let normalised = normalise(text);
        self.rules
            .toc_titles
            .iter()
            .any(|title| normalised == title.as_str())
    }

    fn is_prose_heading(&self, text: &str) -> bool {
        let normalised = normalise(text);
        self.rules
            .prose_prefixes
            .iter()
            .any(|prefix| starts_with_word(&normalised, prefix))
    }

    fn is_navigation_text(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return true;
        }
        let lower = trimmed.to_lowercase();
        if lower.starts_with("table of contents") {
            return true;
        }
        let length = trimmed.chars().count();
        self.looks_like_toc_entry(trimmed, length)
            || self.looks_like_intro_label(&lower, length, trimmed)
            || self.looks_like_title(trimmed, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn classifier() -> RuleBasedClassifier {
        RuleBasedClassifier::default()
    }

    #[rstest]
    #[case("## Table of Contents", true)]
    #[case("# table of contents", true)]
    #[case("**Table of Contents**", true)]
    #[case("Table of Contents:", true)]
    #[case("### Contents", true)]
    #[case("## Table of Contents for the impatient", false)]
    #[case("## Introduction", false)]
    fn recognises_toc_titles(
        classifier: RuleBasedClassifier,
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(classifier.is_toc_title(text), expected);
    }

    #[rstest]
    #[case("## Understanding Ownership", true)]
    #[case("## 1. Introduction", true)]
    #[case("### Getting Started with Diesel", true)]
    #[case("## Step 3: Deploy", true)]
    #[case("## The first thing to know", true)]
    #[case("## Letters from readers", false)]
    #[case("## Weekly notes", false)]
    #[case("## Appendix", false)]
    fn recognises_prose_headings(
        classifier: RuleBasedClassifier,
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(classifier.is_prose_heading(text), expected);
    }

    #[rstest]
    #[case("Table of Contents Introduction Setup", true)]
    #[case("1.2 Installing the toolchain", true)]
    #[case("1. Intro 2. Setup", true)]
    #[case("• Setup", true)]
    #[case("Rust 1.0 shipped in 2015.", false)]
    #[case("Version 2.0. followed in 2019.", false)]
    #[case("Getting started with the CLI", true)]
    #[case("My Rust Journey", true)]
    #[case("", true)]
    #[case("Real prose here...", false)]
    #[case(
        "Lifetimes describe how long references stay valid, and the borrow checker enforces them.",
        false
    )]
    #[case(
        "Before getting started you should install the toolchain and read the contributing guide.",
        false
    )]
    fn classifies_navigation_text(
        classifier: RuleBasedClassifier,
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(classifier.is_navigation_text(text), expected);
    }

    #[rstest]
    fn custom_rules_extend_prose_prefixes() {
        let mut rules = ClassifierRules::default();
        rules.prose_prefixes.push("overview".to_owned());
        let classifier = RuleBasedClassifier::new(rules);

        assert!(classifier.is_prose_heading("## Overview"));
        assert_eq!(classifier.rules().prose_prefixes.last().map(String::as_str), Some("overview"));
    }
}
