//! URL slugs for articles and heading anchors.
//!
//! A slug is one or more runs of lowercase ASCII letters and digits joined by
//! single hyphens, e.g. `hello-world-2`. [`slugify`] derives the raw form from
//! arbitrary text; [`Slug`] is the validated newtype stored on articles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`Slug::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugValidationError {
    /// The slug was empty.
    Empty,
    /// The slug contained characters outside `[a-z0-9-]`.
    InvalidCharacters,
    /// The slug started or ended with a hyphen, or repeated one.
    MisplacedHyphen,
}

impl fmt::Display for SlugValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "slug must not be empty"),
            Self::InvalidCharacters => write!(
                f,
                "slug may only contain lowercase letters, digits, and hyphens"
            ),
            Self::MisplacedHyphen => write!(
                f,
                "slug must not start or end with a hyphen or contain consecutive hyphens"
            ),
        }
    }
}

impl std::error::Error for SlugValidationError {}

/// Base used when a title contains no ASCII letters or digits.
pub const UNTITLED_SLUG: &str = "untitled";

/// Validated article slug.
///
/// # Examples
/// ```
/// use blog_backend::domain::Slug;
///
/// let slug = Slug::new("hello-world").unwrap();
/// assert_eq!(slug.as_ref(), "hello-world");
/// assert!(Slug::new("Hello World").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate and construct a slug from borrowed input.
    pub fn new(value: impl AsRef<str>) -> Result<Self, SlugValidationError> {
        Self::from_owned(value.as_ref().to_owned())
    }

    fn from_owned(value: String) -> Result<Self, SlugValidationError> {
        validate(&value)?;
        Ok(Self(value))
    }

    /// Slug derived from a title, falling back to [`UNTITLED_SLUG`].
    ///
    /// ```
    /// use blog_backend::domain::Slug;
    ///
    /// assert_eq!(Slug::from_title("Hello World!").as_str(), "hello-world");
    /// assert_eq!(Slug::from_title("???").as_str(), "untitled");
    /// ```
    pub fn from_title(title: &str) -> Self {
        let base = slugify(title);
        if base.is_empty() {
            Self(UNTITLED_SLUG.to_owned())
        } else {
            Self(base)
        }
    }

    /// Append a numeric collision suffix, e.g. `hello-world` → `hello-world-3`.
    #[must_use]
    pub fn with_suffix(&self, suffix: u32) -> Self {
        Self(format!("{}-{suffix}", self.0))
    }

    /// Borrow the slug text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

fn validate(value: &str) -> Result<(), SlugValidationError> {
    if value.is_empty() {
        return Err(SlugValidationError::Empty);
    }
    if !value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
    {
        return Err(SlugValidationError::InvalidCharacters);
    }
    if value.starts_with('-') || value.ends_with('-') || value.contains("--") {
        return Err(SlugValidationError::MisplacedHyphen);
    }
    Ok(())
}

/// Return `true` when `value` matches `^[a-z0-9]+(-[a-z0-9]+)*$`.
pub fn is_valid_slug(value: &str) -> bool {
    validate(value).is_ok()
}

/// Derive the raw slug form of `text`.
///
/// Lowercases the input, collapses every run of characters outside
/// `[a-z0-9]` into one hyphen, and trims hyphens from both ends. The result
/// is empty when `text` has no ASCII letters or digits.
///
/// # Examples
/// ```
/// use blog_backend::domain::slugify;
///
/// assert_eq!(slugify("Hello World!"), "hello-world");
/// assert_eq!(slugify("  Rust -- 2024 edition  "), "rust-2024-edition");
/// assert_eq!(slugify("!!!"), "");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    //! Regression coverage for slug derivation and validation.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello World!", "hello-world")]
    #[case("hello-world", "hello-world")]
    #[case("  Leading and trailing  ", "leading-and-trailing")]
    #[case("C++ & Rust: a comparison", "c-rust-a-comparison")]
    #[case("Version 2.0 released", "version-2-0-released")]
    #[case("Crème brûlée", "cr-me-br-l-e")]
    #[case("___", "")]
    #[case("", "")]
    #[case("日本語", "")]
    fn slugify_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[rstest]
    #[case("Hello World!")]
    #[case("--Mixed__CASE--and   spaces--")]
    #[case("a")]
    #[case("2024: year in review")]
    fn slugify_output_is_valid_when_non_empty(#[case] input: &str) {
        let slug = slugify(input);
        assert!(is_valid_slug(&slug), "{slug:?} should be a valid slug");
    }

    #[rstest]
    #[case("", SlugValidationError::Empty)]
    #[case("Hello", SlugValidationError::InvalidCharacters)]
    #[case("hello world", SlugValidationError::InvalidCharacters)]
    #[case("-hello", SlugValidationError::MisplacedHyphen)]
    #[case("hello-", SlugValidationError::MisplacedHyphen)]
    #[case("hello--world", SlugValidationError::MisplacedHyphen)]
    fn rejects_malformed_slugs(#[case] input: &str, #[case] expected: SlugValidationError) {
        assert_eq!(Slug::new(input), Err(expected));
    }

    #[rstest]
    #[case("Hello World!", "hello-world")]
    #[case("", "untitled")]
    #[case("日本語", "untitled")]
    fn from_title_always_yields_valid_slug(#[case] title: &str, #[case] expected: &str) {
        let slug = Slug::from_title(title);
        assert_eq!(slug.as_str(), expected);
        assert!(is_valid_slug(slug.as_str()));
    }

    #[rstest]
    fn appends_numeric_suffix() {
        let slug = Slug::new("hello-world").expect("valid slug");
        assert_eq!(slug.with_suffix(12).as_str(), "hello-world-12");
    }

    #[rstest]
    fn deserialisation_validates() {
        let ok: Slug = serde_json::from_str("\"my-post\"").expect("valid slug");
        assert_eq!(ok.as_str(), "my-post");
        assert!(serde_json::from_str::<Slug>("\"My Post\"").is_err());
    }
}
