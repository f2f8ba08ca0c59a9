//! Unique slug generation for article titles.
//!
//! The base slug comes from [`Slug::from_title`]; collisions are resolved by
//! probing `base`, `base-1`, `base-2`, … against a [`SlugLookup`] until a
//! free candidate turns up or the policy's attempt limit is reached.
//!
//! Probing is advisory. Two writers can both see a candidate as free, so the
//! storage layer's unique constraint remains the final arbiter.

use tracing::debug;

use super::ports::SlugLookup;
use super::{ArticleId, Slug};

/// Default number of numeric suffixes tried before giving up.
pub const DEFAULT_SLUG_MAX_ATTEMPTS: u32 = 100;

/// Bounds for collision probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlugPolicy {
    max_attempts: u32,
}

impl SlugPolicy {
    /// Policy allowing `max_attempts` candidate slugs.
    #[must_use]
    pub const fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Highest numeric suffix that will be tried.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for SlugPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SLUG_MAX_ATTEMPTS)
    }
}

/// Failure modes of [`generate_unique_slug`].
#[derive(Debug, thiserror::Error)]
pub enum SlugGenerationError<E>
where
    E: std::error::Error + 'static,
{
    /// Every candidate up to the attempt limit was taken.
    #[error("slug space exhausted for {base} after {attempts} attempts")]
    Exhausted { base: Slug, attempts: u32 },
    /// The lookup itself failed.
    #[error("slug lookup failed: {0}")]
    Lookup(#[source] E),
}

/// Find the first free slug for `title`.
///
/// `exclude` names an article whose own slug should not count as taken,
/// which lets an update keep or regenerate its slug without colliding with
/// itself.
///
/// # Examples
/// ```
/// use std::collections::HashSet;
/// use std::convert::Infallible;
///
/// use async_trait::async_trait;
/// use blog_backend::domain::ports::SlugLookup;
/// use blog_backend::domain::{generate_unique_slug, ArticleId, Slug, SlugPolicy};
///
/// struct Taken(HashSet<&'static str>);
///
/// #[async_trait]
/// impl SlugLookup for Taken {
///     type Error = Infallible;
///
///     async fn slug_taken(&self, slug: &Slug, _: Option<ArticleId>) -> Result<bool, Infallible> {
///         Ok(self.0.contains(slug.as_str()))
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let lookup = Taken(HashSet::from(["hello-world"]));
/// let slug = generate_unique_slug("Hello World", &lookup, None, &SlugPolicy::default())
///     .await
///     .unwrap();
/// assert_eq!(slug.as_str(), "hello-world-1");
/// # });
/// ```
pub async fn generate_unique_slug<L>(
    title: &str,
    lookup: &L,
    exclude: Option<ArticleId>,
    policy: &SlugPolicy,
) -> Result<Slug, SlugGenerationError<L::Error>>
where
    L: SlugLookup + ?Sized,
{
    let base = Slug::from_title(title);
    if !lookup
        .slug_taken(&base, exclude)
        .await
        .map_err(SlugGenerationError::Lookup)?
    {
        return Ok(base);
    }

    for suffix in 1..=policy.max_attempts() {
        let candidate = base.with_suffix(suffix);
        if !lookup
            .slug_taken(&candidate, exclude)
            .await
            .map_err(SlugGenerationError::Lookup)?
        {
            debug!(%base, %candidate, "resolved slug collision");
            return Ok(candidate);
        }
    }

    Err(SlugGenerationError::Exhausted {
        base,
        attempts: policy.max_attempts(),
    })
}
