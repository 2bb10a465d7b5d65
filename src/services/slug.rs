// Slug generation with collision detection
// SL-38: listing slugs are derived from the address and must be globally
// unique; the unique index on listings.slug is the final arbiter

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;
use tracing::instrument;

use crate::db::DieselPool;

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
    static ref SEPARATOR_RUNS: Regex = Regex::new(r"[\s-]+").unwrap();
}

#[derive(Error, Debug)]
pub enum SlugError {
    #[error("Address does not contain any usable characters for a slug")]
    EmptyBase,

    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(String),
}

/// Normalize free-text into slug form: lowercase, strip everything outside
/// `[a-z0-9\s-]`, collapse whitespace/dash runs to a single dash, trim
/// leading/trailing dashes. Returns `None` when nothing survives.
pub fn generate_slug(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();
    let stripped = DISALLOWED.replace_all(&lowered, "");
    let collapsed = SEPARATOR_RUNS.replace_all(&stripped, "-");
    let trimmed = collapsed.trim_matches('-');

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Resolve `base` against a set of taken slugs: the base itself if free,
/// otherwise the first `base-N` with N >= 2 that is not taken.
pub fn uniquify(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }

    let mut counter: u64 = 2;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Allocates unique listing slugs against the database
pub struct SlugGenerator {
    pool: DieselPool,
}

impl SlugGenerator {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    /// Derive a globally unique slug for an address.
    ///
    /// One query fetches every slug that could collide (the base itself and
    /// any `base-…` suffix form), then the suffix probe runs in memory.
    /// Concurrent creations can still race past this check; the unique index
    /// turns the loser into a `Conflict` rather than silent corruption.
    #[instrument(skip(self))]
    pub async fn unique_slug(&self, address: &str) -> Result<String, SlugError> {
        let base = generate_slug(address).ok_or(SlugError::EmptyBase)?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| SlugError::PoolError(e.to_string()))?;

        let taken = self.colliding_slugs(&mut conn, &base).await?;
        Ok(uniquify(&base, &taken))
    }

    async fn colliding_slugs(
        &self,
        conn: &mut diesel_async::AsyncPgConnection,
        base: &str,
    ) -> Result<HashSet<String>, SlugError> {
        use crate::schema::listings::dsl::*;

        let pattern = format!("{}-%", base);
        let existing: Vec<String> = listings
            .filter(slug.eq(base).or(slug.like(pattern)))
            .select(slug)
            .load(conn)
            .await?;

        Ok(existing.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_basic_address() {
        assert_eq!(
            generate_slug("123 Main Street, Austin TX").as_deref(),
            Some("123-main-street-austin-tx")
        );
    }

    #[test]
    fn test_generate_strips_punctuation() {
        assert_eq!(
            generate_slug("456 Oak Ave. #2B, Dallas TX").as_deref(),
            Some("456-oak-ave-2b-dallas-tx")
        );
    }

    #[test]
    fn test_generate_collapses_separator_runs() {
        assert_eq!(
            generate_slug("  12   Elm -- St  ").as_deref(),
            Some("12-elm-st")
        );
    }

    #[test]
    fn test_generate_output_grammar() {
        let grammar = Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap();
        for input in [
            "123 Main Street, Austin TX",
            "456 Oak Ave. #2B, Dallas TX",
            "---weird---input---",
            "ÜBER Straße 12",
        ] {
            if let Some(slug) = generate_slug(input) {
                assert!(grammar.is_match(&slug), "bad slug {:?} from {:?}", slug, input);
            }
        }
    }

    #[test]
    fn test_generate_empty_base() {
        assert_eq!(generate_slug(""), None);
        assert_eq!(generate_slug("!!! ### $$$"), None);
        assert_eq!(generate_slug("---"), None);
    }

    #[test]
    fn test_uniquify_free_base() {
        let taken = HashSet::new();
        assert_eq!(uniquify("x", &taken), "x");
    }

    #[test]
    fn test_uniquify_first_suffix() {
        let taken: HashSet<String> = ["x".to_string()].into_iter().collect();
        assert_eq!(uniquify("x", &taken), "x-2");
    }

    #[test]
    fn test_uniquify_skips_taken_suffixes() {
        let taken: HashSet<String> = ["x".to_string(), "x-2".to_string()].into_iter().collect();
        assert_eq!(uniquify("x", &taken), "x-3");

        let taken: HashSet<String> = ["x".to_string(), "x-2".to_string(), "x-3".to_string()]
            .into_iter()
            .collect();
        assert_eq!(uniquify("x", &taken), "x-4");
    }

    #[test]
    fn test_uniquify_ignores_unrelated_suffixes() {
        // A taken "x-10" does not block "x-2"
        let taken: HashSet<String> = ["x".to_string(), "x-10".to_string()].into_iter().collect();
        assert_eq!(uniquify("x", &taken), "x-2");
    }
}
