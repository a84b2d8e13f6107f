//! Search predicate and view shaping options

use crate::core::entity::Listing;
use serde::{Deserialize, Serialize};

/// Upper bound on the stored query length, in characters
pub const DEFAULT_MAX_QUERY_CHARS: usize = 256;

/// Normalize a raw query: trim surrounding whitespace, lowercase, and cap the
/// result at `max_chars` characters.
///
/// Total: every input maps to some normalized string.
pub fn normalize(raw: &str, max_chars: usize) -> String {
    let lowered = raw.trim().to_lowercase();

    match lowered.char_indices().nth(max_chars) {
        Some((cut, _)) => lowered[..cut].trim_end().to_string(),
        None => lowered,
    }
}

/// The current search query and its matching rule.
///
/// The predicate keeps a revision counter that moves only when the
/// normalized query actually changes, so downstream caches can tell a
/// repeated keystroke apart from a real edit.
///
/// # Example
/// ```rust,ignore
/// let mut predicate = FilterPredicate::new();
/// predicate.set_query("  BOX ");
/// assert_eq!(predicate.query(), "box");
/// ```
#[derive(Debug, Clone)]
pub struct FilterPredicate {
    query: String,
    max_chars: usize,
    revision: u64,
}

impl FilterPredicate {
    pub fn new() -> Self {
        Self::with_max_chars(DEFAULT_MAX_QUERY_CHARS)
    }

    /// Create a predicate with a custom query length cap (minimum 1)
    pub fn with_max_chars(max_chars: usize) -> Self {
        Self {
            query: String::new(),
            max_chars: max_chars.max(1),
            revision: 0,
        }
    }

    /// Store the normalized form of `raw`.
    ///
    /// Returns `true` if the stored query changed.
    pub fn set_query(&mut self, raw: &str) -> bool {
        let normalized = normalize(raw, self.max_chars);
        if normalized == self.query {
            return false;
        }

        self.query = normalized;
        self.revision += 1;
        true
    }

    /// Whether `entity` passes the filter.
    ///
    /// An empty query matches everything; otherwise the query must be a
    /// substring of the lowercased display field.
    pub fn matches<L: Listing + ?Sized>(&self, entity: &L) -> bool {
        self.query.is_empty() || entity.display_field().to_lowercase().contains(&self.query)
    }

    /// The normalized query
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for FilterPredicate {
    fn default() -> Self {
        Self::new()
    }
}

/// How a derived view is shaped after filtering
///
/// # Format
/// ```yaml
/// sort_by_recency_desc: true
/// limit: 6
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Order by `created_at` descending, ties by id ascending
    pub sort_by_recency_desc: bool,

    /// Keep at most this many entries
    pub limit: Option<usize>,
}

impl ViewOptions {
    /// Every matching entity in collection order
    pub fn all() -> Self {
        Self::default()
    }

    /// The `n` most recent matching entities
    pub fn latest(n: usize) -> Self {
        Self {
            sort_by_recency_desc: true,
            limit: Some(n),
        }
    }
}
