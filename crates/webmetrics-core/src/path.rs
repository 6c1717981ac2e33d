//! Path key derivation.
//!
//! Only the first path segment is kept (`/orders/123` -> `orders`) so metric
//! cardinality stays bounded by the number of top-level routes. Note that
//! keys are never evicted: a server exposing arbitrary first segments
//! (`/{user_id}`) grows the registry with every distinct value it sees.

use std::fmt;

/// Reserved key for the aggregate view across all paths.
pub const TOTAL: &str = "total";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey(String);

impl PathKey {
    /// Derive the key from a request's route path.
    ///
    /// `/` maps to the aggregate key, as does a path with no non-empty
    /// segment at all (`""`, `//`).
    pub fn from_path(path: &str) -> Self {
        if path == "/" {
            return Self::total();
        }
        match path.split('/').find(|seg| !seg.is_empty()) {
            Some(seg) => Self(seg.to_string()),
            None => Self::total(),
        }
    }

    pub fn total() -> Self {
        Self(TOTAL.to_string())
    }

    pub fn is_total(&self) -> bool {
        self.0 == TOTAL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PathKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
