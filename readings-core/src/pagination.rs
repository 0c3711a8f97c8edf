//! Skip/limit pagination over newest-first result sets.
//!
//! A [`Paginator`] is an immutable cursor: advancing it yields a new value. A [`Page`]
//! pairs a window of results with the paginator that produced it; it carries no total
//! count, so callers request the next page speculatively until one comes back short.

use serde::Serialize;

pub const DEFAULT_LIMIT: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paginator {
    skip: i64,
    limit: i64,
}

impl Paginator {
    /// Non-positive or absent limits fall back to [`DEFAULT_LIMIT`]; negative or absent
    /// skips fall back to zero.
    pub fn new(limit: Option<i64>, skip: Option<i64>) -> Self {
        Self {
            limit: limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT),
            skip: skip.filter(|s| *s >= 0).unwrap_or(0),
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn skip(&self) -> i64 {
        self.skip
    }

    pub fn of_next_page(&self) -> Paginator {
        Paginator {
            limit: self.limit,
            skip: self.skip.saturating_add(self.limit),
        }
    }

    /// Wrap a window of results produced by this paginator.
    pub fn create_page<T>(self, results: Vec<T>) -> Page<T> {
        Page {
            results,
            paginator: self,
        }
    }

    /// Apply this window to an already-ordered sequence.
    pub fn window<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(limit).collect()
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub paginator: Paginator,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
