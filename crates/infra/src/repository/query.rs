//! Offset-based pagination for title queries.

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not pick one.
pub const DEFAULT_LIMIT: u64 = 1000;

/// Skip/limit window over a matched set.
///
/// `limit == 0` is "unlimited": every match after `skip` is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of matches to skip (0-based offset).
    pub skip: u64,
    /// Maximum number of matches to return; 0 for no limit.
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    /// Every match, no offset.
    pub fn unlimited() -> Self {
        Self { skip: 0, limit: 0 }
    }

    pub fn is_unlimited(&self) -> bool {
        self.limit == 0
    }

    /// Apply the window to an already-filtered, ordered sequence.
    pub fn window<I>(self, items: I) -> impl Iterator<Item = I::Item>
    where
        I: Iterator,
    {
        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let take = if self.is_unlimited() {
            usize::MAX
        } else {
            usize::try_from(self.limit).unwrap_or(usize::MAX)
        };
        items.skip(skip).take(take)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn window(page: Pagination, len: u64) -> Vec<u64> {
        page.window(0..len).collect()
    }

    #[test]
    fn default_page_is_first_thousand() {
        let page = Pagination::default();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, DEFAULT_LIMIT);
        assert_eq!(window(page, 1500).len(), 1000);
    }

    #[test]
    fn zero_limit_means_everything_after_skip() {
        assert_eq!(window(Pagination::new(2, 0), 5), vec![2, 3, 4]);
        assert_eq!(window(Pagination::unlimited(), 3), vec![0, 1, 2]);
    }

    #[test]
    fn skip_past_end_is_empty() {
        assert!(window(Pagination::new(10, 3), 5).is_empty());
    }

    proptest! {
        #[test]
        fn window_matches_slice_semantics(len in 0u64..200, skip in 0u64..250, limit in 0u64..250) {
            let got = window(Pagination::new(skip, limit), len);

            let start = skip.min(len);
            let end = if limit == 0 { len } else { (start + limit).min(len) };
            let expected: Vec<u64> = (start..end).collect();

            prop_assert_eq!(got, expected);
        }
    }
}
