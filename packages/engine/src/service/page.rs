use serde::Serialize;

/// Page size used when a caller passes `limit == 0`.
pub const DEFAULT_PAGE_LIMIT: usize = 100;
/// Hard cap applied to any requested page size.
pub const MAX_PAGE_LIMIT: usize = 1000;

/// One page of a filtered listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matching records before pagination was applied.
    pub total: usize,
    pub skip: usize,
    /// Effective limit after defaulting and capping.
    pub limit: usize,
}

impl<T> Page<T> {
    /// Slice an already-filtered match list down to one page.
    pub fn from_matches(matches: Vec<T>, skip: usize, limit: usize) -> Self {
        let limit = if limit == 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            limit.min(MAX_PAGE_LIMIT)
        };
        let total = matches.len();
        let items: Vec<T> = matches.into_iter().skip(skip).take(limit).collect();
        Self {
            items,
            total,
            skip,
            limit,
        }
    }
}
