use serde::Serialize;

/// Page request, always clamped: `page >= 1`, `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub const MAX_LIMIT: u32 = 100;
    pub const DEFAULT_LIMIT: u32 = 20;

    /// Clamp raw caller input (which may be zero or negative).
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.clamp(1, u32::MAX as i64) as u32,
            limit: limit.clamp(1, Self::MAX_LIMIT as i64) as u32,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }

    /// Slice one page out of an already filtered and ordered collection.
    pub fn apply<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let data: Vec<T> = items
            .into_iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .collect();
        Page {
            data,
            total,
            page: self.page,
            limit: self.limit,
            total_pages: total.div_ceil(self.limit as usize),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_LIMIT as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_input() {
        let req = PageRequest::new(0, 1_000);
        assert_eq!((req.page(), req.limit()), (1, 100));
        let req = PageRequest::new(-3, -1);
        assert_eq!((req.page(), req.limit()), (1, 1));
    }

    #[test]
    fn slices_pages() {
        let items: Vec<u32> = (0..45).collect();
        let page = PageRequest::new(3, 20).apply(items);
        assert_eq!(page.data, (40..45).collect::<Vec<_>>());
        assert_eq!(page.total, 45);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = PageRequest::new(9, 10).apply(vec![1, 2, 3]);
        assert!(page.data.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: clamped values always land in range.
            #[test]
            fn clamp_is_total(page in any::<i64>(), limit in any::<i64>()) {
                let req = PageRequest::new(page, limit);
                prop_assert!(req.page() >= 1);
                prop_assert!((1..=PageRequest::MAX_LIMIT).contains(&req.limit()));
            }

            /// Property: a page never holds more than `limit` items.
            #[test]
            fn page_respects_limit(len in 0usize..300, page in 1i64..20, limit in 1i64..120) {
                let req = PageRequest::new(page, limit);
                let out = req.apply((0..len).collect::<Vec<_>>());
                prop_assert!(out.data.len() <= req.limit() as usize);
                prop_assert_eq!(out.total, len);
            }
        }
    }
}
