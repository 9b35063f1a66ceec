//! Client-side pagination over an already-filtered list.

use serde::{Deserialize, Serialize};

/// Pagination metadata, shaped like the backend's `meta` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub total_items: u32,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            total_pages: 0,
            total_items: 0,
        }
    }
}

impl PageMeta {
    /// Metadata for `total_items` split into pages of `limit`.
    ///
    /// `page` is 1-based and clamped into range; a `limit` of 0 counts as 1.
    #[must_use]
    pub fn for_total(total_items: usize, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let total_items = u32::try_from(total_items).unwrap_or(u32::MAX);
        let total_pages = total_items.div_ceil(limit);
        Self {
            page: page.clamp(1, total_pages.max(1)),
            limit,
            total_pages,
            total_items,
        }
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.limit as usize)
    }
}

/// Slice one page out of `items`.
#[must_use]
pub fn paginate<T>(items: &[T], page: u32, limit: u32) -> (&[T], PageMeta) {
    let meta = PageMeta::for_total(items.len(), page, limit);
    let start = meta.offset().min(items.len());
    let end = start.saturating_add(meta.limit as usize).min(items.len());
    (items.get(start..end).unwrap_or_default(), meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_middle_page() {
        let items: Vec<u32> = (1..=45).collect();
        let (page, meta) = paginate(&items, 2, 20);
        assert_eq!(page.first(), Some(&21));
        assert_eq!(page.len(), 20);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total_items, 45);
        assert!(meta.has_next());
        assert!(meta.has_previous());
    }

    #[test]
    fn test_paginate_clamps_page() {
        let items: Vec<u32> = (1..=45).collect();
        let (page, meta) = paginate(&items, 9, 20);
        assert_eq!(meta.page, 3);
        assert_eq!(page.len(), 5);

        let (_, meta) = paginate(&items, 0, 20);
        assert_eq!(meta.page, 1);
    }

    #[test]
    fn test_paginate_empty() {
        let items: Vec<u32> = vec![];
        let (page, meta) = paginate(&items, 1, 20);
        assert!(page.is_empty());
        assert_eq!(meta.page, 1);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next());
    }

    #[test]
    fn test_zero_limit_counts_as_one() {
        let items = ["a", "b"];
        let (page, meta) = paginate(&items, 2, 0);
        assert_eq!(page, &["b"]);
        assert_eq!(meta.limit, 1);
    }

    #[test]
    fn test_meta_deserializes_backend_shape() {
        let meta: PageMeta =
            serde_json::from_str(r#"{"page":2,"limit":10,"totalPages":4,"totalItems":37}"#)
                .unwrap_or_default();
        assert_eq!(meta.total_pages, 4);
        assert_eq!(meta.total_items, 37);
    }
}
