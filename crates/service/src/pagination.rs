//! Pagination utilities for the service layer.
//!
//! `Pagination` normalizes raw page inputs for database queries; `page_items`
//! builds the bounded pager control (page numbers plus ellipsis markers)
//! rendered by the back-office list views.

use serde::Serialize;

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `u64`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: 10 }
    }
}

/// Page math for a filtered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub page_count: u64,
}

impl PageMeta {
    /// `page` is clamped into `1..=page_count`; an empty result still has one page.
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let per_page = per_page.max(1);
        let page_count = if total == 0 { 1 } else { total.div_ceil(per_page) };
        Self { page: page.clamp(1, page_count), per_page, total, page_count }
    }

    /// Pager control for this page, see [`page_items`].
    pub fn items(&self) -> Vec<PageItem> {
        page_items(self.page_count, self.page)
    }
}

/// One slot of the pager control: a page number, or an ellipsis standing for
/// an elided run. Dots carry a stable id (`dots1` leading, `dots2` trailing)
/// so both can appear in the same control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageItem {
    Page { value: u64 },
    Dots { value: &'static str, id: &'static str },
}

impl PageItem {
    fn page(value: u64) -> Self {
        Self::Page { value }
    }

    fn dots(id: &'static str) -> Self {
        Self::Dots { value: "...", id }
    }
}

/// Compute the display sequence for a bounded-width pager.
///
/// Up to five pages are shown verbatim. Beyond that the first and last pages
/// are always kept and the window collapses around `current_page`:
/// `[1 2 3 4 … n]` near the start, `[1 … n-3 n-2 n-1 n]` near the end and
/// `[1 … c-1 c c+1 … n]` in the middle. Inputs are assumed pre-clamped by the
/// caller (`PageMeta::new` does so).
pub fn page_items(page_count: u64, current_page: u64) -> Vec<PageItem> {
    if page_count <= 5 {
        return (1..=page_count).map(PageItem::page).collect();
    }
    if current_page <= 3 {
        return vec![
            PageItem::page(1),
            PageItem::page(2),
            PageItem::page(3),
            PageItem::page(4),
            PageItem::dots("dots1"),
            PageItem::page(page_count),
        ];
    }
    if current_page >= page_count - 3 {
        let mut items = vec![PageItem::page(1), PageItem::dots("dots1")];
        items.extend((page_count - 3..=page_count).map(PageItem::page));
        return items;
    }
    vec![
        PageItem::page(1),
        PageItem::dots("dots1"),
        PageItem::page(current_page - 1),
        PageItem::page(current_page),
        PageItem::page(current_page + 1),
        PageItem::dots("dots2"),
        PageItem::page(page_count),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(values: &[u64]) -> Vec<PageItem> {
        values.iter().copied().map(PageItem::page).collect()
    }

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 10);
    }

    #[test]
    fn small_page_counts_list_every_page() {
        for page_count in 1..=5u64 {
            for current in 1..=page_count {
                let items = page_items(page_count, current);
                assert_eq!(items, pages(&(1..=page_count).collect::<Vec<_>>()));
            }
        }
    }

    #[test]
    fn near_start_collapses_to_leading_run() {
        assert_eq!(
            page_items(10, 2),
            vec![
                PageItem::page(1),
                PageItem::page(2),
                PageItem::page(3),
                PageItem::page(4),
                PageItem::dots("dots1"),
                PageItem::page(10),
            ]
        );
    }

    #[test]
    fn near_end_collapses_to_trailing_run() {
        assert_eq!(
            page_items(10, 8),
            vec![
                PageItem::page(1),
                PageItem::dots("dots1"),
                PageItem::page(7),
                PageItem::page(8),
                PageItem::page(9),
                PageItem::page(10),
            ]
        );
    }

    #[test]
    fn middle_window_keeps_both_ellipses() {
        assert_eq!(
            page_items(20, 10),
            vec![
                PageItem::page(1),
                PageItem::dots("dots1"),
                PageItem::page(9),
                PageItem::page(10),
                PageItem::page(11),
                PageItem::dots("dots2"),
                PageItem::page(20),
            ]
        );
    }

    #[test]
    fn single_page_yields_single_item() {
        assert_eq!(page_items(1, 1), vec![PageItem::page(1)]);
    }

    #[test]
    fn window_invariants_hold_for_all_inputs() {
        for page_count in 1..=40u64 {
            for current in 1..=page_count {
                let items = page_items(page_count, current);
                assert!(!items.is_empty());

                let dots: Vec<usize> = items
                    .iter()
                    .enumerate()
                    .filter(|(_, i)| matches!(i, PageItem::Dots { .. }))
                    .map(|(idx, _)| idx)
                    .collect();
                assert!(dots.len() <= 2, "more than two dots for ({page_count},{current})");
                for pair in dots.windows(2) {
                    assert!(pair[1] - pair[0] > 1, "adjacent dots for ({page_count},{current})");
                }

                if page_count <= 5 {
                    assert_eq!(items.len(), page_count as usize);
                    assert!(dots.is_empty());
                } else {
                    assert_eq!(items.first(), Some(&PageItem::page(1)));
                    assert_eq!(items.last(), Some(&PageItem::page(page_count)));
                }

                // the middle window keeps the current page visible
                if page_count > 5 && current > 3 && current < page_count - 3 {
                    assert!(items.contains(&PageItem::page(current - 1)));
                    assert!(items.contains(&PageItem::page(current)));
                    assert!(items.contains(&PageItem::page(current + 1)));
                }
            }
        }
    }

    #[test]
    fn page_items_serialize_with_type_tags() {
        let json = serde_json::to_value(page_items(10, 2)).unwrap();
        assert_eq!(json[0], serde_json::json!({"type": "page", "value": 1}));
        assert_eq!(
            json[4],
            serde_json::json!({"type": "dots", "value": "...", "id": "dots1"})
        );
    }

    #[test]
    fn meta_clamps_page_and_computes_page_count() {
        let meta = PageMeta::new(99, 10, 42);
        assert_eq!(meta.page_count, 5);
        assert_eq!(meta.page, 5);
        let empty = PageMeta::new(1, 10, 0);
        assert_eq!(empty.page_count, 1);
        assert_eq!(empty.items(), vec![PageItem::page(1)]);
    }
}
