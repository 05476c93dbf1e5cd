//! Render-ready pages and the pager built from them.

use serde::Serialize;
use serde_json::Value;

use crate::state::ItemsPerPage;

/// One page of items plus everything needed to render its footer.
///
/// Invariants: `display_from <= display_to <= display_total`, and
/// `items.len()` never exceeds the page size when client-side pagination
/// produced the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPage {
    pub items: Vec<Value>,
    pub display_from: u64,
    pub display_to: u64,
    pub display_total: u64,
    pub total_pages: u64,
    pub using_server_pagination: bool,
    /// The page these items belong to.
    pub page: u64,
    #[serde(serialize_with = "serialize_items_per_page")]
    pub items_per_page: ItemsPerPage,
}

fn serialize_items_per_page<S: serde::Serializer>(
    value: &ItemsPerPage,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl ResolvedPage {
    /// An empty page, used when a body held no recognizable collection.
    pub fn empty(items_per_page: ItemsPerPage) -> Self {
        Self {
            items: Vec::new(),
            display_from: 0,
            display_to: 0,
            display_total: 0,
            total_pages: 0,
            using_server_pagination: false,
            page: 1,
            items_per_page,
        }
    }

    pub fn pager(&self) -> Pager {
        Pager::new(self.page, self.total_pages)
    }
}

/// Computes `(display_from, display_to)` for a page holding `shown` items.
///
/// Both are 0 when there is nothing to show. `display_from` never exceeds
/// `display_to`, even for an empty page past the last one.
pub fn display_range(page: u64, per_page: u64, shown: u64, total: u64) -> (u64, u64) {
    if total == 0 {
        return (0, 0);
    }
    let offset = page.saturating_sub(1).saturating_mul(per_page);
    let from = offset.saturating_add(1).min(total);
    let to = offset.saturating_add(shown).min(total);
    (from.min(to), to)
}

/// Previous/next state and a windowed list of page links. `None` marks a gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
    pub current: u64,
    pub total_pages: u64,
    pub can_previous: bool,
    pub can_next: bool,
    pub pages: Vec<Option<u64>>,
}

impl Pager {
    pub fn new(current: u64, total_pages: u64) -> Self {
        let current = current.max(1);
        Self {
            current,
            total_pages,
            can_previous: total_pages > 0 && current > 1,
            can_next: total_pages > 0 && current < total_pages,
            pages: page_window(total_pages, current, 1, 2, 2, 1),
        }
    }

    /// A pager with both buttons disabled and no links.
    pub fn disabled() -> Self {
        Self::new(1, 0)
    }
}

fn page_window(
    total_pages: u64,
    current_page: u64,
    left_edge: u64,
    left_current: u64,
    right_current: u64,
    right_edge: u64,
) -> Vec<Option<u64>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_range_last_partial_page() {
        assert_eq!(display_range(3, 10, 3, 23), (21, 23));
    }

    #[test]
    fn display_range_empty() {
        assert_eq!(display_range(1, 10, 0, 0), (0, 0));
    }

    #[test]
    fn display_range_empty_page_past_the_end() {
        let (from, to) = display_range(3, 10, 0, 42);
        assert!(from <= to);
        assert_eq!(to, 20);
    }

    #[test]
    fn pager_disabled_without_pages() {
        let pager = Pager::disabled();
        assert!(!pager.can_previous);
        assert!(!pager.can_next);
        assert!(pager.pages.is_empty());
    }

    #[test]
    fn pager_boundaries() {
        let first = Pager::new(1, 3);
        assert!(!first.can_previous);
        assert!(first.can_next);

        let last = Pager::new(3, 3);
        assert!(last.can_previous);
        assert!(!last.can_next);
    }

    #[test]
    fn pager_window_with_gaps() {
        let pager = Pager::new(10, 20);
        assert_eq!(
            pager.pages,
            vec![
                Some(1),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(20)
            ]
        );
    }

    #[test]
    fn pager_window_small() {
        assert_eq!(Pager::new(1, 3).pages, vec![Some(1), Some(2), Some(3)]);
    }
}
