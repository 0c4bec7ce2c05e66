//! Pagination helpers shared by repository queries and templates.

use serde::Serialize;

/// Rows per page on paginated listings.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Pages always shown at each end of the pager.
const EDGE_PAGES: usize = 2;
/// Pages shown immediately before the current page.
const PAGES_BEFORE_CURRENT: usize = 2;
/// Pages shown immediately after the current page.
const PAGES_AFTER_CURRENT: usize = 4;

/// Builds the pager cells: page numbers with `None` marking a gap.
///
/// Three windows are emitted (left edge, around the current page, right
/// edge); overlapping windows merge, disjoint ones are separated by a gap
/// cell.
fn page_windows(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return Vec::new();
    }

    let windows = [
        (1, EDGE_PAGES.min(total_pages)),
        (
            current_page.saturating_sub(PAGES_BEFORE_CURRENT).max(1),
            (current_page + PAGES_AFTER_CURRENT).min(total_pages),
        ),
        (
            (total_pages + 1).saturating_sub(EDGE_PAGES).max(1),
            total_pages,
        ),
    ];

    let mut pages = Vec::new();
    let mut last_emitted = 0;
    for (start, end) in windows {
        let start = start.max(last_emitted + 1);
        if start > end {
            continue;
        }
        if last_emitted > 0 && start > last_emitted + 1 {
            pages.push(None);
        }
        pages.extend((start..=end).map(Some));
        last_emitted = end;
    }

    pages
}

/// One page of query results plus the pager state templates render from.
#[derive(Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Pager cells; `None` renders as an ellipsis.
    pub pages: Vec<Option<usize>>,
    pub page: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        Self {
            items,
            pages: page_windows(total_pages, current_page),
            page: current_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_pager_gets_gaps_around_current_window() {
        assert_eq!(
            page_windows(20, 10),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20),
            ]
        );
    }

    #[test]
    fn short_pager_has_no_gaps() {
        assert_eq!(page_windows(3, 1), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(page_windows(0, 1), Vec::<Option<usize>>::new());
    }

    #[test]
    fn adjacent_windows_merge_without_gap_cell() {
        // Current page 3 of 9: the current window reaches page 7 and the
        // right edge starts at 8, so the pager is continuous.
        assert_eq!(
            page_windows(9, 3),
            vec![
                Some(1),
                Some(2),
                Some(3),
                Some(4),
                Some(5),
                Some(6),
                Some(7),
                Some(8),
                Some(9),
            ]
        );
    }

    #[test]
    fn zero_page_is_coerced_to_one() {
        let paginated = Paginated::new(vec![1, 2, 3], 0, 5);
        assert_eq!(paginated.page, 1);
        assert_eq!(paginated.items, vec![1, 2, 3]);
    }
}
