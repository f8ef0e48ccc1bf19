//! Pagination over the visible set

/// The slice of the visible set a single page covers.
///
/// Pages are 1-based. `total_pages` is never zero: an empty visible set
/// renders as page 1 of 1 with an empty slice. A requested page beyond
/// the last valid page is clamped rather than producing an empty slice,
/// which covers the case where a narrowing filter shrinks the result set
/// under the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    /// The effective (clamped) 1-based page.
    pub page: usize,
    /// Total number of pages, minimum 1.
    pub total_pages: usize,
    /// Start index (inclusive) into the visible set.
    pub start: usize,
    /// End index (exclusive) into the visible set.
    pub end: usize,
}

/// Computes the page plan for `total_items` items at `page_size` per page.
///
/// `total_pages = max(1, ceil(total_items / page_size))`; the requested
/// page is clamped into `1..=total_pages`. A zero `page_size` is treated
/// as 1 so the function stays total.
pub fn plan(total_items: usize, requested_page: usize, page_size: usize) -> PagePlan {
    let page_size = page_size.max(1);
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = requested_page.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    let start = start.min(total_items);
    PagePlan {
        page,
        total_pages,
        start,
        end,
    }
}

/// Slices one page out of the visible set.
pub fn paginate<T: Clone>(items: &[T], requested_page: usize, page_size: usize) -> (Vec<T>, PagePlan) {
    let plan = plan(items.len(), requested_page, page_size);
    (items[plan.start..plan.end].to_vec(), plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(plan(23, 1, 10).total_pages, 3);
        assert_eq!(plan(20, 1, 10).total_pages, 2);
        assert_eq!(plan(1, 1, 10).total_pages, 1);
    }

    #[test]
    fn test_zero_rows_is_page_one_of_one() {
        let p = plan(0, 1, 10);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.page, 1);
        assert_eq!(p.start, 0);
        assert_eq!(p.end, 0);
    }

    #[test]
    fn test_page_clamped_after_narrowing() {
        // Was on page 3, a filter narrowed the set to 5 rows.
        let p = plan(5, 3, 10);
        assert_eq!(p.page, 1);
        assert_eq!(p.end - p.start, 5);
    }

    #[test]
    fn test_last_page_is_partial() {
        let items: Vec<usize> = (0..23).collect();
        let (rows, p) = paginate(&items, 3, 10);
        assert_eq!(p.total_pages, 3);
        assert_eq!(rows, vec![20, 21, 22]);
    }

    #[test]
    fn test_concatenated_pages_reproduce_input() {
        let items: Vec<usize> = (0..23).collect();
        let total_pages = plan(items.len(), 1, 10).total_pages;
        let mut concatenated = Vec::new();
        for page in 1..=total_pages {
            let (rows, _) = paginate(&items, page, 10);
            concatenated.extend(rows);
        }
        assert_eq!(concatenated, items);
    }

    #[test]
    fn test_page_zero_clamps_to_one() {
        assert_eq!(plan(23, 0, 10).page, 1);
    }
}
