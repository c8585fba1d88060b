/// Number of interior page buttons shown between the first and last page.
pub const PAGE_WINDOW: usize = 5;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl PageMarker {
    pub fn page(self) -> Option<usize> {
        match self {
            Self::Page(page) => Some(page),
            Self::Ellipsis => None,
        }
    }
}

pub fn page_window(current_page: usize, total_pages: usize) -> Vec<PageMarker> {
    page_window_with(current_page, total_pages, PAGE_WINDOW)
}

/// Page-number strip for `current_page` out of `total_pages`, always flanked
/// by the first and last page. Callers keep `1 <= current_page <= total_pages`.
pub fn page_window_with(current_page: usize, total_pages: usize, window: usize) -> Vec<PageMarker> {
    let total_pages = total_pages.max(1);
    if total_pages <= window.saturating_add(2) {
        return (1..=total_pages).map(PageMarker::Page).collect();
    }

    let mut start = current_page.saturating_sub(1);
    let mut end = current_page.saturating_add(1);
    if current_page <= 3 {
        start = 2;
        end = window;
    }
    if current_page >= total_pages.saturating_sub(2) {
        start = total_pages.saturating_sub(window).saturating_add(1).max(2);
        end = total_pages.saturating_sub(1);
    }

    let mut markers = Vec::with_capacity(window.saturating_add(4));
    markers.push(PageMarker::Page(1));
    if start > 2 {
        markers.push(PageMarker::Ellipsis);
    }
    markers.extend((start..=end).map(PageMarker::Page));
    if end < total_pages.saturating_sub(1) {
        markers.push(PageMarker::Ellipsis);
    }
    markers.push(PageMarker::Page(total_pages));
    markers
}

/// 1-based, inclusive range of items shown on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRange {
    pub start: usize,
    pub end: usize,
}

pub fn item_range(current_page: usize, items_per_page: usize, total_items: usize) -> ItemRange {
    let start = current_page
        .saturating_sub(1)
        .saturating_mul(items_per_page)
        .saturating_add(1);
    let end = current_page
        .saturating_mul(items_per_page)
        .min(total_items);
    ItemRange { start, end }
}

pub fn total_pages(total_items: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 1;
    }
    total_items.div_ceil(items_per_page).max(1)
}

/// Page navigation state behind a page-number strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    items_per_page: usize,
    total_items: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
            total_items: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.items_per_page)
    }

    pub fn window(&self) -> Vec<PageMarker> {
        page_window(self.current_page, self.total_pages())
    }

    pub fn item_range(&self) -> ItemRange {
        item_range(self.current_page, self.items_per_page, self.total_items)
    }

    /// Controls are hidden when everything fits on one page.
    pub fn shows_controls(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn can_go_back(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_forward(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn first(&mut self) -> bool {
        self.go_to(1)
    }

    pub fn previous(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.go_to(self.current_page - 1)
    }

    pub fn next(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.go_to(self.current_page + 1)
    }

    pub fn last(&mut self) -> bool {
        self.go_to(self.total_pages())
    }

    /// Jumps to `page` when it lies in `[1, total_pages]`. Returns whether the
    /// current page changed.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() || page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Direct numeric entry. Rejected input leaves the current page untouched;
    /// the control then shows `current_page` again.
    pub fn jump_to_input(&mut self, input: &str) -> bool {
        match input.trim().parse::<usize>() {
            Ok(page) => self.go_to(page),
            Err(_) => false,
        }
    }

    /// Bounds of the current page inside a fully loaded list.
    pub fn slice_bounds(&self, len: usize) -> (usize, usize) {
        let start = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.items_per_page)
            .min(len);
        let end = start.saturating_add(self.items_per_page).min(len);
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::PageMarker::Ellipsis;
    use super::PageMarker::Page;
    use super::*;

    #[test]
    fn first_page_pins_window_to_start() {
        assert_eq!(
            page_window(1, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn last_page_pins_window_to_end() {
        assert_eq!(
            page_window(10, 10),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn middle_page_is_centered_between_ellipses() {
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn short_range_lists_every_page() {
        assert_eq!(
            page_window(3, 6),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6)]
        );
        assert_eq!(page_window(1, 1), vec![Page(1)]);
    }

    #[test]
    fn window_is_well_formed_for_every_page_count() {
        for total in 1..=200 {
            for current in 1..=total {
                let markers = page_window(current, total);
                let pages: Vec<usize> = markers.iter().filter_map(|m| m.page()).collect();

                if total > 1 {
                    assert_eq!(pages.first(), Some(&1), "total={total} current={current}");
                    assert_eq!(pages.last(), Some(&total), "total={total} current={current}");
                }
                assert!(
                    pages.windows(2).all(|pair| pair[0] < pair[1]),
                    "not increasing: total={total} current={current} {markers:?}"
                );
                assert!(pages.contains(&current));

                for (idx, marker) in markers.iter().enumerate() {
                    if *marker != Ellipsis {
                        continue;
                    }
                    let before = markers[idx - 1].page().unwrap();
                    let after = markers[idx + 1].page().unwrap();
                    assert!(after - before >= 2, "total={total} current={current}");
                }
                for (idx, marker) in markers.iter().enumerate().skip(1) {
                    if let (Some(prev), Some(page)) = (markers[idx - 1].page(), marker.page()) {
                        assert_eq!(page, prev + 1, "hidden gap without ellipsis");
                    }
                }
            }
        }
    }

    #[test]
    fn window_is_idempotent() {
        assert_eq!(page_window(7, 40), page_window(7, 40));
    }

    #[test]
    fn item_range_clamps_partial_last_page() {
        assert_eq!(item_range(3, 20, 45), ItemRange { start: 41, end: 45 });
        assert_eq!(item_range(1, 20, 45), ItemRange { start: 1, end: 20 });
    }

    #[test]
    fn navigation_is_disabled_at_edges() {
        let mut pager = Paginator::new(20);
        pager.set_total_items(45);
        assert_eq!(pager.total_pages(), 3);

        assert!(!pager.first());
        assert!(!pager.previous());
        assert!(pager.next());
        assert!(pager.last());
        assert_eq!(pager.current_page(), 3);
        assert!(!pager.next());
        assert!(!pager.last());
        assert!(pager.previous());
        assert_eq!(pager.current_page(), 2);
    }

    #[test]
    fn out_of_range_jump_reverts_silently() {
        let mut pager = Paginator::new(10);
        pager.set_total_items(95);
        assert!(pager.jump_to_input("7"));
        assert!(!pager.jump_to_input("0"));
        assert!(!pager.jump_to_input("11"));
        assert!(!pager.jump_to_input("abc"));
        assert!(!pager.jump_to_input(""));
        assert_eq!(pager.current_page(), 7);
    }

    #[test]
    fn shrinking_total_clamps_current_page() {
        let mut pager = Paginator::new(10);
        pager.set_total_items(100);
        pager.last();
        pager.set_total_items(25);
        assert_eq!(pager.current_page(), 3);
        pager.set_total_items(0);
        assert_eq!(pager.current_page(), 1);
        assert!(!pager.shows_controls());
    }

    #[test]
    fn slice_bounds_follow_current_page() {
        let mut pager = Paginator::new(20);
        pager.set_total_items(45);
        pager.last();
        assert_eq!(pager.slice_bounds(45), (40, 45));
    }
}
