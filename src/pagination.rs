//! Client-side pagination over the cached record set.
//!
//! Everything here is a pure function of `(total_records, page_size,
//! current_page)`; the list component owns the inputs and recomputes the
//! state after every operation that can change them.

use serde::Serialize;

use crate::domain::types::PageSize;

/// Builds the page links shown under the table. `None` marks a gap.
pub fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
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

/// Derived description of the visible window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page_size: usize,
    /// 1-indexed, always within `1..=total_pages`.
    pub current_page: usize,
    pub total_records: usize,
    /// At least 1, even for an empty record set.
    pub total_pages: usize,
    /// 1-based number of the first visible record, 0 when there is none.
    pub start_record: usize,
    /// 1-based number of the last visible record.
    pub end_record: usize,
    /// The window reaches the last record.
    pub end: bool,
}

impl PaginationState {
    /// Computes the window for `requested_page`, clamping it into range.
    pub fn compute(total_records: usize, page_size: PageSize, requested_page: usize) -> Self {
        let page_size = page_size.get();
        let total_pages = total_records.div_ceil(page_size).max(1);
        let current_page = requested_page.clamp(1, total_pages);

        let begin = (current_page - 1) * page_size;
        let end_record = (begin + page_size).min(total_records);
        let start_record = if end_record > begin { begin + 1 } else { 0 };

        Self {
            page_size,
            current_page,
            total_records,
            total_pages,
            start_record,
            end_record,
            end: current_page == total_pages,
        }
    }

    /// Slice bounds of the visible window inside the record set.
    pub fn range(&self) -> std::ops::Range<usize> {
        let begin = (self.current_page - 1) * self.page_size;
        begin.min(self.total_records)..self.end_record
    }

    pub fn is_first(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last(&self) -> bool {
        self.current_page == self.total_pages
    }

    /// Which navigation controls should be disabled.
    pub fn control_status(&self) -> ControlStatus {
        let empty = self.total_records == 0;
        ControlStatus {
            first: empty || self.is_first(),
            previous: empty || self.is_first(),
            next: empty || self.is_last(),
            last: empty || self.is_last(),
        }
    }

    /// Page links with two pages on each edge and a window around the
    /// current one.
    pub fn page_links(&self) -> Vec<Option<usize>> {
        get_pages(self.total_pages, self.current_page, 2, 2, 4, 2)
    }
}

/// Disabled flags of the pagination buttons. `true` means disabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ControlStatus {
    pub first: bool,
    pub previous: bool,
    pub next: bool,
    pub last: bool,
}

/// Pagination button pressed by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageAction {
    First,
    Previous,
    Next,
    Last,
    GoTo(usize),
}

impl PageAction {
    /// Page reached from `state`, clamped to the valid range.
    pub fn target(self, state: &PaginationState) -> usize {
        let page = match self {
            PageAction::First => 1,
            PageAction::Previous => state.current_page.saturating_sub(1),
            PageAction::Next => state.current_page + 1,
            PageAction::Last => state.total_pages,
            PageAction::GoTo(page) => page,
        };
        page.clamp(1, state.total_pages)
    }

    /// Maps a button label ("First", "Previous", "Next", "Last") to an action.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "First" => Some(PageAction::First),
            "Previous" => Some(PageAction::Previous),
            "Next" => Some(PageAction::Next),
            "Last" => Some(PageAction::Last),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> PageSize {
        PageSize::new(n).unwrap()
    }

    #[test]
    fn thirty_two_records_in_pages_of_fifteen() {
        let first = PaginationState::compute(32, size(15), 1);
        assert_eq!(first.total_pages, 3);
        assert_eq!((first.start_record, first.end_record), (1, 15));
        assert!(!first.end);

        let second = PaginationState::compute(32, size(15), 2);
        assert_eq!((second.start_record, second.end_record), (16, 30));
        assert!(!second.end);

        let third = PaginationState::compute(32, size(15), 3);
        assert_eq!((third.start_record, third.end_record), (31, 32));
        assert_eq!(third.range().len(), 2);
        assert!(third.end);
    }

    #[test]
    fn page_lengths_sum_to_total() {
        for total in 0..50 {
            for page_size in 1..12 {
                let first = PaginationState::compute(total, size(page_size), 1);
                assert_eq!(first.total_pages, total.div_ceil(page_size).max(1));
                let sum: usize = (1..=first.total_pages)
                    .map(|page| PaginationState::compute(total, size(page_size), page).range().len())
                    .sum();
                assert_eq!(sum, total, "total={total} page_size={page_size}");
            }
        }
    }

    #[test]
    fn empty_set_has_one_page_and_disabled_controls() {
        let state = PaginationState::compute(0, size(15), 1);
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.range(), 0..0);
        assert_eq!(state.start_record, 0);
        assert_eq!(
            state.control_status(),
            ControlStatus {
                first: true,
                previous: true,
                next: true,
                last: true,
            }
        );
    }

    #[test]
    fn requested_page_is_clamped() {
        assert_eq!(PaginationState::compute(20, size(10), 9).current_page, 2);
        assert_eq!(PaginationState::compute(20, size(10), 0).current_page, 1);
    }

    #[test]
    fn controls_follow_position() {
        let middle = PaginationState::compute(45, size(15), 2).control_status();
        assert!(!middle.first && !middle.previous && !middle.next && !middle.last);

        let last = PaginationState::compute(45, size(15), 3).control_status();
        assert!(!last.first && !last.previous && last.next && last.last);
    }

    #[test]
    fn actions_stop_at_boundaries() {
        let first = PaginationState::compute(45, size(15), 1);
        assert_eq!(PageAction::Previous.target(&first), 1);
        let last = PaginationState::compute(45, size(15), 3);
        assert_eq!(PageAction::Next.target(&last), 3);
        assert_eq!(PageAction::GoTo(10).target(&last), 3);
    }

    #[test]
    fn page_links_collapse_long_ranges() {
        let state = PaginationState::compute(200, size(10), 10);
        let links = state.page_links();
        assert_eq!(links.first(), Some(&Some(1)));
        assert_eq!(links.last(), Some(&Some(20)));
        assert!(links.contains(&None));
        assert!(links.contains(&Some(10)));
    }

    #[test]
    fn get_pages_without_gaps_for_small_sets() {
        assert_eq!(get_pages(3, 1, 2, 2, 4, 2), vec![Some(1), Some(2), Some(3)]);
        assert!(get_pages(0, 1, 2, 2, 4, 2).is_empty());
    }

    #[test]
    fn button_labels_map_to_actions() {
        assert_eq!(PageAction::from_label("Next"), Some(PageAction::Next));
        assert_eq!(PageAction::from_label("First"), Some(PageAction::First));
        assert_eq!(PageAction::from_label("next"), None);
    }
}
