//! Paginated selectable list shared by the menu screens.
//!
//! Screens build a heterogeneous item sequence (section headers,
//! placeholders, selectable entries), navigate it with wraparound while
//! skipping everything that cannot take focus, and ask for the page window
//! to render. Rows reserved for the "(more)" scroll indicators shrink the
//! window, which can push the window start again, so the window computation
//! iterates; the bound is explained at [`PagedList::page_window`].

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// One slot in the display order. Only `Entry` can take focus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot<P> {
    Header(String),
    Separator,
    Placeholder(String),
    Entry(P),
}

impl<P> Slot<P> {
    pub fn is_selectable(&self) -> bool {
        matches!(self, Slot::Entry(_))
    }

    pub fn payload(&self) -> Option<&P> {
        match self {
            Slot::Entry(payload) => Some(payload),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Contiguous slice of the list visible on screen.
///
/// `reserved_top`/`reserved_bottom` flag a row kept free for the
/// "more above"/"more below" indicator; those rows are not part of
/// `visible_rows`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub visible_rows: usize,
    pub reserved_top: bool,
    pub reserved_bottom: bool,
}

/// Rows that fit in `available_px` of vertical space, never less than one.
pub fn items_per_page(available_px: i32, line_px: i32) -> usize {
    (available_px / line_px.max(1)).max(1) as usize
}

/// Ordered item sequence with a stable selection.
///
/// Invariant: whenever at least one `Entry` exists, `selected()` points at
/// an `Entry` after every public operation. With no selectable entry the
/// selection is `None` and every navigation call is a no-op.
pub struct PagedList<P> {
    items: Vec<Slot<P>>,
    selected: Option<usize>,
}

impl<P> PagedList<P> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
        }
    }

    /// Replaces the sequence wholesale. Selection falls back to the first
    /// selectable index, or `None` when nothing is selectable.
    pub fn set_items(&mut self, items: Vec<Slot<P>>) {
        self.items = items;
        self.selected = self.first_selectable();
    }

    /// Replaces the sequence and tries to keep the logical selection: the
    /// first entry whose payload matches `anchor` is selected, with the
    /// usual first-selectable fallback.
    pub fn set_items_anchored<F>(&mut self, items: Vec<Slot<P>>, mut anchor: F)
    where
        F: FnMut(&P) -> bool,
    {
        self.items = items;
        self.selected = self
            .items
            .iter()
            .position(|slot| slot.payload().is_some_and(|p| anchor(p)))
            .or_else(|| self.first_selectable());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slot<P>> {
        self.items.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Slot<P>> {
        self.items.iter()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_payload(&self) -> Option<&P> {
        self.items.get(self.selected?)?.payload()
    }

    pub fn first_selectable(&self) -> Option<usize> {
        self.items.iter().position(Slot::is_selectable)
    }

    pub fn is_selectable(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(Slot::is_selectable)
    }

    /// Steps the selection circularly, skipping non-selectable slots.
    /// Returns whether the index changed (false with zero or one entries).
    pub fn move_selection(&mut self, direction: Direction) -> bool {
        let Some(selected) = self.selected else {
            return false;
        };
        let next = self.next_selectable_from(selected, direction);
        if next == selected {
            return false;
        }
        self.selected = Some(next);
        true
    }

    /// Jumps one page in `direction` with wraparound over the item count,
    /// then scans for the nearest selectable entry like `move_selection`.
    pub fn move_selection_by_page(&mut self, direction: Direction, items_per_page: usize) -> bool {
        let per_page = items_per_page.max(1);
        let count = self.items.len();
        let Some(selected) = self.selected else {
            return false;
        };
        let delta: isize = match direction {
            Direction::Previous => -1,
            Direction::Next => 1,
        };
        let page = (selected / per_page) as isize;
        let target = ((page + delta) * per_page as isize).rem_euclid(count as isize) as usize;
        let landed = self.next_selectable_from(target, direction);
        if landed == selected {
            return false;
        }
        self.selected = Some(landed);
        true
    }

    /// Scans circularly from (exclusive) `start`, at most one full cycle.
    fn next_selectable_from(&self, start: usize, direction: Direction) -> usize {
        let count = self.items.len();
        if count == 0 {
            return start;
        }
        let step: isize = match direction {
            Direction::Previous => -1,
            Direction::Next => 1,
        };
        let mut index = start as isize;
        for _ in 0..count {
            index = (index + step).rem_euclid(count as isize);
            if self.is_selectable(index as usize) {
                return index as usize;
            }
        }
        start
    }

    /// Window that keeps the selection visible with the indicator rows
    /// reserved.
    ///
    /// Reserving a row shrinks `visible_rows`, which can force `start`
    /// forward and flip the other flag, so the computation re-clamps up to
    /// three times. Three passes always reach a fixpoint: each adjustment
    /// moves `start` toward the selection, `reserved_top` can only turn on
    /// and `reserved_bottom` only turn off along the way, so at most two
    /// passes adjust anything and the third observes a stable window.
    pub fn page_window(&self, items_per_page: usize) -> PageWindow {
        let per_page = items_per_page.max(1);
        let total = self.items.len();
        if total == 0 {
            return PageWindow {
                start: 0,
                visible_rows: per_page,
                reserved_top: false,
                reserved_bottom: false,
            };
        }

        let anchor = self.selected.unwrap_or(0);
        let reserved = |start: usize| {
            let top = start > 0;
            let bottom = start + per_page < total;
            let visible = per_page
                .saturating_sub(top as usize + bottom as usize)
                .max(1);
            (top, bottom, visible)
        };

        let mut start = anchor / per_page * per_page;
        for _ in 0..3 {
            let (_, _, visible) = reserved(start);
            let mut adjusted = false;
            if anchor < start {
                start = anchor;
                adjusted = true;
            } else if anchor >= start + visible {
                start = anchor + 1 - visible;
                adjusted = true;
            }
            if start > total - 1 {
                start = total - 1;
                adjusted = true;
            }
            if !adjusted {
                break;
            }
        }

        let (reserved_top, reserved_bottom, visible_rows) = reserved(start);
        PageWindow {
            start,
            visible_rows,
            reserved_top,
            reserved_bottom,
        }
    }

    /// 1-based page of the current selection.
    pub fn current_page(&self, items_per_page: usize) -> usize {
        let per_page = items_per_page.max(1);
        self.selected.unwrap_or(0) / per_page + 1
    }

    /// Total page count, at least 1 even for an empty list.
    pub fn total_pages(&self, items_per_page: usize) -> usize {
        let per_page = items_per_page.max(1);
        if self.items.is_empty() {
            return 1;
        }
        self.items.len().div_ceil(per_page)
    }
}

impl<P> Default for PagedList<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn entries(n: usize) -> Vec<Slot<usize>> {
        (0..n).map(Slot::Entry).collect()
    }

    fn library_like() -> PagedList<usize> {
        let mut list = PagedList::new();
        list.set_items(vec![
            Slot::Header("Recent".to_string()),
            Slot::Placeholder("No recent books".to_string()),
            Slot::Header("All Books".to_string()),
            Slot::Entry(0),
            Slot::Entry(1),
            Slot::Entry(2),
        ]);
        list
    }

    #[test]
    fn selection_starts_at_first_entry() {
        let list = library_like();
        assert_eq!(list.selected(), Some(3));
    }

    #[test]
    fn next_skips_non_selectable_and_wraps() {
        let mut list = library_like();
        assert!(list.move_selection(Direction::Next));
        assert_eq!(list.selected(), Some(4));
        assert!(list.move_selection(Direction::Next));
        assert_eq!(list.selected(), Some(5));
        // wraps over the headers back to the first entry
        assert!(list.move_selection(Direction::Next));
        assert_eq!(list.selected(), Some(3));
    }

    #[test]
    fn previous_from_first_entry_wraps_to_last() {
        let mut list = library_like();
        assert!(list.move_selection(Direction::Previous));
        assert_eq!(list.selected(), Some(5));
    }

    #[test]
    fn round_trip_returns_to_origin() {
        let mut list = library_like();
        for k in 1..8 {
            for _ in 0..k {
                list.move_selection(Direction::Next);
            }
            for _ in 0..k {
                list.move_selection(Direction::Previous);
            }
            assert_eq!(list.selected(), Some(3), "k = {k}");
        }
    }

    #[test]
    fn no_selectable_items_is_a_no_op() {
        let mut list: PagedList<usize> = PagedList::new();
        list.set_items(vec![
            Slot::Header("Empty".to_string()),
            Slot::Placeholder("nothing here".to_string()),
            Slot::Separator,
        ]);
        assert_eq!(list.selected(), None);
        for _ in 0..4 {
            assert!(!list.move_selection(Direction::Next));
            assert!(!list.move_selection(Direction::Previous));
            assert!(!list.move_selection_by_page(Direction::Next, 5));
        }
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn single_entry_never_reports_change() {
        let mut list: PagedList<usize> = PagedList::new();
        list.set_items(vec![Slot::Header("x".to_string()), Slot::Entry(7)]);
        assert!(!list.move_selection(Direction::Next));
        assert!(!list.move_selection(Direction::Previous));
        assert_eq!(list.selected(), Some(1));
    }

    #[test]
    fn selection_never_lands_on_non_selectable() {
        let mut list: PagedList<usize> = PagedList::new();
        list.set_items(vec![
            Slot::Entry(0),
            Slot::Header("a".to_string()),
            Slot::Separator,
            Slot::Entry(1),
            Slot::Placeholder("b".to_string()),
            Slot::Entry(2),
            Slot::Header("c".to_string()),
        ]);
        for _ in 0..20 {
            list.move_selection(Direction::Next);
            assert!(list.is_selectable(list.selected().unwrap()));
        }
        for _ in 0..20 {
            list.move_selection(Direction::Previous);
            assert!(list.is_selectable(list.selected().unwrap()));
        }
    }

    #[test]
    fn page_jump_wraps_over_page_count() {
        let mut list: PagedList<usize> = PagedList::new();
        list.set_items(entries(12));
        assert!(list.move_selection_by_page(Direction::Next, 5));
        assert_eq!(list.selected(), Some(6));
        assert!(list.move_selection_by_page(Direction::Next, 5));
        assert_eq!(list.selected(), Some(11));
        // past the last page, back to the top
        assert!(list.move_selection_by_page(Direction::Next, 5));
        assert_eq!(list.selected(), Some(4));
    }

    #[test]
    fn page_jump_backwards_from_first_page_wraps() {
        let mut list: PagedList<usize> = PagedList::new();
        list.set_items(entries(12));
        assert!(list.move_selection_by_page(Direction::Previous, 5));
        assert!(list.is_selectable(list.selected().unwrap()));
        assert_eq!(list.selected(), Some(6));
    }

    #[test]
    fn page_jump_clamps_degenerate_page_size() {
        let mut list: PagedList<usize> = PagedList::new();
        list.set_items(entries(3));
        assert!(list.move_selection_by_page(Direction::Next, 0));
        assert_eq!(list.selected(), Some(2));
    }

    #[test]
    fn window_always_contains_selection() {
        for total in 0..50usize {
            for per_page in 1..=10usize {
                let mut list: PagedList<usize> = PagedList::new();
                list.set_items(entries(total));
                for selected in 0..total {
                    list.selected = Some(selected);
                    let window = list.page_window(per_page);
                    assert!(
                        selected >= window.start
                            && selected < window.start + window.visible_rows,
                        "total={total} per_page={per_page} selected={selected} window={window:?}"
                    );
                    assert!(window.visible_rows >= 1);
                    assert_eq!(window.reserved_top, window.start > 0);
                    assert_eq!(
                        window.reserved_bottom,
                        window.start + per_page < total
                    );
                }
            }
        }
    }

    #[test]
    fn empty_window_is_well_formed() {
        let list: PagedList<usize> = PagedList::new();
        let window = list.page_window(6);
        assert_eq!(
            window,
            PageWindow {
                start: 0,
                visible_rows: 6,
                reserved_top: false,
                reserved_bottom: false,
            }
        );
        let clamped = list.page_window(0);
        assert_eq!(clamped.visible_rows, 1);
    }

    #[test]
    fn window_reaching_the_end_reserves_nothing_below() {
        let mut list: PagedList<usize> = PagedList::new();
        list.set_items(entries(12));
        list.selected = Some(11);
        let window = list.page_window(5);
        assert!(!window.reserved_bottom);
        assert!(window.reserved_top);
        // selection sits on the last visible row
        assert_eq!(window.start + window.visible_rows - 1, 11);
    }

    #[test]
    fn page_counts() {
        let mut list: PagedList<usize> = PagedList::new();
        assert_eq!(list.total_pages(5), 1);
        assert_eq!(list.current_page(5), 1);
        list.set_items(entries(12));
        assert_eq!(list.total_pages(5), 3);
        list.selected = Some(11);
        assert_eq!(list.current_page(5), 3);
        assert_eq!(list.total_pages(0), 12);
    }

    #[test]
    fn rebuild_falls_back_to_first_selectable() {
        let mut list: PagedList<usize> = PagedList::new();
        list.set_items(entries(20));
        list.selected = Some(17);
        list.set_items(entries(3));
        assert_eq!(list.selected(), Some(0));
        list.set_items(Vec::new());
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn anchored_rebuild_keeps_the_logical_entry() {
        let mut list: PagedList<&'static str> = PagedList::new();
        list.set_items(vec![
            Slot::Entry("alpha"),
            Slot::Entry("beta"),
            Slot::Entry("gamma"),
        ]);
        list.move_selection(Direction::Next);
        assert_eq!(list.selected_payload(), Some(&"beta"));

        list.set_items_anchored(
            vec![
                Slot::Header("All".to_string()),
                Slot::Entry("beta"),
                Slot::Entry("delta"),
            ],
            |name| *name == "beta",
        );
        assert_eq!(list.selected_payload(), Some(&"beta"));

        // anchor missing: falls back to the first selectable
        list.set_items_anchored(vec![Slot::Entry("zeta")], |name| *name == "beta");
        assert_eq!(list.selected_payload(), Some(&"zeta"));
    }

    #[test]
    fn items_per_page_clamps() {
        assert_eq!(items_per_page(300, 24), 12);
        assert_eq!(items_per_page(10, 24), 1);
        assert_eq!(items_per_page(100, 0), 100);
        assert_eq!(items_per_page(-50, 24), 1);
    }
}
