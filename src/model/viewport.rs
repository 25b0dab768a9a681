//! Viewport state for the gallery grid and the load-more trigger

use std::ops::Range;

use super::virtual_rows::{
    column_count, estimate_row_height, near_end, RowLayout, VirtualWindow,
    LOAD_MORE_THRESHOLD_ROWS, OVERSCAN_ROWS, THUMBNAIL_ASPECT_RATIO,
};

/// "The materialized rows are nearing the end of loaded data"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadMoreSignal {
    pub last_rendered_row: usize,
    pub row_count: usize,
}

/// Watches the virtual window and emits a [`LoadMoreSignal`] each time the
/// rendered row set or the loaded data changes while it sits near the end.
///
/// `revision` comes from the loader and moves with every applied page, so a
/// page that lands entirely inside the existing last row still counts.
#[derive(Clone, Debug, Default)]
pub struct ViewportObserver {
    last_range: Option<Range<usize>>,
    last_row_count: usize,
    last_revision: u64,
}

impl ViewportObserver {
    pub fn observe(
        &mut self,
        window: &VirtualWindow,
        row_count: usize,
        revision: u64,
    ) -> Option<LoadMoreSignal> {
        let range = window.row_range();
        let changed = range != self.last_range
            || row_count != self.last_row_count
            || revision != self.last_revision;
        self.last_range = range;
        self.last_row_count = row_count;
        self.last_revision = revision;

        if !changed || !near_end(window, row_count, LOAD_MORE_THRESHOLD_ROWS) {
            return None;
        }

        let last_rendered_row = window.last_row()?;
        Some(LoadMoreSignal {
            last_rendered_row,
            row_count,
        })
    }

    pub fn forget(&mut self) {
        *self = Self::default();
    }
}

/// Scroll position, selection and geometry of the thumbnail grid
#[derive(Clone, Debug, Default)]
pub struct GalleryViewport {
    pub width: u16,
    pub height: u16,
    pub scroll_offset: u32,
    pub selected: usize,
    observer: ViewportObserver,
}

impl GalleryViewport {
    pub fn layout(&self, item_count: usize) -> RowLayout {
        let columns = column_count(self.width);
        let row_height = estimate_row_height(self.width, columns, THUMBNAIL_ASPECT_RATIO);
        RowLayout::new(item_count, columns, row_height)
    }

    pub fn window(&self, item_count: usize) -> VirtualWindow {
        self.layout(item_count)
            .virtual_rows(self.scroll_offset, self.height as u32, OVERSCAN_ROWS)
    }

    /// Record new geometry and loader state, returning a trigger if one fires
    pub fn sync(
        &mut self,
        width: u16,
        height: u16,
        item_count: usize,
        revision: u64,
    ) -> Option<LoadMoreSignal> {
        self.width = width;
        self.height = height;
        if item_count == 0 {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(item_count - 1);
        }
        self.reveal_selected(item_count);

        let layout = self.layout(item_count);
        let window = self.window(item_count);
        self.scroll_offset = window.scroll_offset;
        self.observer.observe(&window, layout.row_count(), revision)
    }

    pub fn move_selection(&mut self, delta: isize, item_count: usize) {
        if item_count == 0 {
            return;
        }
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, item_count as isize - 1) as usize;
        self.reveal_selected(item_count);
    }

    pub fn move_selection_rows(&mut self, rows: isize, item_count: usize) {
        let columns = self.layout(item_count).columns as isize;
        self.move_selection(rows * columns, item_count);
    }

    /// Move the selection by roughly one viewport of rows
    pub fn page(&mut self, down: bool, item_count: usize) {
        let layout = self.layout(item_count);
        let rows = (self.height as u32 / layout.row_height).max(1) as isize;
        self.move_selection_rows(if down { rows } else { -rows }, item_count);
    }

    pub fn select_first(&mut self, item_count: usize) {
        self.selected = 0;
        self.reveal_selected(item_count);
    }

    pub fn select_last(&mut self, item_count: usize) {
        self.selected = item_count.saturating_sub(1);
        self.reveal_selected(item_count);
    }

    fn reveal_selected(&mut self, item_count: usize) {
        if item_count == 0 {
            self.scroll_offset = 0;
            return;
        }
        let layout = self.layout(item_count);
        let row = layout.row_of(self.selected);
        self.scroll_offset = layout.scroll_to_reveal(row, self.scroll_offset, self.height as u32);
    }

    /// Back to the top for a new subject
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
        self.selected = 0;
        self.observer.forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(layout: &RowLayout, scroll: u32, height: u32) -> VirtualWindow {
        layout.virtual_rows(scroll, height, 0)
    }

    #[test]
    fn observer_fires_when_near_end() {
        let layout = RowLayout::new(12, 4, 10);
        let mut observer = ViewportObserver::default();

        let signal = observer.observe(&window(&layout, 0, 40), layout.row_count(), 1);
        assert_eq!(signal, Some(LoadMoreSignal { last_rendered_row: 2, row_count: 3 }));
    }

    #[test]
    fn observer_stays_quiet_for_unchanged_window() {
        let layout = RowLayout::new(12, 4, 10);
        let mut observer = ViewportObserver::default();
        let w = window(&layout, 0, 40);

        assert!(observer.observe(&w, layout.row_count(), 1).is_some());
        assert!(observer.observe(&w, layout.row_count(), 1).is_none());
    }

    #[test]
    fn observer_fires_again_after_rows_are_appended() {
        let mut observer = ViewportObserver::default();
        let short = RowLayout::new(8, 4, 10);
        assert!(observer.observe(&window(&short, 0, 40), short.row_count(), 1).is_some());

        let longer = RowLayout::new(16, 4, 10);
        assert!(observer.observe(&window(&longer, 0, 40), longer.row_count(), 1).is_some());
    }

    #[test]
    fn observer_fires_when_page_fills_existing_last_row() {
        let mut observer = ViewportObserver::default();
        let two = RowLayout::new(2, 4, 10);
        assert!(observer.observe(&window(&two, 0, 40), two.row_count(), 1).is_some());

        // two more items still fit the single row: same range, same row count
        let four = RowLayout::new(4, 4, 10);
        assert_eq!(four.row_count(), two.row_count());
        let signal = observer.observe(&window(&four, 0, 40), four.row_count(), 2);
        assert_eq!(signal, Some(LoadMoreSignal { last_rendered_row: 0, row_count: 1 }));
    }

    #[test]
    fn observer_fires_after_empty_page() {
        let mut observer = ViewportObserver::default();
        let layout = RowLayout::new(3, 4, 10);
        assert!(observer.observe(&window(&layout, 0, 40), layout.row_count(), 1).is_some());
        assert!(observer.observe(&window(&layout, 0, 40), layout.row_count(), 2).is_some());
    }

    #[test]
    fn failed_page_is_requested_again_when_window_moves() {
        let layout = RowLayout::new(100, 4, 10);
        let mut observer = ViewportObserver::default();
        assert!(observer.observe(&window(&layout, 200, 30), layout.row_count(), 1).is_some());

        // a failure leaves the revision alone, so a still frame stays quiet
        assert!(observer.observe(&window(&layout, 200, 30), layout.row_count(), 1).is_none());
        assert!(observer.observe(&window(&layout, 210, 30), layout.row_count(), 1).is_some());
    }

    #[test]
    fn observer_ignores_windows_far_from_end() {
        let layout = RowLayout::new(400, 4, 10);
        let mut observer = ViewportObserver::default();
        assert!(observer.observe(&window(&layout, 0, 40), layout.row_count(), 1).is_none());
        assert!(observer.observe(&window(&layout, 100, 40), layout.row_count(), 1).is_none());
    }

    #[test]
    fn observer_never_fires_without_rows() {
        let layout = RowLayout::new(0, 4, 10);
        let mut observer = ViewportObserver::default();
        assert!(observer.observe(&window(&layout, 0, 40), 0, 1).is_none());
    }

    #[test]
    fn selection_drives_scroll() {
        let mut viewport = GalleryViewport::default();
        // 100 wide -> 4 columns, rows 10 lines high
        viewport.sync(100, 30, 400, 1);
        assert_eq!(viewport.scroll_offset, 0);

        viewport.move_selection_rows(5, 400);
        assert_eq!(viewport.selected, 20);
        // row 5 spans 50..60, so the viewport bottom moves to 60
        assert_eq!(viewport.scroll_offset, 30);

        viewport.select_first(400);
        assert_eq!(viewport.scroll_offset, 0);
    }

    #[test]
    fn selection_is_clamped_to_items() {
        let mut viewport = GalleryViewport::default();
        viewport.sync(100, 30, 10, 1);
        viewport.move_selection(50, 10);
        assert_eq!(viewport.selected, 9);
        viewport.move_selection(-50, 10);
        assert_eq!(viewport.selected, 0);
    }

    #[test]
    fn scrolling_to_bottom_triggers_load_more() {
        let mut viewport = GalleryViewport::default();
        // 100 items, 4 columns, 25 rows of 10 lines
        assert!(viewport.sync(100, 30, 100, 1).is_none());

        viewport.select_last(100);
        let signal = viewport.sync(100, 30, 100, 1);
        assert_eq!(signal.map(|s| s.row_count), Some(25));
    }

    #[test]
    fn reset_returns_to_top() {
        let mut viewport = GalleryViewport::default();
        viewport.sync(100, 30, 100, 1);
        viewport.select_last(100);
        viewport.reset();
        assert_eq!(viewport.selected, 0);
        assert_eq!(viewport.scroll_offset, 0);
    }
}
