//! Row virtualization math for the thumbnail grid
//!
//! Works in terminal lines. Items are laid out row-major in a fixed number of
//! columns, every row gets the same estimated height, and only rows that
//! intersect the viewport (widened by an overscan margin) are materialized.

use std::ops::Range;

/// Rows kept materialized above and below the viewport
pub const OVERSCAN_ROWS: usize = 5;

/// Load more once the last rendered row is this close to the last row
pub const LOAD_MORE_THRESHOLD_ROWS: usize = 3;

/// Thumbnails are 4:3 landscape
pub const THUMBNAIL_ASPECT_RATIO: f32 = 4.0 / 3.0;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_HEIGHT_TO_WIDTH: f32 = 2.0;

/// Border plus a caption line on each side
pub const MIN_ROW_HEIGHT: u32 = 4;

/// Responsive column count for a container `width` columns wide
pub fn column_count(width: u16) -> usize {
    match width {
        0..60 => 2,
        60..120 => 4,
        _ => 5,
    }
}

/// Estimated height in lines of one grid row
pub fn estimate_row_height(container_width: u16, columns: usize, aspect_ratio: f32) -> u32 {
    let cell_width = container_width as f32 / columns.max(1) as f32;
    let height = (cell_width / aspect_ratio / CELL_HEIGHT_TO_WIDTH).ceil() as u32;
    height.max(MIN_ROW_HEIGHT)
}

/// One materialized row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VirtualRow {
    pub row_index: usize,
    pub vertical_offset: u32,
    pub height_estimate: u32,
}

/// The rows to build for the current scroll position
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VirtualWindow {
    pub rows: Vec<VirtualRow>,
    pub total_height: u32,
    pub scroll_offset: u32,
}

impl VirtualWindow {
    pub fn first_row(&self) -> Option<usize> {
        self.rows.first().map(|r| r.row_index)
    }

    pub fn last_row(&self) -> Option<usize> {
        self.rows.last().map(|r| r.row_index)
    }

    pub fn row_range(&self) -> Option<Range<usize>> {
        Some(self.first_row()?..self.last_row()? + 1)
    }

    #[cfg(test)]
    pub fn contains_row(&self, row: usize) -> bool {
        self.row_range().is_some_and(|r| r.contains(&row))
    }
}

/// Grid geometry for a given item count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowLayout {
    pub item_count: usize,
    pub columns: usize,
    pub row_height: u32,
}

impl RowLayout {
    pub fn new(item_count: usize, columns: usize, row_height: u32) -> Self {
        Self {
            item_count,
            columns: columns.max(1),
            row_height: row_height.max(1),
        }
    }

    pub fn row_count(&self) -> usize {
        self.item_count.div_ceil(self.columns)
    }

    pub fn total_height(&self) -> u32 {
        self.row_count() as u32 * self.row_height
    }

    pub fn max_scroll(&self, viewport_height: u32) -> u32 {
        self.total_height().saturating_sub(viewport_height)
    }

    pub fn row_of(&self, item_index: usize) -> usize {
        item_index / self.columns
    }

    pub fn row_offset(&self, row: usize) -> u32 {
        row as u32 * self.row_height
    }

    /// Indices of the items laid out on `row`
    pub fn row_items(&self, row: usize) -> Range<usize> {
        let start = (row * self.columns).min(self.item_count);
        let end = (start + self.columns).min(self.item_count);
        start..end
    }

    /// Rows intersecting `[scroll - overscan, scroll + viewport + overscan)`,
    /// with the overscan measured in whole rows
    pub fn virtual_rows(&self, scroll_offset: u32, viewport_height: u32, overscan: usize) -> VirtualWindow {
        let row_count = self.row_count();
        let scroll_offset = scroll_offset.min(self.max_scroll(viewport_height));
        let total_height = self.total_height();

        if row_count == 0 {
            return VirtualWindow {
                rows: Vec::new(),
                total_height,
                scroll_offset,
            };
        }

        let first_visible = (scroll_offset / self.row_height) as usize;
        let visible_end = scroll_offset + viewport_height.max(1);
        let last_visible = ((visible_end.div_ceil(self.row_height)) as usize)
            .saturating_sub(1)
            .min(row_count - 1);

        let first = first_visible.saturating_sub(overscan);
        let last = last_visible.saturating_add(overscan).min(row_count - 1);

        let rows = (first..=last)
            .map(|row_index| VirtualRow {
                row_index,
                vertical_offset: self.row_offset(row_index),
                height_estimate: self.row_height,
            })
            .collect();

        VirtualWindow {
            rows,
            total_height,
            scroll_offset,
        }
    }

    /// Smallest scroll change that keeps `row` fully inside the viewport
    pub fn scroll_to_reveal(&self, row: usize, scroll_offset: u32, viewport_height: u32) -> u32 {
        let top = self.row_offset(row);
        let bottom = top + self.row_height;
        let scroll = if top < scroll_offset {
            top
        } else if bottom > scroll_offset + viewport_height {
            bottom.saturating_sub(viewport_height)
        } else {
            scroll_offset
        };
        scroll.min(self.max_scroll(viewport_height))
    }
}

/// True when the last materialized row is within `threshold` rows of the end
pub fn near_end(window: &VirtualWindow, row_count: usize, threshold: usize) -> bool {
    match window.last_row() {
        Some(last) => last + threshold >= row_count.saturating_sub(1),
        None => false,
    }
}
