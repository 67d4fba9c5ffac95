//! Filtering, paging and wraparound cursor movement over a list
//!
//! The absolute cursor row inside the filtered list is
//! `start + offset`. Moving past either end wraps around instead of
//! clamping.

use std::ops::Range;

/// Smallest and largest allowed window sizes
pub const MIN_WINDOW: usize = 1;
pub const MAX_WINDOW: usize = 32;

/// Visible window into a filtered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    start: usize,
    offset: usize,
    size: usize,
}

impl Viewport {
    pub fn new(size: usize) -> Self {
        Self {
            start: 0,
            offset: 0,
            size: size.max(MIN_WINDOW),
        }
    }

    /// First visible row
    pub fn start(&self) -> usize {
        self.start
    }

    /// Cursor position inside the window
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Absolute cursor row in the filtered list
    pub fn row(&self) -> usize {
        self.start + self.offset
    }

    pub fn reset(&mut self) {
        self.start = 0;
        self.offset = 0;
    }

    /// Change the window size, keeping the cursor row on screen
    pub fn resize(&mut self, size: usize, total: usize) {
        let size = size.max(MIN_WINDOW);
        if size == self.size {
            return;
        }
        let row = self.row();
        self.size = size;
        self.start = self.start.min(row).min(total.saturating_sub(size));
        if row - self.start >= size {
            self.start = row + 1 - size;
        }
        self.offset = row - self.start;
    }

    /// Rows of a `total`-long filtered list that are on screen
    pub fn visible(&self, total: usize) -> Range<usize> {
        let start = self.start.min(total);
        start..(start + self.size).min(total)
    }

    pub fn move_down(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let visible = self.visible(total).len();
        if self.offset + 1 < visible {
            self.offset += 1;
        } else if self.row() + 1 >= total {
            self.reset();
        } else {
            self.start += 1;
        }
    }

    pub fn move_up(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        if self.offset > 0 {
            self.offset -= 1;
        } else if self.start > 0 {
            self.start -= 1;
        } else {
            // wrap so the last row is the bottom-most visible entry
            let visible = self.size.min(total);
            self.start = total - visible;
            self.offset = visible - 1;
        }
    }
}

/// Indices of the items that pass `matches`, in their original order.
/// The position of an index in the returned list is its filtered index.
pub fn filter_indices<I, F>(items: &[I], mut matches: F) -> Vec<usize>
where
    F: FnMut(&I) -> bool,
{
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| matches(item))
        .map(|(index, _)| index)
        .collect()
}
