//! Viewport management for scrolling.
//!
//! The [`Viewport`] struct tracks which part of the buffer is visible and
//! follows the cursor as it moves.

use std::ops::Range;

/// Manages the visible portion of the buffer.
///
/// The viewport tracks:
/// - Text area dimensions (width, height)
/// - Row offset (first visible line)
/// - Column offset (first visible render column)
///
/// # Example
///
/// ```
/// use kilo::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 22);
/// vp.scroll_to(30, 0);
/// assert_eq!(vp.row_offset(), 9);
/// assert_eq!(vp.visible_range(100), 9..31);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    row_offset: usize,
    col_offset: usize,
}

impl Viewport {
    /// Create a new viewport.
    ///
    /// # Arguments
    ///
    /// * `width` - Terminal width in columns
    /// * `height` - Rows available for buffer text
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            row_offset: 0,
            col_offset: 0,
        }
    }

    /// First visible line.
    pub const fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// First visible render column.
    pub const fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// Get the viewport width.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the viewport height.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the range of visible lines, clamped to the buffer length.
    pub fn visible_range(&self, total_lines: usize) -> Range<usize> {
        let start = self.row_offset.min(total_lines);
        let end = (self.row_offset + self.height as usize).min(total_lines);
        start..end
    }

    /// Adjust offsets so the cursor at (`line`, render column `rx`) is
    /// inside the visible area. The cursor itself is never touched.
    pub fn scroll_to(&mut self, line: usize, rx: usize) {
        let rows = usize::from(self.height.max(1));
        let cols = usize::from(self.width.max(1));

        if line < self.row_offset {
            self.row_offset = line;
        }
        if line >= self.row_offset + rows {
            self.row_offset = line + 1 - rows;
        }
        if rx < self.col_offset {
            self.col_offset = rx;
        }
        if rx >= self.col_offset + cols {
            self.col_offset = rx + 1 - cols;
        }
    }

    /// Put `line` at the top of the viewport.
    pub const fn reveal_line(&mut self, line: usize) {
        self.row_offset = line;
    }

    /// Set both offsets, e.g. when restoring a saved position.
    pub const fn set_offsets(&mut self, row_offset: usize, col_offset: usize) {
        self.row_offset = row_offset;
        self.col_offset = col_offset;
    }

    /// Resize the viewport. Offsets are fixed up on the next
    /// [`Viewport::scroll_to`].
    pub const fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }
}
