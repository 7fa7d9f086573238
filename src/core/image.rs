use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// A rectangular grid of terminal glyphs used as image data: photo
/// payloads, video thumbnails, map snapshots, and annotation overlays.
///
/// Rows are plain strings; a space is transparent when the image is drawn
/// or composited, so underlying content shows through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellImage {
    rows: Vec<String>,
}

impl CellImage {
    pub fn new(rows: Vec<String>) -> Self {
        Self { rows }
    }

    pub fn from_rows(rows: &[&str]) -> Self {
        Self {
            rows: rows.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Display width in cells (widest row).
    pub fn width(&self) -> u16 {
        self.rows
            .iter()
            .map(|r| UnicodeWidthStr::width(r.as_str()))
            .max()
            .unwrap_or(0) as u16
    }

    pub fn height(&self) -> u16 {
        self.rows.len() as u16
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Draw the image into the buffer with its top-left corner at `origin`,
    /// clipped to `clip`. Spaces are transparent.
    pub fn render(&self, buf: &mut Buffer, origin: Position, clip: Rect, style: Style) {
        for (dy, row) in self.rows.iter().enumerate() {
            let y = origin.y.saturating_add(dy as u16);
            let mut x = origin.x;
            for ch in row.chars() {
                let position = Position::new(x, y);
                if ch != ' ' && clip.contains(position) {
                    if let Some(cell) = buf.cell_mut(position) {
                        cell.set_char(ch).set_style(style);
                    }
                }
                x = x.saturating_add(1);
            }
        }
    }

    /// Composite `overlay` onto this image with its top-left corner at
    /// `(x, y)` (may be negative; out-of-range cells are clipped). Spaces
    /// in the overlay leave the underlying glyph untouched.
    pub fn composite(&mut self, overlay: &CellImage, x: i32, y: i32) {
        let width = self.width() as i32;
        let mut grid: Vec<Vec<char>> = self
            .rows
            .iter()
            .map(|row| {
                let mut chars: Vec<char> = row.chars().collect();
                chars.resize(width as usize, ' ');
                chars
            })
            .collect();

        for (dy, row) in overlay.rows.iter().enumerate() {
            let ty = y + dy as i32;
            if ty < 0 || ty >= grid.len() as i32 {
                continue;
            }
            for (dx, ch) in row.chars().enumerate() {
                let tx = x + dx as i32;
                if ch == ' ' || tx < 0 || tx >= width {
                    continue;
                }
                grid[ty as usize][tx as usize] = ch;
            }
        }

        self.rows = grid.into_iter().map(|chars| chars.into_iter().collect()).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_follow_widest_row() {
        let image = CellImage::from_rows(&["##", "####", "#"]);
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 3);
    }

    #[test]
    fn composite_places_overlay_at_offset() {
        let mut base = CellImage::from_rows(&["....", "....", "...."]);
        let overlay = CellImage::from_rows(&["ab"]);
        base.composite(&overlay, 1, 1);
        assert_eq!(base.rows()[1], ".ab.");
    }

    #[test]
    fn composite_clips_negative_and_overflowing_offsets() {
        let mut base = CellImage::from_rows(&["....", "...."]);
        let overlay = CellImage::from_rows(&["xy", "zw"]);
        base.composite(&overlay, -1, -1);
        assert_eq!(base.rows()[0], "w...");
        let mut base = CellImage::from_rows(&["....", "...."]);
        base.composite(&overlay, 3, 1);
        assert_eq!(base.rows()[1], "...x");
    }

    #[test]
    fn composite_treats_spaces_as_transparent() {
        let mut base = CellImage::from_rows(&["....", "...."]);
        let overlay = CellImage::from_rows(&["a b"]);
        base.composite(&overlay, 0, 0);
        assert_eq!(base.rows()[0], "a.b.");
    }

    #[test]
    fn render_skips_spaces_and_respects_clip() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        let image = CellImage::from_rows(&["a b", "cdef"]);
        image.render(&mut buf, Position::new(0, 0), Rect::new(0, 0, 3, 2), Style::default());
        assert_eq!(buf[(0, 0)].symbol(), "a");
        assert_eq!(buf[(1, 0)].symbol(), " ");
        assert_eq!(buf[(2, 0)].symbol(), "b");
        // Column 3 is outside the clip rect.
        assert_eq!(buf[(3, 1)].symbol(), " ");
    }
}
