//! Message-style variants and the deterministic (style, bounds) → paint
//! mapping for the content container.
//!
//! Terminal vocabulary for the classic bubble treatment: the *mask* is a
//! boolean [`Stencil`] deciding which cells of the container get the
//! background color, the *fill* is a [`GlyphSheet`] of box-drawing
//! characters forming the outline stroke, and the *tint* is the color the
//! stroke is drawn with.

use std::fmt;
use std::rc::Rc;

use ratatui::layout::{Margin, Rect};
use ratatui::style::Color;

use crate::ui::container::MessageContainer;

/// Which corner of the bubble the speech tail points toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Visual shape of the message content container.
///
/// Every variant except `Custom` is pure data and renders through
/// [`paint`]; `Custom` carries a configuration closure the container
/// engine applies after clearing the engine-computed paint state, so it
/// can override mask/fill/tint unconditionally.
#[derive(Clone, Default)]
pub enum MessageStyle {
    #[default]
    None,
    Bubble,
    BubbleTail(TailCorner),
    BubbleOutline(Color),
    BubbleTailOutline(Color, TailCorner),
    Custom(Rc<dyn Fn(&mut MessageContainer)>),
}

impl fmt::Debug for MessageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStyle::None => write!(f, "None"),
            MessageStyle::Bubble => write!(f, "Bubble"),
            MessageStyle::BubbleTail(tail) => write!(f, "BubbleTail({tail:?})"),
            MessageStyle::BubbleOutline(color) => write!(f, "BubbleOutline({color:?})"),
            MessageStyle::BubbleTailOutline(color, tail) => {
                write!(f, "BubbleTailOutline({color:?}, {tail:?})")
            }
            MessageStyle::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl PartialEq for MessageStyle {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MessageStyle::None, MessageStyle::None) => true,
            (MessageStyle::Bubble, MessageStyle::Bubble) => true,
            (MessageStyle::BubbleTail(a), MessageStyle::BubbleTail(b)) => a == b,
            (MessageStyle::BubbleOutline(a), MessageStyle::BubbleOutline(b)) => a == b,
            (MessageStyle::BubbleTailOutline(a, ta), MessageStyle::BubbleTailOutline(b, tb)) => {
                a == b && ta == tb
            }
            (MessageStyle::Custom(a), MessageStyle::Custom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Boolean silhouette of the content container. `bubble` cuts the four
/// corner cells of the rectangle; `bubble_tail` keeps the tail corner
/// square so it reads as the speech tail. The stencil carries no color of
/// its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stencil {
    width: u16,
    height: u16,
    bits: Vec<bool>,
}

impl Stencil {
    fn filled(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            bits: vec![true; usize::from(width) * usize::from(height)],
        }
    }

    fn cut(&mut self, x: u16, y: u16) {
        if x < self.width && y < self.height {
            let index = usize::from(y) * usize::from(self.width) + usize::from(x);
            self.bits[index] = false;
        }
    }

    pub fn bubble(width: u16, height: u16) -> Self {
        let mut stencil = Self::filled(width, height);
        if width >= 2 && height >= 2 {
            for (x, y) in corner_cells(width, height) {
                stencil.cut(x, y);
            }
        }
        stencil
    }

    pub fn bubble_tail(width: u16, height: u16, tail: TailCorner) -> Self {
        let mut stencil = Self::filled(width, height);
        if width >= 2 && height >= 2 {
            let keep = corner_cell(width, height, tail);
            for (x, y) in corner_cells(width, height) {
                if (x, y) != keep {
                    stencil.cut(x, y);
                }
            }
        }
        stencil
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Whether the cell at stencil-local `(x, y)` is inside the silhouette.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }
}

fn corner_cells(width: u16, height: u16) -> [(u16, u16); 4] {
    [
        (0, 0),
        (width - 1, 0),
        (0, height - 1),
        (width - 1, height - 1),
    ]
}

fn corner_cell(width: u16, height: u16, corner: TailCorner) -> (u16, u16) {
    match corner {
        TailCorner::TopLeft => (0, 0),
        TailCorner::TopRight => (width - 1, 0),
        TailCorner::BottomLeft => (0, height - 1),
        TailCorner::BottomRight => (width - 1, height - 1),
    }
}

/// Glyph-art image for the outline stroke: a ring of box-drawing
/// characters with rounded corners, except a square corner where the tail
/// sits. Spaces are transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSheet {
    width: u16,
    height: u16,
    glyphs: Vec<char>,
}

impl GlyphSheet {
    pub fn bubble_outline(width: u16, height: u16) -> Self {
        Self::outline(width, height, None)
    }

    pub fn bubble_tail_outline(width: u16, height: u16, tail: TailCorner) -> Self {
        Self::outline(width, height, Some(tail))
    }

    fn outline(width: u16, height: u16, tail: Option<TailCorner>) -> Self {
        let w = usize::from(width);
        let h = usize::from(height);
        let mut glyphs = vec![' '; w * h];
        if width == 0 || height == 0 {
            return Self {
                width,
                height,
                glyphs,
            };
        }
        if height == 1 {
            glyphs.iter_mut().for_each(|g| *g = '─');
            return Self {
                width,
                height,
                glyphs,
            };
        }
        if width == 1 {
            glyphs.iter_mut().for_each(|g| *g = '│');
            return Self {
                width,
                height,
                glyphs,
            };
        }
        for x in 1..w - 1 {
            glyphs[x] = '─';
            glyphs[(h - 1) * w + x] = '─';
        }
        for y in 1..h - 1 {
            glyphs[y * w] = '│';
            glyphs[y * w + w - 1] = '│';
        }
        let corners = [
            (TailCorner::TopLeft, 0, '╭', '┌'),
            (TailCorner::TopRight, w - 1, '╮', '┐'),
            (TailCorner::BottomLeft, (h - 1) * w, '╰', '└'),
            (TailCorner::BottomRight, (h - 1) * w + w - 1, '╯', '┘'),
        ];
        for (corner, index, rounded, square) in corners {
            glyphs[index] = if tail == Some(corner) { square } else { rounded };
        }
        Self {
            width,
            height,
            glyphs,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Glyph at sheet-local `(x, y)`, or `None` for transparent cells.
    pub fn glyph(&self, x: u16, y: u16) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let ch = self.glyphs[usize::from(y) * usize::from(self.width) + usize::from(x)];
        (ch != ' ').then_some(ch)
    }
}

/// Mask layer: a stencil positioned within the container's local bounds.
/// Outline styles inset the frame by one cell so the stroke stays visible.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskLayer {
    pub stencil: Stencil,
    pub frame: Rect,
}

/// Paint state for the content container, recomputed whenever style or
/// bounds change.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub mask: Option<MaskLayer>,
    pub fill: Option<GlyphSheet>,
    pub tint: Option<Color>,
}

impl Paint {
    pub fn cleared() -> Self {
        Self {
            mask: None,
            fill: None,
            tint: None,
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::cleared()
    }
}

/// Map a style and the container's local bounds to paint state.
///
/// Pure and idempotent for every variant except `Custom`, which maps to
/// the cleared state here; the container engine then runs the carried
/// closure as a side effect.
pub fn paint(style: &MessageStyle, bounds: Rect) -> Paint {
    match style {
        MessageStyle::None | MessageStyle::Custom(_) => Paint::cleared(),
        MessageStyle::Bubble => Paint {
            mask: Some(MaskLayer {
                stencil: Stencil::bubble(bounds.width, bounds.height),
                frame: bounds,
            }),
            fill: None,
            tint: None,
        },
        MessageStyle::BubbleTail(tail) => Paint {
            mask: Some(MaskLayer {
                stencil: Stencil::bubble_tail(bounds.width, bounds.height, *tail),
                frame: bounds,
            }),
            fill: None,
            tint: None,
        },
        MessageStyle::BubbleOutline(color) => {
            let inner = bounds.inner(Margin::new(1, 1));
            Paint {
                mask: Some(MaskLayer {
                    stencil: Stencil::bubble(inner.width, inner.height),
                    frame: inner,
                }),
                fill: Some(GlyphSheet::bubble_outline(bounds.width, bounds.height)),
                tint: Some(*color),
            }
        }
        MessageStyle::BubbleTailOutline(color, tail) => {
            let inner = bounds.inner(Margin::new(1, 1));
            // The stencil is colorless, so the tint alone decides the
            // perceived stroke color.
            Paint {
                mask: Some(MaskLayer {
                    stencil: Stencil::bubble_tail(inner.width, inner.height, *tail),
                    frame: inner,
                }),
                fill: Some(GlyphSheet::bubble_tail_outline(bounds.width, bounds.height, *tail)),
                tint: Some(*color),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect {
        x: 0,
        y: 0,
        width: 12,
        height: 5,
    };

    #[test]
    fn paint_is_pure_for_static_styles() {
        let styles = [
            MessageStyle::None,
            MessageStyle::Bubble,
            MessageStyle::BubbleTail(TailCorner::BottomRight),
            MessageStyle::BubbleOutline(Color::Cyan),
            MessageStyle::BubbleTailOutline(Color::Magenta, TailCorner::TopLeft),
        ];
        for style in &styles {
            assert_eq!(paint(style, BOUNDS), paint(style, BOUNDS), "{style:?}");
        }
    }

    #[test]
    fn none_clears_mask_fill_and_tint() {
        assert_eq!(paint(&MessageStyle::None, BOUNDS), Paint::cleared());
    }

    #[test]
    fn bubble_masks_to_bounds_without_fill_or_tint() {
        let painted = paint(&MessageStyle::Bubble, BOUNDS);
        let mask = painted.mask.expect("bubble paints a mask");
        assert_eq!(mask.frame, BOUNDS);
        assert_eq!(mask.stencil.width(), BOUNDS.width);
        assert_eq!(mask.stencil.height(), BOUNDS.height);
        assert!(painted.fill.is_none());
        assert!(painted.tint.is_none());
    }

    #[test]
    fn bubble_stencil_cuts_all_four_corners() {
        let stencil = Stencil::bubble(12, 5);
        assert!(!stencil.contains(0, 0));
        assert!(!stencil.contains(11, 0));
        assert!(!stencil.contains(0, 4));
        assert!(!stencil.contains(11, 4));
        assert!(stencil.contains(1, 0));
        assert!(stencil.contains(5, 2));
    }

    #[test]
    fn tail_stencil_keeps_only_the_tail_corner() {
        let cases = [
            (TailCorner::TopLeft, (0, 0)),
            (TailCorner::TopRight, (11, 0)),
            (TailCorner::BottomLeft, (0, 4)),
            (TailCorner::BottomRight, (11, 4)),
        ];
        for (tail, kept) in cases {
            let stencil = Stencil::bubble_tail(12, 5, tail);
            for (x, y) in [(0, 0), (11, 0), (0, 4), (11, 4)] {
                assert_eq!(stencil.contains(x, y), (x, y) == kept, "{tail:?}");
            }
        }
    }

    #[test]
    fn outline_tint_matches_input_color_exactly() {
        for style in [
            MessageStyle::BubbleOutline(Color::Rgb(12, 200, 7)),
            MessageStyle::BubbleTailOutline(Color::Rgb(12, 200, 7), TailCorner::BottomLeft),
        ] {
            assert_eq!(paint(&style, BOUNDS).tint, Some(Color::Rgb(12, 200, 7)));
        }
    }

    #[test]
    fn outline_mask_is_inset_one_cell_per_side() {
        let painted = paint(&MessageStyle::BubbleOutline(Color::Blue), BOUNDS);
        let mask = painted.mask.expect("outline paints a mask");
        assert_eq!(mask.frame, Rect::new(1, 1, 10, 3));
        assert_eq!(mask.stencil.width(), 10);
        assert_eq!(mask.stencil.height(), 3);
        assert!(painted.fill.is_some());
    }

    #[test]
    fn outline_sheet_squares_the_tail_corner() {
        let sheet = GlyphSheet::bubble_tail_outline(12, 5, TailCorner::BottomRight);
        assert_eq!(sheet.glyph(0, 0), Some('╭'));
        assert_eq!(sheet.glyph(11, 0), Some('╮'));
        assert_eq!(sheet.glyph(0, 4), Some('╰'));
        assert_eq!(sheet.glyph(11, 4), Some('┘'));
        assert_eq!(sheet.glyph(5, 0), Some('─'));
        assert_eq!(sheet.glyph(0, 2), Some('│'));
        assert_eq!(sheet.glyph(5, 2), None);
    }

    #[test]
    fn custom_maps_to_cleared_paint() {
        let style = MessageStyle::Custom(Rc::new(|_container: &mut MessageContainer| {}));
        assert_eq!(paint(&style, BOUNDS), Paint::cleared());
    }

    #[test]
    fn degenerate_outline_sheets_do_not_panic() {
        assert_eq!(GlyphSheet::bubble_outline(0, 0).glyph(0, 0), None);
        assert_eq!(GlyphSheet::bubble_outline(4, 1).glyph(2, 0), Some('─'));
        assert_eq!(GlyphSheet::bubble_outline(1, 4).glyph(0, 2), Some('│'));
    }
}
