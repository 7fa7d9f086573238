use ratatui::buffer::Buffer;
use ratatui::layout::{Offset, Position, Rect};
use ratatui::style::{Color, Style};
use tracing::debug;

use crate::core::message::{Message, MessageContent};
use crate::ui::label::MessageLabel;
use crate::ui::media::MediaView;
use crate::ui::style::{paint, MessageStyle, Paint};

/// The message content container: owns the geometry-to-paint mapping for
/// the current style and the visible sub-regions (content label and media
/// region) configured from a message value.
///
/// Paint state is recomputed on every style or frame assignment, before
/// the next render; the mapping is idempotent, so re-applying unchanged
/// inputs leaves the state untouched.
#[derive(Debug)]
pub struct MessageContainer {
    style: MessageStyle,
    frame: Rect,
    background: Color,
    paint: Paint,
    pub label: MessageLabel,
    pub media: MediaView,
}

impl Default for MessageContainer {
    fn default() -> Self {
        Self {
            style: MessageStyle::None,
            frame: Rect::default(),
            background: Color::Reset,
            paint: Paint::cleared(),
            label: MessageLabel::default(),
            media: MediaView::default(),
        }
    }
}

impl MessageContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_style(&mut self, style: MessageStyle) {
        self.style = style;
        self.apply_style();
    }

    pub fn style(&self) -> &MessageStyle {
        &self.style
    }

    /// Container frame in the cell's local coordinate space. Changing the
    /// frame re-runs the style mapping against the new bounds.
    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
        self.apply_style();
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    /// Replace the paint state wholesale. Intended for `Custom` style
    /// closures, which may override the engine-computed state.
    pub fn set_paint(&mut self, paint: Paint) {
        self.paint = paint;
    }

    fn apply_style(&mut self) {
        let bounds = Rect::new(0, 0, self.frame.width, self.frame.height);
        self.paint = paint(&self.style, bounds);
        if let MessageStyle::Custom(configure) = self.style.clone() {
            configure(self);
        }
        debug!(style = ?self.style, ?bounds, "applied container style");
    }

    /// Show or hide the label and media sub-regions for the message's
    /// content kind. Visibility and data are orthogonal; both are applied
    /// whenever the message value changes.
    pub fn configure_visible_views(&mut self, message: &Message) {
        match message.content {
            MessageContent::Text(_)
            | MessageContent::AttributedText(_)
            | MessageContent::Emoji(_) => self.label.set_visible(true),
            MessageContent::Photo(_)
            | MessageContent::Video { .. }
            | MessageContent::Location(_) => self.label.set_visible(false),
        }
        self.media.configure_visibility(&message.content);
    }

    /// Write the message payload into exactly one sub-region. Location
    /// messages carry no pixels here; the map-snapshot collaborator fills
    /// the media region asynchronously.
    pub fn configure_data(&mut self, message: &Message) {
        match &message.content {
            MessageContent::Text(text) | MessageContent::Emoji(text) => {
                self.label.set_text(text.clone());
            }
            MessageContent::AttributedText(text) => {
                self.label.set_rich_text(text.clone());
            }
            MessageContent::Photo(image) => {
                self.media.set_image(image.clone());
            }
            MessageContent::Video { thumbnail, .. } => {
                self.media.set_image(thumbnail.clone());
            }
            MessageContent::Location(_) => {}
        }
    }

    fn masked_in(&self, x: u16, y: u16) -> bool {
        match &self.paint.mask {
            None => true,
            Some(layer) => {
                layer.frame.contains(Position::new(x, y))
                    && layer
                        .stencil
                        .contains(x - layer.frame.x, y - layer.frame.y)
            }
        }
    }

    /// Draw the container into `buf`, with the cell's own origin at
    /// `origin` (frames are cell-local).
    pub fn render(&self, origin: Position, buf: &mut Buffer) {
        let absolute = self.frame.offset(Offset {
            x: i32::from(origin.x),
            y: i32::from(origin.y),
        });
        for y in 0..self.frame.height {
            for x in 0..self.frame.width {
                if !self.masked_in(x, y) {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((absolute.x + x, absolute.y + y)) {
                    cell.set_bg(self.background);
                }
            }
        }
        if let Some(sheet) = &self.paint.fill {
            for y in 0..sheet.height() {
                for x in 0..sheet.width() {
                    let Some(glyph) = sheet.glyph(x, y) else {
                        continue;
                    };
                    if let Some(cell) = buf.cell_mut((absolute.x + x, absolute.y + y)) {
                        cell.set_char(glyph);
                        if let Some(tint) = self.paint.tint {
                            cell.set_fg(tint);
                        }
                    }
                }
            }
        }
        if self.label.is_visible() {
            self.label.render(absolute, buf);
        }
        if self.media.is_visible() {
            // The mask layer frame is container-local; lift it into the
            // same absolute space as the container itself.
            let media_area = match &self.paint.mask {
                Some(layer) => layer.frame.offset(Offset {
                    x: i32::from(origin.x) + i32::from(self.frame.x),
                    y: i32::from(origin.y) + i32::from(self.frame.y),
                }),
                None => absolute,
            };
            self.media.render(media_area, buf, Style::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::image::CellImage;
    use crate::core::message::Coordinate;
    use crate::ui::style::TailCorner;
    use std::cell::Cell as StdCell;
    use std::rc::Rc;

    fn photo_message() -> Message {
        Message::new("Ada", MessageContent::Photo(CellImage::from_rows(&["##", "##"])))
    }

    #[test]
    fn photo_with_bubble_style_scenario() {
        let mut container = MessageContainer::new();
        container.set_frame(Rect::new(4, 0, 16, 4));
        container.set_style(MessageStyle::Bubble);
        let message = photo_message();
        container.configure_visible_views(&message);
        container.configure_data(&message);

        assert!(container.media.is_visible());
        assert!(!container.media.is_play_visible());
        assert!(!container.label.is_visible());
        let mask = container.paint().mask.as_ref().expect("bubble mask");
        assert_eq!(mask.frame, Rect::new(0, 0, 16, 4));
        assert!(container.paint().fill.is_none());
        assert!(container.paint().tint.is_none());
        assert!(container.media.image().is_some());
    }

    #[test]
    fn plain_text_with_no_style_scenario() {
        let mut container = MessageContainer::new();
        container.set_frame(Rect::new(0, 0, 10, 3));
        container.set_style(MessageStyle::None);
        let message = Message::new("Ada", MessageContent::Text("hi".into()));
        container.configure_visible_views(&message);
        container.configure_data(&message);

        assert_eq!(container.label.text(), Some("hi"));
        assert!(container.label.is_visible());
        assert!(!container.media.is_visible());
        assert_eq!(*container.paint(), Paint::cleared());
    }

    #[test]
    fn reapplying_unchanged_inputs_is_idempotent() {
        let mut container = MessageContainer::new();
        container.set_frame(Rect::new(0, 0, 14, 4));
        container.set_style(MessageStyle::BubbleOutline(Color::Cyan));
        let first = container.paint().clone();
        container.set_style(MessageStyle::BubbleOutline(Color::Cyan));
        container.set_frame(Rect::new(0, 0, 14, 4));
        assert_eq!(*container.paint(), first);
    }

    #[test]
    fn frame_changes_recompute_the_mask() {
        let mut container = MessageContainer::new();
        container.set_style(MessageStyle::BubbleTail(TailCorner::BottomRight));
        container.set_frame(Rect::new(0, 0, 8, 3));
        let small = container.paint().mask.as_ref().unwrap().stencil.width();
        container.set_frame(Rect::new(0, 0, 20, 3));
        let wide = container.paint().mask.as_ref().unwrap().stencil.width();
        assert_eq!((small, wide), (8, 20));
    }

    #[test]
    fn custom_style_clears_paint_then_runs_the_closure() {
        let observed_cleared = Rc::new(StdCell::new(false));
        let seen = observed_cleared.clone();
        let style = MessageStyle::Custom(Rc::new(move |container: &mut MessageContainer| {
            seen.set(*container.paint() == Paint::cleared());
            let mut paint = Paint::cleared();
            paint.tint = Some(Color::Yellow);
            container.set_paint(paint);
        }));
        let mut container = MessageContainer::new();
        container.set_frame(Rect::new(0, 0, 10, 3));
        container.set_style(style);
        assert!(observed_cleared.get(), "closure must see cleared paint state");
        assert_eq!(container.paint().tint, Some(Color::Yellow));
    }

    #[test]
    fn data_configuration_does_not_touch_visibility() {
        let mut container = MessageContainer::new();
        container.configure_data(&photo_message());
        // Visibility still at defaults; only the data slot changed.
        assert!(!container.media.is_visible());
        assert!(container.label.is_visible());
        assert!(container.media.image().is_some());
    }

    #[test]
    fn location_data_writes_no_pixels() {
        let mut container = MessageContainer::new();
        let message = Message::new(
            "Ada",
            MessageContent::Location(Coordinate::new(48.86, 2.35)),
        );
        container.configure_data(&message);
        assert!(container.media.image().is_none());
        assert!(container.label.text().is_none());
    }

    #[test]
    fn render_paints_background_only_inside_the_mask() {
        let area = Rect::new(0, 0, 12, 4);
        let mut buf = Buffer::empty(area);
        let mut container = MessageContainer::new();
        container.set_background(Color::Blue);
        container.set_frame(Rect::new(0, 0, 12, 4));
        container.set_style(MessageStyle::Bubble);
        container.render(Position::new(0, 0), &mut buf);
        // Corner cells are cut from the silhouette.
        assert_ne!(buf[(0, 0)].style().bg, Some(Color::Blue));
        assert_eq!(buf[(1, 0)].style().bg, Some(Color::Blue));
        assert_eq!(buf[(5, 2)].style().bg, Some(Color::Blue));
    }

    #[test]
    fn render_draws_tinted_outline_glyphs() {
        let area = Rect::new(0, 0, 12, 4);
        let mut buf = Buffer::empty(area);
        let mut container = MessageContainer::new();
        container.set_frame(Rect::new(0, 0, 12, 4));
        container.set_style(MessageStyle::BubbleOutline(Color::Magenta));
        container.render(Position::new(0, 0), &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "╭");
        assert_eq!(buf[(0, 0)].style().fg, Some(Color::Magenta));
    }
}
