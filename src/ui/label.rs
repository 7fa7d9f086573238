use std::rc::Weak;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Text};

use crate::ui::cell::MessageCellDelegate;

/// Edge insets applied to the content label inside the container frame,
/// in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelInsets {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl LabelInsets {
    pub fn new(left: u16, top: u16, right: u16, bottom: u16) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn uniform(inset: u16) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    /// Shrink `frame` by the insets, saturating to an empty rect.
    pub fn apply(self, frame: Rect) -> Rect {
        let width = frame.width.saturating_sub(self.left + self.right);
        let height = frame.height.saturating_sub(self.top + self.bottom);
        Rect::new(
            frame.x.saturating_add(self.left),
            frame.y.saturating_add(self.top),
            width,
            height,
        )
    }
}

/// The content label: plain or rich text rendered inside the container.
///
/// Setting one text form clears the other, so exactly one payload is ever
/// active. The delegate is a non-owning handle used by embedded
/// interactive spans; the cell wires it only for text-like content.
#[derive(Debug)]
pub struct MessageLabel {
    text: Option<String>,
    rich_text: Option<Text<'static>>,
    style: Style,
    insets: LabelInsets,
    visible: bool,
    delegate: Option<Weak<dyn MessageCellDelegate>>,
}

impl Default for MessageLabel {
    fn default() -> Self {
        Self {
            text: None,
            rich_text: None,
            style: Style::default(),
            insets: LabelInsets::default(),
            visible: true,
            delegate: None,
        }
    }
}

impl MessageLabel {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
        self.rich_text = None;
    }

    pub fn set_rich_text(&mut self, text: Text<'static>) {
        self.rich_text = Some(text);
        self.text = None;
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn rich_text(&self) -> Option<&Text<'static>> {
        self.rich_text.as_ref()
    }

    pub fn clear(&mut self) {
        self.text = None;
        self.rich_text = None;
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn set_insets(&mut self, insets: LabelInsets) {
        self.insets = insets;
    }

    pub fn insets(&self) -> LabelInsets {
        self.insets
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_delegate(&mut self, delegate: Weak<dyn MessageCellDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    /// Whether a live delegate is wired for interactive spans.
    pub fn has_delegate(&self) -> bool {
        self.delegate
            .as_ref()
            .is_some_and(|delegate| delegate.upgrade().is_some())
    }

    pub fn render(&self, frame: Rect, buf: &mut Buffer) {
        if !self.visible {
            return;
        }
        let area = self.insets.apply(frame);
        if area.width == 0 || area.height == 0 {
            return;
        }
        if let Some(rich) = &self.rich_text {
            for (row, line) in rich.lines.iter().enumerate().take(usize::from(area.height)) {
                buf.set_line(area.x, area.y + row as u16, line, area.width);
            }
        } else if let Some(text) = &self.text {
            for (row, line) in text.lines().enumerate().take(usize::from(area.height)) {
                buf.set_stringn(
                    area.x,
                    area.y + row as u16,
                    line,
                    usize::from(area.width),
                    self.style,
                );
            }
        }
    }
}

/// A top/bottom metadata label. Plain and rich text are independent slots
/// the host may use; recycling clears both together so no partial clear is
/// ever observable.
#[derive(Debug, Clone, Default)]
pub struct AccessoryLabel {
    text: Option<String>,
    rich_text: Option<Line<'static>>,
    style: Style,
}

impl AccessoryLabel {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn set_rich_text(&mut self, line: Line<'static>) {
        self.rich_text = Some(line);
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn rich_text(&self) -> Option<&Line<'static>> {
        self.rich_text.as_ref()
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn clear(&mut self) {
        self.text = None;
        self.rich_text = None;
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.rich_text.is_none()
    }

    pub fn render(&self, frame: Rect, buf: &mut Buffer) {
        if frame.width == 0 || frame.height == 0 {
            return;
        }
        if let Some(line) = &self.rich_text {
            buf.set_line(frame.x, frame.y, line, frame.width);
        } else if let Some(text) = &self.text {
            buf.set_stringn(frame.x, frame.y, text, usize::from(frame.width), self.style);
        }
    }
}
