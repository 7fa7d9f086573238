use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::core::image::CellImage;

/// Avatar value: either prepared cell art or initials over a colored
/// backdrop.
#[derive(Debug, Clone, PartialEq)]
pub enum Avatar {
    Image(CellImage),
    Initials {
        initials: String,
        fg: Color,
        bg: Color,
    },
}

impl Avatar {
    /// Initials avatar derived from a sender name: the first grapheme of
    /// each of the first two words, uppercased. Falls back to "?" for
    /// names with no word content.
    pub fn from_sender(name: &str, fg: Color, bg: Color) -> Self {
        let initials: String = name
            .unicode_words()
            .take(2)
            .filter_map(|word| word.graphemes(true).next())
            .collect::<String>()
            .to_uppercase();
        let initials = if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        };
        Avatar::Initials { initials, fg, bg }
    }
}

/// Renders an [`Avatar`] into its frame; the core observes no return
/// value from it.
#[derive(Debug, Clone, Default)]
pub struct AvatarView {
    avatar: Option<Avatar>,
}

impl AvatarView {
    pub fn set(&mut self, avatar: Avatar) {
        self.avatar = Some(avatar);
    }

    pub fn avatar(&self) -> Option<&Avatar> {
        self.avatar.as_ref()
    }

    pub fn clear(&mut self) {
        self.avatar = None;
    }

    pub fn render(&self, frame: Rect, buf: &mut Buffer) {
        if frame.width == 0 || frame.height == 0 {
            return;
        }
        match &self.avatar {
            None => {}
            Some(Avatar::Image(image)) => {
                image.render(buf, Position::new(frame.x, frame.y), frame, Style::default());
            }
            Some(Avatar::Initials { initials, fg, bg }) => {
                for y in frame.top()..frame.bottom() {
                    for x in frame.left()..frame.right() {
                        if let Some(cell) = buf.cell_mut((x, y)) {
                            cell.set_bg(*bg);
                        }
                    }
                }
                let width = UnicodeWidthStr::width(initials.as_str()) as u16;
                let x = frame.x + frame.width.saturating_sub(width) / 2;
                let y = frame.y + frame.height / 2;
                let style = Style::default().fg(*fg).bg(*bg).add_modifier(Modifier::BOLD);
                buf.set_stringn(x, y, initials, usize::from(frame.width), style);
            }
        }
    }
}
