use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;

use crate::core::image::CellImage;
use crate::core::message::MessageContent;

/// Glyph drawn over video thumbnails.
pub const PLAY_GLYPH: char = '▶';

const SPINNER_FRAMES: [char; 4] = ['⠋', '⠙', '⠸', '⠴'];

/// Static visibility decision for the media region, derived from the
/// content kind alone, independent of how the pixels are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaVisibility {
    pub media: bool,
    pub play: bool,
}

pub fn media_visibility(content: &MessageContent) -> MediaVisibility {
    match content {
        MessageContent::Video { .. } => MediaVisibility {
            media: true,
            play: true,
        },
        MessageContent::Photo(_) | MessageContent::Location(_) => MediaVisibility {
            media: true,
            play: false,
        },
        MessageContent::Text(_) | MessageContent::AttributedText(_) | MessageContent::Emoji(_) => {
            MediaVisibility {
                media: false,
                play: false,
            }
        }
    }
}

/// Media region of the content container: a still image or thumbnail, the
/// play affordance, and the busy indicator driven by the asynchronous
/// snapshot fetch.
#[derive(Debug, Clone, Default)]
pub struct MediaView {
    visible: bool,
    play_visible: bool,
    busy: bool,
    spinner_frame: usize,
    image: Option<CellImage>,
    generation: u64,
}

impl MediaView {
    /// Apply the static visibility table for `content`. The busy indicator
    /// is always forced hidden here; it belongs to the in-flight fetch,
    /// not to the content kind.
    pub fn configure_visibility(&mut self, content: &MessageContent) {
        let visibility = media_visibility(content);
        self.visible = visibility.media;
        self.play_visible = visibility.play;
        self.busy = false;
    }

    pub fn set_image(&mut self, image: CellImage) {
        self.image = Some(image);
    }

    pub fn image(&self) -> Option<&CellImage> {
        self.image.as_ref()
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_play_visible(&self) -> bool {
        self.play_visible
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Start the busy indicator and mint the generation token identifying
    /// the fetch about to be issued.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.busy = true;
        self.generation
    }

    /// Apply a fetch completion. A stale generation (the cell was
    /// reconfigured or recycled since the request went out) is dropped
    /// without touching any state; returns whether the outcome was applied.
    /// For the current generation the busy indicator stops on every path,
    /// image or not.
    pub fn finish_fetch(&mut self, generation: u64, image: Option<CellImage>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.busy = false;
        if let Some(image) = image {
            self.image = Some(image);
        }
        true
    }

    /// Advance the busy spinner one frame.
    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn render(&self, frame: Rect, buf: &mut Buffer, style: Style) {
        if !self.visible {
            return;
        }
        if let Some(image) = &self.image {
            image.render(buf, Position::new(frame.x, frame.y), frame, style);
        }
        let center = Position::new(frame.x + frame.width / 2, frame.y + frame.height / 2);
        if self.play_visible && frame.contains(center) {
            if let Some(cell) = buf.cell_mut(center) {
                cell.set_char(PLAY_GLYPH).set_style(style);
            }
        }
        if self.busy && frame.contains(center) {
            if let Some(cell) = buf.cell_mut(center) {
                cell.set_char(SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()])
                    .set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Coordinate;
    use ratatui::text::Text;

    fn thumb() -> CellImage {
        CellImage::from_rows(&["#"])
    }

    #[test]
    fn visibility_table_covers_all_six_kinds() {
        let cases = [
            (MessageContent::Video { url: "file:///clip".into(), thumbnail: thumb() }, true, true),
            (MessageContent::Photo(thumb()), true, false),
            (MessageContent::Location(Coordinate::new(0.0, 0.0)), true, false),
            (MessageContent::Text("hi".into()), false, false),
            (MessageContent::AttributedText(Text::from("hi")), false, false),
            (MessageContent::Emoji("🎉".into()), false, false),
        ];
        for (content, media, play) in cases {
            let visibility = media_visibility(&content);
            assert_eq!(visibility.media, media, "{}", content.kind_str());
            assert_eq!(visibility.play, play, "{}", content.kind_str());
        }
    }

    #[test]
    fn configuring_visibility_always_hides_busy() {
        let mut view = MediaView::default();
        view.begin_fetch();
        assert!(view.is_busy());
        view.configure_visibility(&MessageContent::Photo(thumb()));
        assert!(!view.is_busy());
    }

    #[test]
    fn finish_fetch_releases_busy_even_without_an_image() {
        let mut view = MediaView::default();
        let generation = view.begin_fetch();
        assert!(view.finish_fetch(generation, None));
        assert!(!view.is_busy());
        assert!(view.image().is_none());
    }

    #[test]
    fn stale_generation_outcomes_are_dropped() {
        let mut view = MediaView::default();
        let stale = view.begin_fetch();
        let current = view.begin_fetch();
        assert!(!view.finish_fetch(stale, Some(thumb())));
        assert!(view.is_busy(), "stale outcome must not touch the indicator");
        assert!(view.image().is_none());
        assert!(view.finish_fetch(current, Some(thumb())));
        assert!(!view.is_busy());
        assert!(view.image().is_some());
    }
}
