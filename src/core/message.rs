use chrono::{DateTime, Local};
use ratatui::text::{Line, Text};
use serde::{Deserialize, Serialize};

use crate::core::image::CellImage;

/// A geographic coordinate carried by location messages. Pixel production
/// for these is delegated to the map-snapshot collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Payload kind of a single message. Exactly one case is active per
/// message; consumers match exhaustively so a new kind cannot silently
/// fall into a default branch.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(String),
    AttributedText(Text<'static>),
    Emoji(String),
    Photo(CellImage),
    Video { url: String, thumbnail: CellImage },
    Location(Coordinate),
}

impl MessageContent {
    pub fn kind_str(&self) -> &'static str {
        match self {
            MessageContent::Text(_) => "text",
            MessageContent::AttributedText(_) => "attributed-text",
            MessageContent::Emoji(_) => "emoji",
            MessageContent::Photo(_) => "photo",
            MessageContent::Video { .. } => "video",
            MessageContent::Location(_) => "location",
        }
    }

    /// True for the three variants rendered through the content label.
    pub fn is_text_like(&self) -> bool {
        matches!(
            self,
            MessageContent::Text(_) | MessageContent::AttributedText(_) | MessageContent::Emoji(_)
        )
    }

    /// True for the three variants rendered through the media region.
    pub fn is_media(&self) -> bool {
        !self.is_text_like()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub sender: String,
    pub content: MessageContent,
    pub sent_at: DateTime<Local>,
}

impl Message {
    pub fn new(sender: impl Into<String>, content: MessageContent) -> Self {
        Self {
            sender: sender.into(),
            content,
            sent_at: Local::now(),
        }
    }

    pub fn with_timestamp(
        sender: impl Into<String>,
        content: MessageContent,
        sent_at: DateTime<Local>,
    ) -> Self {
        Self {
            sender: sender.into(),
            content,
            sent_at,
        }
    }

    /// Sender name as accessory-label text.
    pub fn sender_label(&self) -> Line<'static> {
        Line::from(self.sender.clone())
    }

    /// Send time as accessory-label text (hour:minute).
    pub fn timestamp_label(&self) -> Line<'static> {
        Line::from(self.sent_at.format("%H:%M").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_like_and_media_partition_all_kinds() {
        let thumb = CellImage::from_rows(&["#"]);
        let cases = [
            (MessageContent::Text("hi".into()), true),
            (MessageContent::AttributedText(Text::from("hi")), true),
            (MessageContent::Emoji("🎉".into()), true),
            (MessageContent::Photo(thumb.clone()), false),
            (
                MessageContent::Video {
                    url: "file:///clip".into(),
                    thumbnail: thumb,
                },
                false,
            ),
            (MessageContent::Location(Coordinate::new(48.86, 2.35)), false),
        ];
        for (content, text_like) in cases {
            assert_eq!(content.is_text_like(), text_like, "{}", content.kind_str());
            assert_eq!(content.is_media(), !text_like, "{}", content.kind_str());
        }
    }

    #[test]
    fn timestamp_label_formats_hour_minute() {
        let sent_at = Local::now();
        let message = Message::with_timestamp(
            "Ada",
            MessageContent::Text("hi".into()),
            sent_at,
        );
        assert_eq!(
            message.timestamp_label(),
            Line::from(sent_at.format("%H:%M").to_string())
        );
    }
}
