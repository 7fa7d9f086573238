//! Demo hosting list for burble message cells.
//!
//! Lays out a small conversation, renders one cell per message, routes
//! mouse taps through the cells, and drives an asynchronous fake map
//! provider for the location message. Run with `--theme light` for the
//! light palette or `--content-only` to demo the content-only routing
//! policy.

use std::cell::RefCell;
use std::error::Error;
use std::io;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Paragraph, Widget};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use burble::core::image::CellImage;
use burble::core::message::{Coordinate, Message, MessageContent};
use burble::core::snapshot::{
    Annotation, MapSnapshot, MapSnapshotProvider, SnapshotError, SnapshotOptions, SnapshotOutcome,
};
use burble::ui::avatar::Avatar;
use burble::ui::cell::{
    CellId, CellLayoutAttributes, MessageCell, MessageCellDelegate,
};
use burble::ui::hit::TapRoutingPolicy;
use burble::ui::label::LabelInsets;
use burble::ui::style::{MessageStyle, TailCorner};
use burble::ui::theme::CellTheme;

#[derive(Parser)]
#[command(name = "burble")]
#[command(about = "Chat message cell demo: bubbles, taps, and a fake map")]
struct Args {
    #[arg(long, default_value = "dark", help = "Color theme: dark or light")]
    theme: String,

    #[arg(long, help = "Route only message taps, ignoring avatar and labels")]
    content_only: bool,
}

/// Delegate that records the most recent tap for the status line.
#[derive(Default)]
struct TapLog {
    last: RefCell<String>,
}

impl MessageCellDelegate for TapLog {
    fn did_tap_message(&self, cell: CellId) {
        *self.last.borrow_mut() = format!("tapped message in cell {}", cell.0);
    }
    fn did_tap_avatar(&self, cell: CellId) {
        *self.last.borrow_mut() = format!("tapped avatar in cell {}", cell.0);
    }
    fn did_tap_top_label(&self, cell: CellId) {
        *self.last.borrow_mut() = format!("tapped top label in cell {}", cell.0);
    }
    fn did_tap_bottom_label(&self, cell: CellId) {
        *self.last.borrow_mut() = format!("tapped bottom label in cell {}", cell.0);
    }
}

/// Fake provider: renders deterministic wave art after a short delay so
/// the busy spinner is visible.
struct DemoMapProvider;

#[async_trait]
impl MapSnapshotProvider for DemoMapProvider {
    async fn snapshot(
        &self,
        coordinate: Coordinate,
        options: SnapshotOptions,
    ) -> Result<MapSnapshot, SnapshotError> {
        tokio::time::sleep(Duration::from_millis(400)).await;
        let rows = (0..options.height)
            .map(|y| {
                (0..options.width)
                    .map(|x| if (x + y * 3) % 5 == 0 { '≈' } else { '·' })
                    .collect()
            })
            .collect();
        Ok(MapSnapshot {
            image: CellImage::new(rows),
            center: coordinate,
            options,
        })
    }
}

struct ConversationEntry {
    message: Message,
    outgoing: bool,
    style: MessageStyle,
}

fn conversation(theme: &CellTheme) -> Vec<ConversationEntry> {
    let photo = CellImage::from_rows(&[
        "  __   ",
        " /..\\  ",
        " \\__/  ",
        "~~~~~~~",
    ]);
    let thumbnail = CellImage::from_rows(&[
        "┌─────┐",
        "│░░░░░│",
        "└─────┘",
    ]);
    vec![
        ConversationEntry {
            message: Message::new(
                "Ada Lovelace",
                MessageContent::Text("Hey! Landed in Paris this morning.".into()),
            ),
            outgoing: false,
            style: MessageStyle::BubbleTailOutline(theme.outline, TailCorner::BottomLeft),
        },
        ConversationEntry {
            message: Message::new("You", MessageContent::Text("Welcome! How was the flight?".into())),
            outgoing: true,
            style: MessageStyle::BubbleTail(TailCorner::BottomRight),
        },
        ConversationEntry {
            message: Message::new("Ada Lovelace", MessageContent::Emoji("🎉✈️".into())),
            outgoing: false,
            style: MessageStyle::Bubble,
        },
        ConversationEntry {
            message: Message::new("Ada Lovelace", MessageContent::Photo(photo)),
            outgoing: false,
            style: MessageStyle::Bubble,
        },
        ConversationEntry {
            message: Message::new(
                "You",
                MessageContent::Video {
                    url: "file:///flight.mp4".into(),
                    thumbnail,
                },
            ),
            outgoing: true,
            style: MessageStyle::Bubble,
        },
        ConversationEntry {
            message: Message::new(
                "Ada Lovelace",
                MessageContent::Location(Coordinate::new(48.8584, 2.2945)),
            ),
            outgoing: false,
            style: MessageStyle::BubbleOutline(theme.outline),
        },
    ]
}

const MAP_OPTIONS: SnapshotOptions = SnapshotOptions {
    latitude_span: 0.01,
    longitude_span: 0.01,
    show_buildings: true,
    show_points_of_interest: true,
    width: 20,
    height: 6,
};

fn content_size(content: &MessageContent) -> (u16, u16) {
    use unicode_width::UnicodeWidthStr;
    match content {
        MessageContent::Text(text) | MessageContent::Emoji(text) => {
            (UnicodeWidthStr::width(text.as_str()) as u16 + 4, 3)
        }
        MessageContent::AttributedText(text) => {
            (text.width() as u16 + 4, text.height() as u16 + 2)
        }
        MessageContent::Photo(image) => (image.width() + 2, image.height() + 2),
        MessageContent::Video { thumbnail, .. } => (thumbnail.width() + 2, thumbnail.height() + 2),
        MessageContent::Location(_) => (MAP_OPTIONS.width + 2, MAP_OPTIONS.height + 2),
    }
}

/// The hosting list's layout pass: one (cell area, local attributes) pair
/// per entry, stacked top to bottom.
fn layout_conversation(width: u16, entries: &[ConversationEntry]) -> Vec<(Rect, CellLayoutAttributes)> {
    let mut y = 0;
    entries
        .iter()
        .map(|entry| {
            let (content_w, content_h) = content_size(&entry.message.content);
            let content_w = content_w.min(width.saturating_sub(7));
            let cell_h = content_h + 2;
            let content_x = if entry.outgoing {
                width.saturating_sub(content_w + 1)
            } else {
                5
            };
            let avatar_frame = if entry.outgoing {
                Rect::ZERO
            } else {
                Rect::new(0, cell_h.saturating_sub(3), 4, 2)
            };
            let attributes = CellLayoutAttributes {
                avatar_frame,
                top_label_frame: Rect::new(content_x, 0, content_w, 1),
                bottom_label_frame: Rect::new(content_x, 1 + content_h, content_w, 1),
                content_frame: Rect::new(content_x, 1, content_w, content_h),
                label_insets: LabelInsets::uniform(1),
                label_style: Style::default(),
            };
            let area = Rect::new(0, y, width, cell_h);
            y += cell_h;
            (area, attributes)
        })
        .collect()
}

fn apply_outcomes(
    rx: &mut UnboundedReceiver<SnapshotOutcome>,
    cells: &mut [MessageCell],
) {
    while let Ok(outcome) = rx.try_recv() {
        for cell in cells.iter_mut() {
            if cell.apply_snapshot_outcome(outcome.clone()) {
                break;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();
    let theme = if args.theme == "light" {
        CellTheme::light()
    } else {
        CellTheme::dark()
    };

    let entries = conversation(&theme);
    let tap_log = Rc::new(TapLog::default());
    let (tx, mut rx) = unbounded_channel();
    let provider: Arc<dyn MapSnapshotProvider> = Arc::new(DemoMapProvider);

    let mut cells: Vec<MessageCell> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let mut cell = MessageCell::new(CellId(index));
        if args.content_only {
            cell.set_routing_policy(TapRoutingPolicy::ContentOnly);
        }
        let tap_log_dyn: Rc<dyn MessageCellDelegate> = tap_log.clone();
        let delegate: Weak<dyn MessageCellDelegate> = Rc::downgrade(&tap_log_dyn);
        let background = if entry.outgoing {
            theme.outgoing_bubble
        } else {
            theme.incoming_bubble
        };
        cell.configure(&entry.message, entry.style.clone(), background, delegate);
        cell.configure_avatar(Avatar::from_sender(
            &entry.message.sender,
            theme.avatar_fg,
            theme.avatar_bg,
        ));
        cell.configure_accessory_labels(
            Some(entry.message.sender_label()),
            Some(entry.message.timestamp_label()),
        );
        if let MessageContent::Location(coordinate) = entry.message.content {
            let pin = Annotation {
                image: CellImage::from_rows(&["▼"]),
                center_offset: (0, 0),
            };
            cell.configure_location(coordinate, provider.clone(), MAP_OPTIONS, Some(pin), &tx);
        }
        cells.push(cell);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &theme, &entries, &mut cells, &tap_log, &mut rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    theme: &CellTheme,
    entries: &[ConversationEntry],
    cells: &mut Vec<MessageCell>,
    tap_log: &Rc<TapLog>,
    rx: &mut UnboundedReceiver<SnapshotOutcome>,
) -> Result<(), Box<dyn Error>> {
    loop {
        apply_outcomes(rx, cells);
        for cell in cells.iter_mut() {
            cell.container_mut().media.tick();
        }

        let mut areas: Vec<Rect> = Vec::new();
        terminal.draw(|frame| {
            let size = frame.area();
            frame.render_widget(
                Block::new().style(Style::default().bg(theme.background)),
                size,
            );
            let layout = layout_conversation(size.width, entries);
            for ((area, attributes), cell) in layout.iter().zip(cells.iter_mut()) {
                cell.apply_layout(attributes);
                areas.push(*area);
                if area.bottom() < size.height {
                    (&*cell).render(*area, frame.buffer_mut());
                }
            }
            if size.height > 0 {
                let status = Rect::new(0, size.height - 1, size.width, 1);
                let last = tap_log.last.borrow();
                let text = if last.is_empty() {
                    "click a bubble, avatar, or label (q quits)".to_string()
                } else {
                    last.clone()
                };
                frame.render_widget(Paragraph::new(text), status);
            }
        })?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                _ => {}
            },
            Event::Mouse(mouse) => {
                if mouse.kind == MouseEventKind::Up(MouseButton::Left) {
                    let point = Position::new(mouse.column, mouse.row);
                    for (area, cell) in areas.iter().zip(cells.iter()) {
                        if area.contains(point) {
                            let local = Position::new(point.x - area.x, point.y - area.y);
                            cell.handle_mouse_up(local);
                            break;
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}
