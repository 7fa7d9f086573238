use ratatui::style::{Color, Modifier, Style};

/// Color policy for rendering message cells. Hosts with their own palette
/// pass colors straight into `configure`; these presets exist for hosts
/// (and the demo) that want sensible defaults.
#[derive(Debug, Clone)]
pub struct CellTheme {
    pub background: Color,
    pub incoming_bubble: Color,
    pub outgoing_bubble: Color,
    pub outline: Color,
    pub label_style: Style,
    pub accessory_style: Style,
    pub avatar_fg: Color,
    pub avatar_bg: Color,
}

impl CellTheme {
    pub fn dark() -> Self {
        CellTheme {
            background: Color::Black,
            incoming_bubble: Color::Rgb(40, 44, 52),
            outgoing_bubble: Color::Rgb(0, 95, 135),
            outline: Color::Gray,
            label_style: Style::default().fg(Color::White),
            accessory_style: Style::default().fg(Color::DarkGray),
            avatar_fg: Color::White,
            avatar_bg: Color::Rgb(95, 0, 135),
        }
    }

    pub fn light() -> Self {
        CellTheme {
            background: Color::White,
            incoming_bubble: Color::Rgb(230, 230, 230),
            outgoing_bubble: Color::Rgb(180, 215, 255),
            outline: Color::DarkGray,
            label_style: Style::default().fg(Color::Black),
            accessory_style: Style::default().fg(Color::Gray),
            avatar_fg: Color::White,
            avatar_bg: Color::Rgb(0, 95, 135),
        }
    }

    /// Accessory style variant for emphasized sender names.
    pub fn sender_style(&self) -> Style {
        self.accessory_style.add_modifier(Modifier::BOLD)
    }
}
