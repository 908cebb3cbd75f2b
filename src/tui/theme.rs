use ratatui::style::{Color, Modifier, Style};

use crate::display::DisplayMode;

/// Colours for one display mode. Built from the current [`DisplayMode`] and
/// handed to the renderer on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub primary: Color,
    pub secondary: Color,
    pub muted: Color,
    pub error: Color,
    pub success: Color,
}

const PRIMARY: Color = Color::Rgb(0x21, 0x96, 0xf3);
const SECONDARY: Color = Color::Rgb(0xf5, 0x00, 0x57);

impl Theme {
    pub fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Light => Self {
                background: Color::Rgb(0xfa, 0xfa, 0xfa),
                foreground: Color::Rgb(0x21, 0x21, 0x21),
                primary: PRIMARY,
                secondary: SECONDARY,
                muted: Color::Rgb(0x75, 0x75, 0x75),
                error: Color::Rgb(0xd3, 0x2f, 0x2f),
                success: Color::Rgb(0x2e, 0x7d, 0x32),
            },
            DisplayMode::Dark => Self {
                background: Color::Rgb(0x12, 0x12, 0x12),
                foreground: Color::Rgb(0xff, 0xff, 0xff),
                primary: PRIMARY,
                secondary: SECONDARY,
                muted: Color::Rgb(0xb0, 0xb0, 0xb0),
                error: Color::Rgb(0xf4, 0x43, 0x36),
                success: Color::Rgb(0x66, 0xbb, 0x6a),
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn title(&self) -> Style {
        self.base().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.background)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hint(&self) -> Style {
        self.base().fg(self.muted)
    }
}
