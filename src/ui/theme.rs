//! Colors, styles and glyphs used by the renderer.
//!
//! Catppuccin Mocha. Widgets ask [`Theme`] for a role, never for a color.

use ratatui::style::{Color, Modifier, Style};

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

mod palette {
    use super::{Color, rgb};

    pub const MANTLE: Color = rgb(0x181825);
    pub const SURFACE0: Color = rgb(0x313244);
    pub const SURFACE1: Color = rgb(0x45475a);
    pub const TEXT: Color = rgb(0xcdd6f4);
    pub const SUBTEXT0: Color = rgb(0xa6adc8);
    pub const OVERLAY0: Color = rgb(0x6c7086);
    pub const LAVENDER: Color = rgb(0xb4befe);
    pub const TEAL: Color = rgb(0x94e2d5);
    pub const GREEN: Color = rgb(0xa6e3a1);
    pub const YELLOW: Color = rgb(0xf9e2af);
    pub const PEACH: Color = rgb(0xfab387);
    pub const RED: Color = rgb(0xf38ba8);
    pub const MAUVE: Color = rgb(0xcba6f7);
}

use palette::*;

pub mod symbols {
    pub const UNREAD: &str = "●";
    pub const READ: &str = " ";
    pub const STARRED: &str = "★";
    pub const IMPORTANT: &str = "!";
    pub const MARKED: &str = "◆";
    pub const UNMARKED: &str = " ";
    pub const IDLE: &str = "●";
}

fn fg(color: Color) -> Style {
    Style::default().fg(color)
}

fn bold(color: Color) -> Style {
    fg(color).add_modifier(Modifier::BOLD)
}

/// Foreground on the status bar background
fn on_bar(color: Color) -> Style {
    fg(color).bg(MANTLE)
}

pub struct Theme;

impl Theme {
    pub fn text() -> Style {
        fg(TEXT)
    }

    pub fn text_secondary() -> Style {
        fg(SUBTEXT0)
    }

    pub fn text_muted() -> Style {
        fg(OVERLAY0)
    }

    pub fn text_unread() -> Style {
        bold(TEXT)
    }

    pub fn title() -> Style {
        bold(LAVENDER)
    }

    pub fn status_bar() -> Style {
        on_bar(TEXT)
    }

    pub fn status_warning() -> Style {
        on_bar(YELLOW)
    }

    /// Spinner while anything is loading
    pub fn status_busy() -> Style {
        on_bar(YELLOW)
    }

    pub fn status_idle() -> Style {
        on_bar(GREEN)
    }

    pub fn status_muted() -> Style {
        on_bar(OVERLAY0)
    }

    pub fn error_bar() -> Style {
        fg(MANTLE).bg(RED)
    }

    pub fn help_key() -> Style {
        fg(YELLOW)
    }

    pub fn help_desc() -> Style {
        fg(SUBTEXT0)
    }

    pub fn help_category() -> Style {
        bold(LAVENDER)
    }

    pub fn border() -> Style {
        fg(SURFACE0)
    }

    pub fn border_focused() -> Style {
        fg(LAVENDER)
    }

    pub fn unread_indicator() -> Style {
        fg(MAUVE)
    }

    pub fn star_indicator() -> Style {
        fg(YELLOW)
    }

    pub fn important_indicator() -> Style {
        fg(PEACH)
    }

    /// Bulk selection mark
    pub fn marked_indicator() -> Style {
        bold(TEAL)
    }

    pub fn label() -> Style {
        fg(PEACH)
    }

    pub fn input() -> Style {
        bold(YELLOW)
    }
}

pub fn with_selection_bg(style: Style, selected: bool) -> Style {
    if selected { style.bg(SURFACE1) } else { style }
}
