//! Color palette and style constants for the radio TUI.
//!
//! Warm seashell / antique-white tones on a light background.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(238, 229, 222); // seashell 2
pub const C_HIGHLIGHT: Color = Color::Rgb(255, 239, 219); // antique white 1
pub const C_PRIMARY: Color = Color::Rgb(92, 74, 52);
pub const C_SECONDARY: Color = Color::Rgb(139, 121, 94); // navajo white 4
pub const C_MUTED: Color = Color::Rgb(170, 155, 135);
pub const C_SEPARATOR: Color = Color::Rgb(205, 192, 176);
pub const C_PANEL_BORDER: Color = Color::Rgb(205, 192, 176); // antique white 3
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(139, 121, 94);
pub const C_PLAYING: Color = Color::Rgb(46, 125, 70);
pub const C_EDITING: Color = Color::Rgb(176, 104, 32);
pub const C_INPUT_FG: Color = Color::Rgb(60, 48, 34);
pub const C_TOAST_INFO: Color = Color::Rgb(60, 100, 150);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(46, 125, 70);
pub const C_TOAST_WARNING: Color = Color::Rgb(176, 104, 32);
pub const C_TOAST_ERROR: Color = Color::Rgb(170, 40, 40);
pub const C_MODE_NORMAL: Color = Color::Rgb(139, 121, 94);
pub const C_MODE_MANAGE: Color = Color::Rgb(176, 104, 32);
pub const C_MODE_INPUT: Color = Color::Rgb(60, 100, 150);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY).bg(C_BG)
}

pub fn style_playing() -> Style {
    Style::default().fg(C_PLAYING).add_modifier(Modifier::BOLD)
}

pub fn style_selected() -> Style {
    Style::default()
        .bg(C_HIGHLIGHT)
        .fg(C_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

pub fn style_input() -> Style {
    Style::default().fg(C_INPUT_FG).bg(C_HIGHLIGHT)
}
