//! Status bar: log line plus the mode label and keybindings footer.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{
    C_MODE_INPUT, C_MODE_MANAGE, C_MODE_NORMAL, C_MUTED, C_PLAYING, C_SECONDARY, C_SEPARATOR,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    /// Browsing and playing.
    Normal,
    /// Playlist edit session: add/edit/delete enabled.
    Manage,
    /// A form, prompt or dialog has the keyboard.
    Input,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "RADIO",
            Self::Manage => "MANAGE",
            Self::Input => "INPUT",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Manage => C_MODE_MANAGE,
            Self::Input => C_MODE_INPUT,
        }
    }

    fn keys(self) -> &'static str {
        match self {
            Self::Normal => {
                " ↑↓/jk select  Enter play  s stop  o open  w save  m manage  ? help  q quit"
            }
            Self::Manage => {
                " ↑↓/jk select  a add  e edit  d delete  Enter play  m/Esc done  ? help"
            }
            Self::Input => " Tab next field  Enter confirm  Esc cancel",
        }
    }
}

/// Draw the log bar: player indicator and the last log line.
pub fn draw_log_bar(frame: &mut Frame, area: Rect, last_log: Option<&str>, playing: bool) {
    let indicator = if playing {
        Span::styled("●", Style::default().fg(C_PLAYING))
    } else {
        Span::styled("○", Style::default().fg(C_MUTED))
    };

    let log_span = Span::styled(last_log.unwrap_or(""), Style::default().fg(C_SECONDARY));

    let line = Line::from(vec![indicator, Span::raw(" "), log_span]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default()
                .fg(mode.color())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(mode.keys(), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
