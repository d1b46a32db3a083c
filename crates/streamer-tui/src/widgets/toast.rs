//! Short-lived notices about what the last command did, stacked in the
//! bottom-right corner of the stream list.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_HIGHLIGHT, C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};
use crate::widgets::truncate;

/// Notices kept on screen at once; older ones are dropped.
const MAX_TOASTS: usize = 3;
const MIN_WIDTH: u16 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Failures stay up longer than confirmations.
    fn ttl(self) -> Duration {
        match self {
            Severity::Info | Severity::Success => Duration::from_millis(2500),
            Severity::Warning => Duration::from_secs(5),
            Severity::Error => Duration::from_secs(8),
        }
    }

    fn marker(self) -> (&'static str, Color) {
        match self {
            Severity::Info => ("·", C_TOAST_INFO),
            Severity::Success => ("✓", C_TOAST_SUCCESS),
            Severity::Warning => ("!", C_TOAST_WARNING),
            Severity::Error => ("✗", C_TOAST_ERROR),
        }
    }
}

struct Toast {
    text: String,
    severity: Severity,
    until: Instant,
}

#[derive(Default)]
pub struct ToastManager {
    toasts: VecDeque<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text`. Repeating a notice that is still up moves it to the
    /// bottom and restarts its clock.
    pub fn push(&mut self, text: impl Into<String>, severity: Severity) {
        self.push_for(text.into(), severity, severity.ttl());
    }

    fn push_for(&mut self, text: String, severity: Severity, ttl: Duration) {
        self.toasts.retain(|t| t.text != text);
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            text,
            severity,
            until: Instant::now() + ttl,
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(text, Severity::Info);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(text, Severity::Success);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(text, Severity::Warning);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(text, Severity::Error);
    }

    /// Drop expired notices. Returns true when the screen needs a redraw.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        let before = self.toasts.len();
        self.toasts.retain(|t| t.until > now);
        self.toasts.len() != before
    }

    /// One row per notice, newest at the bottom edge of `area`.
    fn rows(&self, area: Rect) -> Vec<(Rect, &Toast)> {
        let width = (area.width / 2).max(MIN_WIDTH).min(area.width);
        self.toasts
            .iter()
            .rev()
            .zip((area.y..area.y + area.height).rev())
            .map(|(toast, y)| {
                let w = (toast.text.width() as u16 + 4).min(width);
                let x = area.x + area.width - w;
                (Rect::new(x, y, w, 1), toast)
            })
            .collect()
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        for (row, toast) in self.rows(area) {
            let (marker, color) = toast.severity.marker();
            let text = truncate(&toast.text, row.width.saturating_sub(4) as usize);
            let style = Style::default()
                .fg(color)
                .bg(C_HIGHLIGHT)
                .add_modifier(Modifier::BOLD);
            frame.render_widget(Clear, row);
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {} {} ", marker, text), style)),
                row,
            );
        }
    }
}
