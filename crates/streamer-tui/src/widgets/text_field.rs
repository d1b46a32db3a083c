//! TextField: a labelled single-line input built on tui-input.

use ratatui::crossterm::event::{Event, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{style_input, C_PRIMARY, C_SECONDARY};

pub struct TextField {
    input: Input,
    label: String,
    label_width: u16,
}

impl TextField {
    pub fn new(label: impl Into<String>, value: &str) -> Self {
        let label = label.into();
        let label_width = unicode_width::UnicodeWidthStr::width(label.as_str()) as u16 + 2;
        Self {
            input: Input::new(value.to_string()),
            label,
            label_width,
        }
    }

    /// Align this field's input column with others in the same form.
    pub fn set_label_width(&mut self, width: u16) {
        self.label_width = width;
    }

    pub fn label_width(&self) -> u16 {
        self.label_width
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Feed an editing key (characters, backspace, cursor movement).
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.input.handle_event(&Event::Key(key));
    }

    /// Render `label  value` on one row; shows the cursor when focused.
    pub fn draw(&self, frame: &mut Frame, area: Rect, focused: bool) {
        if area.width <= self.label_width || area.height == 0 {
            return;
        }
        let input_width = area.width - self.label_width;
        let scroll = self.input.visual_scroll(input_width.saturating_sub(1) as usize);

        let label_style = if focused {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        let label = Paragraph::new(Line::from(Span::styled(self.label.as_str(), label_style)));
        frame.render_widget(
            label,
            Rect {
                width: self.label_width,
                ..area
            },
        );

        let input_area = Rect {
            x: area.x + self.label_width,
            width: input_width,
            height: 1,
            ..area
        };
        let value = Paragraph::new(self.input.value())
            .style(style_input())
            .scroll((0, scroll as u16));
        frame.render_widget(value, input_area);

        if focused {
            let cursor_x = input_area.x + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((
                cursor_x.min(input_area.x + input_area.width - 1),
                input_area.y,
            ));
        }
    }
}
