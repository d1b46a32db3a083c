//! EntryForm: modal form for adding or editing one stream.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use streamer_core::{EntryFields, StreamEntry};

use crate::{
    action::{Action, FormPurpose},
    app_state::AppState,
    component::Component,
    theme::{style_default, C_MUTED},
    widgets::{pane_chrome::centered, pane_chrome::pane_chrome, text_field::TextField},
};

pub struct EntryForm {
    purpose: FormPurpose,
    fields: [TextField; 3],
    focus: usize,
}

impl EntryForm {
    pub fn new(purpose: FormPurpose, initial: Option<&StreamEntry>) -> Self {
        let blank = StreamEntry::default();
        let entry = initial.unwrap_or(&blank);
        let mut fields = [
            TextField::new("Name", &entry.name),
            TextField::new("Description", &entry.description),
            TextField::new("url (no https://)", &entry.address),
        ];
        let width = fields.iter().map(TextField::label_width).max().unwrap_or(0);
        for f in &mut fields {
            f.set_label_width(width);
        }
        Self {
            purpose,
            fields,
            focus: 0,
        }
    }

    fn submit(&self) -> Action {
        let [name, description, address] = &self.fields;
        Action::SubmitEntry(
            self.purpose,
            EntryFields::new(name.value(), description.value(), address.value()),
        )
    }

    fn title(&self) -> &'static str {
        match self.purpose {
            FormPurpose::Add => "add stream",
            FormPurpose::Edit(_) => "edit stream",
        }
    }
}

impl Component for EntryForm {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let n = self.fields.len();
        match key.code {
            KeyCode::Esc => return vec![Action::CloseModal],
            KeyCode::Enter => return vec![self.submit()],
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % n,
            KeyCode::BackTab | KeyCode::Up => self.focus = (self.focus + n - 1) % n,
            _ => self.fields[self.focus].handle_key(key),
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _state: &AppState) {
        let popup = centered(area, 64, 9);
        frame.render_widget(Clear, popup);
        let block = pane_chrome(self.title(), true, None).style(style_default());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        for (i, field) in self.fields.iter().enumerate() {
            let row = Rect {
                x: inner.x + 1,
                y: inner.y + 1 + i as u16 * 2,
                width: inner.width.saturating_sub(2),
                height: 1,
            };
            if row.y < inner.y + inner.height {
                field.draw(frame, row, i == self.focus);
            }
        }

        let hint = Rect {
            y: inner.y + inner.height.saturating_sub(1),
            height: 1,
            ..inner
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Tab next field  Enter ok  Esc cancel",
                Style::default().fg(C_MUTED),
            ))),
            hint,
        );
    }
}
