//! ConfirmDialog: yes / no / cancel question box.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, Answer, ConfirmKind},
    app_state::AppState,
    component::Component,
    theme::{style_default, style_selected, C_PRIMARY, C_SECONDARY},
    widgets::pane_chrome::{centered, pane_chrome},
};

const BUTTONS: [(Answer, &str); 3] = [
    (Answer::Yes, "Yes"),
    (Answer::No, "No"),
    (Answer::Cancel, "Cancel"),
];

pub struct ConfirmDialog {
    kind: ConfirmKind,
    focused: usize,
}

impl ConfirmDialog {
    pub fn new(kind: ConfirmKind) -> Self {
        Self { kind, focused: 0 }
    }

    pub fn kind(&self) -> ConfirmKind {
        self.kind
    }

    fn title(&self) -> &'static str {
        match self.kind {
            ConfirmKind::KeepEdits { .. } => "playlist changed",
            ConfirmKind::SaveBeforeQuit => "quit",
        }
    }

    fn question(&self) -> &'static str {
        match self.kind {
            ConfirmKind::KeepEdits { .. } => "Keep the changes made to the playlist?",
            ConfirmKind::SaveBeforeQuit => "Save the current playlist before quitting?",
        }
    }

    fn answer(&self, answer: Answer) -> Vec<Action> {
        vec![Action::Answered(self.kind, answer)]
    }
}

impl Component for ConfirmDialog {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.answer(Answer::Yes),
            KeyCode::Char('n') | KeyCode::Char('N') => self.answer(Answer::No),
            KeyCode::Char('c') | KeyCode::Esc => self.answer(Answer::Cancel),
            KeyCode::Enter => self.answer(BUTTONS[self.focused].0),
            KeyCode::Left | KeyCode::BackTab => {
                self.focused = (self.focused + BUTTONS.len() - 1) % BUTTONS.len();
                vec![]
            }
            KeyCode::Right | KeyCode::Tab => {
                self.focused = (self.focused + 1) % BUTTONS.len();
                vec![]
            }
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _state: &AppState) {
        let popup = centered(area, 50, 7);
        frame.render_widget(Clear, popup);
        let block = pane_chrome(self.title(), true, None).style(style_default());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut buttons = Vec::new();
        for (i, (_, label)) in BUTTONS.iter().enumerate() {
            let style = if i == self.focused {
                style_selected()
            } else {
                Style::default().fg(C_SECONDARY)
            };
            buttons.push(Span::styled(format!(" [{}] ", label), style));
            buttons.push(Span::raw(" "));
        }

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.question(),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(buttons),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_letter_shortcuts() {
        let state = AppState::default();
        let mut d = ConfirmDialog::new(ConfirmKind::SaveBeforeQuit);
        assert_eq!(
            d.handle_key(key(KeyCode::Char('n')), &state),
            vec![Action::Answered(ConfirmKind::SaveBeforeQuit, Answer::No)]
        );
        assert_eq!(
            d.handle_key(key(KeyCode::Esc), &state),
            vec![Action::Answered(ConfirmKind::SaveBeforeQuit, Answer::Cancel)]
        );
    }

    #[test]
    fn test_enter_answers_focused_button() {
        let state = AppState::default();
        let kind = ConfirmKind::KeepEdits { then_quit: false };
        let mut d = ConfirmDialog::new(kind);
        assert!(d.handle_key(key(KeyCode::Right), &state).is_empty());
        assert_eq!(
            d.handle_key(key(KeyCode::Enter), &state),
            vec![Action::Answered(kind, Answer::No)]
        );
        d.handle_key(key(KeyCode::Left), &state);
        d.handle_key(key(KeyCode::Left), &state);
        assert_eq!(
            d.handle_key(key(KeyCode::Enter), &state),
            vec![Action::Answered(kind, Answer::Cancel)]
        );
    }
}
