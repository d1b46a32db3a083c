//! PathPrompt: typed file path entry, used when native dialogs are off
//! or unavailable.

use std::path::{Path, PathBuf};

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::{
    action::{Action, PathPurpose},
    app_state::AppState,
    component::Component,
    theme::{style_default, C_MUTED},
    widgets::{
        pane_chrome::{centered, pane_chrome},
        text_field::TextField,
    },
};

pub struct PathPrompt {
    purpose: PathPurpose,
    field: TextField,
}

impl PathPrompt {
    pub fn new(purpose: PathPurpose, initial: &Path) -> Self {
        Self {
            purpose,
            field: TextField::new("path", &initial.to_string_lossy()),
        }
    }

    pub fn purpose(&self) -> PathPurpose {
        self.purpose
    }

    fn title(&self) -> &'static str {
        match self.purpose {
            PathPurpose::Open => "open playlist",
            PathPurpose::Save | PathPurpose::SaveThenQuit => "save playlist",
        }
    }

    /// The typed path, with `.csv` added to a save target that has no
    /// extension.
    fn chosen(&self) -> Option<PathBuf> {
        let text = self.field.value().trim();
        if text.is_empty() {
            return None;
        }
        let mut path = PathBuf::from(text);
        if self.purpose != PathPurpose::Open && path.extension().is_none() {
            path.set_extension("csv");
        }
        Some(path)
    }
}

impl Component for PathPrompt {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Esc => vec![Action::CloseModal],
            KeyCode::Enter => match self.chosen() {
                Some(path) => vec![Action::PathChosen(self.purpose, path)],
                None => vec![],
            },
            _ => {
                self.field.handle_key(key);
                vec![]
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _state: &AppState) {
        let popup = centered(area, 70, 5);
        frame.render_widget(Clear, popup);
        let block = pane_chrome(self.title(), true, None).style(style_default());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let row = Rect {
            x: inner.x + 1,
            width: inner.width.saturating_sub(2),
            height: 1,
            ..inner
        };
        self.field.draw(frame, row, true);

        if inner.height > 2 {
            let hint = Rect {
                y: inner.y + 2,
                ..row
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "Enter ok  Esc cancel",
                    Style::default().fg(C_MUTED),
                ))),
                hint,
            );
        }
    }
}
