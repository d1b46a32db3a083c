//! StationList component: the stream list plus a details strip for the
//! selected entry.

use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use streamer_core::StreamEntry;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{style_playing, style_selected, C_EDITING, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY},
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        truncate,
    },
};

const NAME_COLUMN: usize = 28;
const DOUBLE_CLICK_MS: u128 = 400;

pub struct StationList {
    list_state: ListState,
    /// Inner rect of the list as last drawn, for mouse hit-testing.
    list_area: Rect,
    last_click: Option<(usize, Instant)>,
}

impl StationList {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
            list_area: Rect::default(),
            last_click: None,
        }
    }

    fn render_item<'a>(
        entry: &'a StreamEntry,
        is_selected: bool,
        is_playing: bool,
        width: usize,
    ) -> ListItem<'a> {
        let (icon, icon_style) = if is_playing {
            ("▶", style_playing())
        } else {
            (" ", Style::default())
        };

        let name_style = if is_playing {
            style_playing()
        } else if is_selected {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_PRIMARY)
        };

        let name = truncate(&entry.name, NAME_COLUMN);
        let pad = NAME_COLUMN.saturating_sub(name.width());
        let desc_room = width.saturating_sub(NAME_COLUMN + 5);

        let spans = vec![
            Span::raw(" "),
            Span::styled(icon, icon_style),
            Span::raw(" "),
            Span::styled(format!("{}{}", name, " ".repeat(pad)), name_style),
            Span::raw("  "),
            Span::styled(
                truncate(&entry.description, desc_room),
                Style::default().fg(C_SECONDARY),
            ),
        ];

        let item = ListItem::new(Line::from(spans));
        if is_selected {
            item.style(style_selected())
        } else {
            item
        }
    }

    fn draw_details(frame: &mut Frame, area: Rect, state: &AppState) {
        let block = pane_chrome("details", false, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(entry) = state.selected_entry() else {
            frame.render_widget(
                Paragraph::new(Span::styled("  nothing selected", Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        };

        let room = inner.width.saturating_sub(14) as usize;
        let lines = vec![
            detail_row("name", &entry.name, room),
            detail_row("description", &entry.description, room),
            detail_row("url", &entry.address, room),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn detail_row<'a>(label: &'a str, value: &str, room: usize) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {:<12}", label), Style::default().fg(C_MUTED)),
        Span::styled(truncate(value, room), Style::default().fg(C_PRIMARY)),
    ])
}

impl Component for StationList {
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Action::SelectUp(step),
            KeyCode::Down | KeyCode::Char('j') => Action::SelectDown(step),
            KeyCode::PageUp => Action::SelectUp(10),
            KeyCode::PageDown => Action::SelectDown(10),
            KeyCode::Home | KeyCode::Char('g') => Action::SelectFirst,
            KeyCode::End | KeyCode::Char('G') => Action::SelectLast,
            KeyCode::Enter => Action::PlaySelected,
            KeyCode::Char('a') if state.managing => Action::AddEntry,
            KeyCode::Char('e') if state.managing => Action::EditEntry,
            KeyCode::Char('d') | KeyCode::Delete if state.managing => Action::DeleteEntry,
            _ => return vec![],
        };
        vec![action]
    }

    fn handle_mouse(&mut self, event: MouseEvent, state: &AppState) -> Vec<Action> {
        let area = self.list_area;
        let inside = event.column >= area.x
            && event.column < area.x + area.width
            && event.row >= area.y
            && event.row < area.y + area.height;
        if !inside {
            return vec![];
        }

        match event.kind {
            MouseEventKind::ScrollUp => vec![Action::SelectUp(1)],
            MouseEventKind::ScrollDown => vec![Action::SelectDown(1)],
            MouseEventKind::Down(MouseButton::Left) => {
                let index = self.list_state.offset() + (event.row - area.y) as usize;
                if index >= state.entries.len() {
                    self.last_click = None;
                    return vec![];
                }
                let is_double = self
                    .last_click
                    .is_some_and(|(i, t)| i == index && t.elapsed().as_millis() < DOUBLE_CLICK_MS);
                if is_double {
                    self.last_click = None;
                    vec![Action::SelectIndex(index), Action::PlaySelected]
                } else {
                    self.last_click = Some((index, Instant::now()));
                    vec![Action::SelectIndex(index)]
                }
            }
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(5)])
            .split(area);

        let title = state.playlist_label();
        let badge = if state.managing {
            Some(Badge {
                text: "EDIT",
                color: C_EDITING,
            })
        } else if state.is_playing() {
            Some(Badge {
                text: "PLAYING",
                color: C_PLAYING,
            })
        } else {
            None
        };
        let block = pane_chrome(&title, !state.modal_open, badge);
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        self.list_area = inner;

        if state.entries.is_empty() {
            let msg = if state.managing {
                "  playlist is empty, press a to add a stream"
            } else {
                "  no streams loaded, press o to open a playlist"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))),
                inner,
            );
        } else {
            let playing = state.playing_index();
            let width = inner.width as usize;
            let items: Vec<ListItem> = state
                .entries
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    Self::render_item(e, state.selected == Some(i), playing == Some(i), width)
                })
                .collect();

            self.list_state.select(state.selected);
            frame.render_stateful_widget(List::new(items), inner, &mut self.list_state);
        }

        Self::draw_details(frame, chunks[1], state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn state(n: usize) -> AppState {
        AppState {
            entries: (0..n)
                .map(|i| StreamEntry::new(format!("S{}", i), "", format!("host/{}", i)))
                .collect(),
            selected: Some(0),
            ..AppState::default()
        }
    }

    #[test]
    fn test_navigation_keys() {
        let mut list = StationList::new();
        let s = state(3);
        assert_eq!(list.handle_key(key(KeyCode::Char('j')), &s), vec![Action::SelectDown(1)]);
        assert_eq!(list.handle_key(key(KeyCode::Up), &s), vec![Action::SelectUp(1)]);
        assert_eq!(list.handle_key(key(KeyCode::End), &s), vec![Action::SelectLast]);
        assert_eq!(list.handle_key(key(KeyCode::Enter), &s), vec![Action::PlaySelected]);
    }

    #[test]
    fn test_edit_keys_need_manage_mode() {
        let mut list = StationList::new();
        let mut s = state(3);
        assert!(list.handle_key(key(KeyCode::Char('a')), &s).is_empty());
        s.managing = true;
        assert_eq!(list.handle_key(key(KeyCode::Char('a')), &s), vec![Action::AddEntry]);
        assert_eq!(list.handle_key(key(KeyCode::Char('d')), &s), vec![Action::DeleteEntry]);
    }

    #[test]
    fn test_click_selects_and_double_click_plays() {
        let mut list = StationList::new();
        list.list_area = Rect::new(1, 1, 40, 10);
        let s = state(3);

        assert_eq!(
            list.handle_mouse(click(5, 3), &s),
            vec![Action::SelectIndex(2)]
        );
        assert_eq!(
            list.handle_mouse(click(5, 3), &s),
            vec![Action::SelectIndex(2), Action::PlaySelected]
        );
        // below the last row
        assert!(list.handle_mouse(click(5, 8), &s).is_empty());
    }

    #[test]
    fn test_mouse_uses_drawn_list_area() {
        let mut list = StationList::new();
        list.list_area = Rect::new(10, 5, 20, 4);
        let s = state(3);
        let scroll = |column, row| MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        assert!(list.handle_mouse(scroll(2, 2), &s).is_empty());
        assert!(list.handle_mouse(click(2, 6), &s).is_empty());
        assert_eq!(list.handle_mouse(scroll(12, 6), &s), vec![Action::SelectDown(1)]);
        assert_eq!(list.handle_mouse(click(12, 6), &s), vec![Action::SelectIndex(1)]);
    }
}
