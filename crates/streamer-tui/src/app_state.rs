//! AppState: read-only snapshot of the core that components render from.

use std::path::PathBuf;

use streamer_core::player::{Launcher, PlayerState};
use streamer_core::{RadioCore, StreamEntry};

use crate::action::Action;
use crate::widgets::status_bar::InputMode;

#[derive(Debug, Default)]
pub struct AppState {
    pub entries: Vec<StreamEntry>,
    pub selected: Option<usize>,
    /// Address the player was last started on, while a process is live.
    pub playing_address: Option<String>,
    pub playlist_path: Option<PathBuf>,
    pub dirty: bool,
    pub managing: bool,
    pub last_log: Option<String>,
    pub modal_open: bool,
}

impl AppState {
    /// Refresh everything derived from the core after a command ran.
    pub fn sync<L: Launcher>(&mut self, core: &RadioCore<L>) {
        self.entries = core.list().entries().to_vec();
        self.selected = core.selected();
        self.playing_address = match core.player_state() {
            PlayerState::Running { address } => Some(address),
            PlayerState::Idle => None,
        };
        self.playlist_path = core.playlist_path().map(|p| p.to_path_buf());
        self.dirty = core.is_dirty();
        self.managing = core.in_edit();
    }

    pub fn input_mode(&self) -> InputMode {
        if self.modal_open {
            InputMode::Input
        } else if self.managing {
            InputMode::Manage
        } else {
            InputMode::Normal
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing_address.is_some()
    }

    /// Row the player is on: the selected row if its address matches,
    /// otherwise the first row with that address.
    pub fn playing_index(&self) -> Option<usize> {
        let address = self.playing_address.as_deref()?;
        let matches = |i: &usize| self.entries.get(*i).is_some_and(|e| e.address == address);
        self.selected
            .filter(matches)
            .or_else(|| (0..self.entries.len()).find(matches))
    }

    /// Row a navigation action lands on, clamped to the list.
    pub fn selection_target(&self, action: &Action) -> Option<usize> {
        let last = self.entries.len().checked_sub(1)?;
        let current = self.selected.unwrap_or(0).min(last);
        let target = match *action {
            Action::SelectUp(n) => current.saturating_sub(n),
            Action::SelectDown(n) => current.saturating_add(n).min(last),
            Action::SelectFirst => 0,
            Action::SelectLast => last,
            Action::SelectIndex(i) if i <= last => i,
            _ => return None,
        };
        Some(target)
    }

    pub fn selected_entry(&self) -> Option<&StreamEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    /// File name shown in the header, `*` marking unsaved changes.
    pub fn playlist_label(&self) -> String {
        let name = self
            .playlist_path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        if self.dirty {
            format!("{}*", name)
        } else {
            name
        }
    }
}
