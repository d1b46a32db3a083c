//! RadioCore: the command interface the presentation layer talks to.
//!
//! Owns the playlist store, the player controller and the current selection
//! exclusively.  Every user intent arrives as one call (or one `Command`)
//! and completes before the caller redraws; nothing here knows about keys,
//! widgets or dialogs.
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CoreError, PlayerError, PlaylistError};
use crate::platform::Platform;
use crate::player::{Launcher, PlayerController, PlayerState, ProcessLauncher};
use crate::playlist::{EntryFields, PlaylistStore, StreamEntry, StreamList};
use crate::state::PersistentState;

/// Everything a user can ask the core to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(usize),
    PlaySelected,
    Stop,
    AddEntry(EntryFields),
    UpdateEntry(usize, EntryFields),
    DeleteEntry(usize),
    BeginEdit,
    FinishEdit { keep: bool },
    Load(PathBuf),
    Save(PathBuf),
}

/// What a successful command did, for status reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Selected(usize),
    /// The player was (re)started on this address.
    Playing(String),
    /// Nothing to play: no selection, or the entry has no address.
    NothingToPlay,
    Stopped,
    Added(usize),
    Updated(usize),
    Deleted(StreamEntry),
    EditStarted,
    EditFinished { kept: bool, changed: bool },
    Loaded { path: PathBuf, entries: usize },
    Saved(PathBuf),
}

/// Whether quitting needs a "save before quit?" confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitCheck {
    Clean,
    ConfirmSave,
}

pub struct RadioCore<L: Launcher = ProcessLauncher> {
    store: PlaylistStore,
    player: PlayerController<L>,
    selected: Option<usize>,
    autoplay: bool,
    state_file: PathBuf,
}

impl RadioCore<ProcessLauncher> {
    /// Build the core for the running platform.
    ///
    /// A playlist that fails to load is not fatal: the core starts with an
    /// empty list and the error is handed back for the UI to show.  An
    /// unsupported platform is fatal.
    pub fn open(config: &Config) -> Result<(Self, Option<PlaylistError>), PlayerError> {
        let platform = Platform::current()?;
        Ok(Self::open_with(config, platform, ProcessLauncher))
    }
}

impl<L: Launcher> RadioCore<L> {
    pub fn open_with(
        config: &Config,
        platform: Platform,
        launcher: L,
    ) -> (Self, Option<PlaylistError>) {
        let persistent = PersistentState::load(&config.paths.state_file);
        let path = startup_playlist(config, &persistent);

        let (store, load_error) = match PlaylistStore::open(&path) {
            Ok(store) => (store, None),
            Err(e) => {
                warn!("Can not open playlist {:?}: {}", path, e);
                (PlaylistStore::new(), Some(e))
            }
        };

        let restored = persistent
            .last_selected
            .filter(|_| persistent.last_playlist.as_deref() == store.path())
            .filter(|&i| i < store.list().len());
        let selected = restored.or_else(|| (!store.list().is_empty()).then_some(0));
        debug!("startup selection: {:?}", selected);

        let core = Self {
            store,
            player: PlayerController::with_launcher(platform, config.player.clone(), launcher),
            selected,
            autoplay: config.player.autoplay,
            state_file: config.paths.state_file.clone(),
        };
        (core, load_error)
    }

    /// Play the startup selection when autoplay is configured.
    pub async fn startup(&mut self) -> Result<Outcome, CoreError> {
        if self.autoplay {
            self.play_selected().await
        } else {
            Ok(Outcome::NothingToPlay)
        }
    }

    // ── read access ──────────────────────────────────────────────────────────

    pub fn list(&self) -> &StreamList {
        self.store.list()
    }

    pub fn playlist_path(&self) -> Option<&Path> {
        self.store.path()
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn in_edit(&self) -> bool {
        self.store.in_edit()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&StreamEntry> {
        self.selected.and_then(|i| self.store.list().get(i))
    }

    pub fn player(&self) -> &PlayerController<L> {
        &self.player
    }

    pub fn player_state(&self) -> PlayerState {
        self.player.state()
    }

    pub fn store(&self) -> &PlaylistStore {
        &self.store
    }

    // ── commands ─────────────────────────────────────────────────────────────

    pub async fn handle(&mut self, command: Command) -> Result<Outcome, CoreError> {
        debug!("core command: {:?}", command);
        match command {
            Command::Select(index) => self.select(index).map(|_| Outcome::Selected(index)),
            Command::PlaySelected => self.play_selected().await,
            Command::Stop => self.stop().await.map(|_| Outcome::Stopped),
            Command::AddEntry(fields) => Ok(Outcome::Added(self.add_entry(fields))),
            Command::UpdateEntry(index, fields) => self
                .update_entry(index, fields)
                .map(|_| Outcome::Updated(index)),
            Command::DeleteEntry(index) => self.delete_entry(index).map(Outcome::Deleted),
            Command::BeginEdit => {
                self.begin_edit();
                Ok(Outcome::EditStarted)
            }
            Command::FinishEdit { keep } => Ok(Outcome::EditFinished {
                kept: keep,
                changed: self.finish_edit(keep),
            }),
            Command::Load(path) => {
                self.load(&path)?;
                Ok(Outcome::Loaded {
                    entries: self.store.list().len(),
                    path,
                })
            }
            Command::Save(path) => {
                self.save(&path)?;
                Ok(Outcome::Saved(path))
            }
        }
    }

    pub fn select(&mut self, index: usize) -> Result<(), CoreError> {
        let len = self.store.list().len();
        if index >= len {
            return Err(PlaylistError::Index { index, len }.into());
        }
        self.selected = Some(index);
        Ok(())
    }

    /// Restart the player on the selected entry's address.
    pub async fn play_selected(&mut self) -> Result<Outcome, CoreError> {
        let Some(entry) = self.selected_entry() else {
            warn!("Nothing selected to play");
            return Ok(Outcome::NothingToPlay);
        };
        let address = entry.address.clone();
        info!("Changing stream to {:?} ({})", entry.name, address);
        self.player.change(&address).await?;
        if self.player.is_playing() {
            Ok(Outcome::Playing(address))
        } else {
            Ok(Outcome::NothingToPlay)
        }
    }

    pub async fn stop(&mut self) -> Result<(), CoreError> {
        self.player.stop().await?;
        Ok(())
    }

    pub fn add_entry(&mut self, fields: EntryFields) -> usize {
        let index = self.store.add_entry(fields);
        if self.selected.is_none() {
            self.selected = Some(index);
        }
        index
    }

    pub fn update_entry(&mut self, index: usize, fields: EntryFields) -> Result<(), CoreError> {
        self.store.update_entry(index, fields)?;
        Ok(())
    }

    pub fn delete_entry(&mut self, index: usize) -> Result<StreamEntry, CoreError> {
        let removed = self.store.delete_entry(index)?;
        self.clamp_selection(Some(index));
        Ok(removed)
    }

    pub fn begin_edit(&mut self) {
        self.store.begin_edit();
    }

    /// Keep or throw away the edits made since `begin_edit`.
    pub fn finish_edit(&mut self, keep: bool) -> bool {
        let changed = self.store.finish_edit(keep);
        self.clamp_selection(None);
        changed
    }

    /// Replace the list with the file at `path`. The player keeps running.
    pub fn load(&mut self, path: &Path) -> Result<(), CoreError> {
        self.store.load_from(path)?;
        self.selected = (!self.store.list().is_empty()).then_some(0);
        Ok(())
    }

    pub fn save(&mut self, path: &Path) -> Result<(), CoreError> {
        self.store.save_to(path)?;
        Ok(())
    }

    pub fn quit_check(&self) -> QuitCheck {
        if self.store.is_dirty() {
            QuitCheck::ConfirmSave
        } else {
            QuitCheck::Clean
        }
    }

    /// Stop the player and remember the playlist and selection for next time.
    pub async fn shutdown(&mut self) -> Result<(), CoreError> {
        info!("Player shutting down...");
        let stopped = self.player.stop().await;

        let persistent = PersistentState {
            last_playlist: self.store.path().map(Path::to_path_buf),
            last_selected: self.selected,
        };
        persistent.save(&self.state_file).map_err(CoreError::State)?;
        stopped?;
        Ok(())
    }

    /// Keep the selection pointing at a valid row after the list shrank.
    /// `removed` is the index of a deleted row, if that is what happened.
    fn clamp_selection(&mut self, removed: Option<usize>) {
        let len = self.store.list().len();
        self.selected = match self.selected {
            _ if len == 0 => None,
            Some(sel) if removed.is_some_and(|r| r < sel) => Some(sel - 1),
            Some(sel) => Some(sel.min(len - 1)),
            None => Some(0),
        };
    }
}

fn startup_playlist(config: &Config, persistent: &PersistentState) -> PathBuf {
    persistent
        .last_playlist
        .as_ref()
        .filter(|p| p.exists())
        .cloned()
        .unwrap_or_else(|| config.playlist.default_file.clone())
}
