//! App: component-based event loop.
//!
//! - `App` owns the `RadioCore`, the components and `AppState`.
//! - Terminal events and log lines arrive over channels; a 100ms tick
//!   expires toasts.
//! - Components return `Vec<Action>`; `dispatch` turns each Action into
//!   core `Command`s, dialogs, or both.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use streamer_core::dialog::NativePicker;
use streamer_core::player::{Launcher, ProcessLauncher};
use streamer_core::{Command, CoreError, Outcome, PlaylistError, QuitCheck, RadioCore};

use crate::{
    action::{Action, Answer, ConfirmKind, FormPurpose, PathPurpose},
    app_state::AppState,
    component::Component,
    components::{
        confirm::ConfirmDialog, entry_form::EntryForm, help_overlay::HelpOverlay,
        path_prompt::PathPrompt, station_list::StationList,
    },
    theme::style_default,
    widgets::{
        status_bar::{draw_keys_bar, draw_log_bar, draw_separator},
        toast::ToastManager,
    },
};

/// Messages arriving from background tasks.
pub enum AppMessage {
    Event(Event),
    Log(String),
}

/// The dialog that currently owns the keyboard.
enum Modal {
    Form(EntryForm),
    Confirm(ConfirmDialog),
    Prompt(PathPrompt),
    Help(HelpOverlay),
}

impl Modal {
    fn component(&mut self) -> &mut dyn Component {
        match self {
            Modal::Form(c) => c,
            Modal::Confirm(c) => c,
            Modal::Prompt(c) => c,
            Modal::Help(c) => c,
        }
    }
}

pub struct App<L: Launcher = ProcessLauncher> {
    core: RadioCore<L>,
    state: AppState,
    station_list: StationList,
    modal: Option<Modal>,
    toast: ToastManager,
    native_dialogs: bool,
    should_quit: bool,
}

impl<L: Launcher> App<L> {
    pub fn new(core: RadioCore<L>, native_dialogs: bool) -> Self {
        let mut app = Self {
            core,
            state: AppState::default(),
            station_list: StationList::new(),
            modal: None,
            toast: ToastManager::new(),
            native_dialogs,
            should_quit: false,
        };
        app.sync();
        app
    }

    /// Surface a playlist that failed to load at startup.
    pub fn report_load_error(&mut self, e: &PlaylistError) {
        self.toast.warning(format!("Can not open playlist: {}", e));
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self, mut log_rx: mpsc::UnboundedReceiver<String>) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background task: log lines for the status bar ─────────────────────
        tokio::spawn(async move {
            while let Some(line) = log_rx.recv().await {
                if tx.send(AppMessage::Log(line)).await.is_err() {
                    break;
                }
            }
        });

        match self.core.startup().await {
            Ok(outcome) => self.report(&outcome),
            Err(e) => self.report_error(&e),
        }
        self.sync();

        let result = self.event_loop(&mut terminal, &mut rx).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        if let Err(e) = self.core.shutdown().await {
            error!("shutdown failed: {}", e);
        }
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        rx: &mut mpsc::Receiver<AppMessage>,
    ) -> anyhow::Result<()> {
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    self.handle_message(msg).await;
                    needs_redraw = true;
                }

                _ = toast_tick.tick() => {
                    needs_redraw = self.toast.tick();
                }
            }
        }
        Ok(())
    }

    async fn handle_message(&mut self, msg: AppMessage) {
        let actions = match msg {
            AppMessage::Event(Event::Key(key)) => self.handle_key(key),
            AppMessage::Event(Event::Mouse(mouse)) if self.modal.is_none() => {
                self.station_list.handle_mouse(mouse, &self.state)
            }
            AppMessage::Event(_) => vec![],
            AppMessage::Log(line) => {
                self.state.last_log = Some(line);
                vec![]
            }
        };
        for action in actions {
            self.dispatch(action).await;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![Action::Quit];
        }
        if let Some(modal) = self.modal.as_mut() {
            return modal.component().handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') => vec![Action::Quit],
            KeyCode::Char('?') => vec![Action::ToggleHelp],
            KeyCode::Char('s') => vec![Action::Stop],
            KeyCode::Char('o') => vec![Action::OpenPlaylist],
            KeyCode::Char('w') => vec![Action::SavePlaylist],
            KeyCode::Char('m') => vec![Action::ToggleManage],
            KeyCode::Esc if self.state.managing => vec![Action::ToggleManage],
            _ => self.station_list.handle_key(key, &self.state),
        }
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    pub async fn dispatch(&mut self, action: Action) {
        debug!("dispatch: {:?}", action);
        match action {
            Action::SelectUp(_)
            | Action::SelectDown(_)
            | Action::SelectFirst
            | Action::SelectLast
            | Action::SelectIndex(_) => {
                if let Some(index) = self.state.selection_target(&action) {
                    self.exec(Command::Select(index)).await;
                }
            }

            Action::PlaySelected => {
                self.exec(Command::PlaySelected).await;
            }
            Action::Stop => {
                self.exec(Command::Stop).await;
            }

            Action::OpenPlaylist => self.request_path(PathPurpose::Open).await,
            Action::SavePlaylist => self.request_path(PathPurpose::Save).await,
            Action::PathChosen(purpose, path) => self.path_chosen(purpose, path).await,

            Action::ToggleManage => {
                if self.state.managing {
                    self.modal = Some(Modal::Confirm(ConfirmDialog::new(ConfirmKind::KeepEdits {
                        then_quit: false,
                    })));
                } else {
                    self.exec(Command::BeginEdit).await;
                }
            }
            Action::AddEntry => {
                self.modal = Some(Modal::Form(EntryForm::new(FormPurpose::Add, None)));
            }
            Action::EditEntry => match self.state.selected {
                Some(index) => {
                    let form = EntryForm::new(FormPurpose::Edit(index), self.state.selected_entry());
                    self.modal = Some(Modal::Form(form));
                }
                None => self.toast.warning("Nothing selected"),
            },
            Action::DeleteEntry => match self.state.selected {
                Some(index) => {
                    self.exec(Command::DeleteEntry(index)).await;
                }
                None => self.toast.warning("Nothing selected"),
            },
            Action::SubmitEntry(purpose, fields) => {
                self.modal = None;
                match purpose {
                    FormPurpose::Add => {
                        if let Some(Outcome::Added(index)) =
                            self.exec(Command::AddEntry(fields)).await
                        {
                            self.exec(Command::Select(index)).await;
                        }
                    }
                    FormPurpose::Edit(index) => {
                        self.exec(Command::UpdateEntry(index, fields)).await;
                    }
                }
            }

            Action::Answered(kind, answer) => self.answered(kind, answer).await,
            Action::CloseModal => self.modal = None,
            Action::ToggleHelp => {
                self.modal = match self.modal {
                    Some(Modal::Help(_)) => None,
                    _ => Some(Modal::Help(HelpOverlay)),
                };
            }

            Action::Quit => self.begin_quit(),
        }
        self.state.modal_open = self.modal.is_some();
    }

    /// Run one core command, toast its result and refresh the snapshot.
    async fn exec(&mut self, command: Command) -> Option<Outcome> {
        let result = self.core.handle(command).await;
        let outcome = match result {
            Ok(outcome) => {
                self.report(&outcome);
                Some(outcome)
            }
            Err(e) => {
                self.report_error(&e);
                None
            }
        };
        self.sync();
        outcome
    }

    fn sync(&mut self) {
        self.state.sync(&self.core);
        self.state.modal_open = self.modal.is_some();
    }

    fn report(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Playing(_) => {
                if let Some(entry) = self.core.selected_entry() {
                    self.toast.info(format!("Playing {}", entry.name));
                }
            }
            Outcome::Stopped => self.toast.info("Stopped"),
            Outcome::Added(_) => self.toast.success("Stream added"),
            Outcome::Updated(_) => self.toast.success("Stream updated"),
            Outcome::Deleted(entry) => self.toast.info(format!("Deleted {}", entry.name)),
            Outcome::EditStarted => self.toast.info("Managing playlist"),
            Outcome::EditFinished { kept: true, changed } => {
                if *changed {
                    self.toast.success("Playlist changes kept");
                }
            }
            Outcome::EditFinished { kept: false, .. } => {
                self.toast.info("Playlist changes discarded")
            }
            Outcome::Loaded { entries, .. } => {
                self.toast.success(format!("Loaded {} streams", entries))
            }
            Outcome::Saved(path) => self.toast.success(format!("Saved {}", path.display())),
            Outcome::Selected(_) | Outcome::NothingToPlay => {}
        }
    }

    fn report_error(&mut self, e: &CoreError) {
        if e.is_contract_violation() {
            error!("{}", e);
        } else {
            warn!("{}", e);
        }
        self.toast.error(e.to_string());
    }

    // ── File paths ────────────────────────────────────────────────────────────

    async fn request_path(&mut self, purpose: PathPurpose) {
        if !self.native_dialogs {
            let initial = self
                .core
                .playlist_path()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("plylist.csv"));
            self.modal = Some(Modal::Prompt(PathPrompt::new(purpose, &initial)));
            return;
        }

        let store = self.core.store();
        // The native chooser blocks until the user closes it.
        let chosen = tokio::task::block_in_place(|| match purpose {
            PathPurpose::Open => store.select_path_for_open(&NativePicker),
            PathPurpose::Save | PathPurpose::SaveThenQuit => {
                store.select_path_for_save(&NativePicker)
            }
        });

        match chosen {
            Some(path) => self.path_chosen(purpose, path).await,
            None => {
                info!("file chooser cancelled");
                if purpose == PathPurpose::SaveThenQuit {
                    self.toast.info("Quit cancelled");
                }
            }
        }
    }

    async fn path_chosen(&mut self, purpose: PathPurpose, path: PathBuf) {
        self.modal = None;
        match purpose {
            PathPurpose::Open => {
                self.exec(Command::Load(path)).await;
            }
            PathPurpose::Save => {
                self.exec(Command::Save(path)).await;
            }
            PathPurpose::SaveThenQuit => {
                if self.exec(Command::Save(path)).await.is_some() {
                    self.should_quit = true;
                }
            }
        }
    }

    // ── Quit flow ─────────────────────────────────────────────────────────────

    fn begin_quit(&mut self) {
        if self.state.managing {
            self.modal = Some(Modal::Confirm(ConfirmDialog::new(ConfirmKind::KeepEdits {
                then_quit: true,
            })));
            return;
        }
        match self.core.quit_check() {
            QuitCheck::Clean => self.should_quit = true,
            QuitCheck::ConfirmSave => {
                self.modal = Some(Modal::Confirm(ConfirmDialog::new(
                    ConfirmKind::SaveBeforeQuit,
                )));
            }
        }
    }

    async fn answered(&mut self, kind: ConfirmKind, answer: Answer) {
        self.modal = None;
        match (kind, answer) {
            (ConfirmKind::KeepEdits { then_quit }, Answer::Yes | Answer::No) => {
                self.exec(Command::FinishEdit {
                    keep: answer == Answer::Yes,
                })
                .await;
                if then_quit {
                    self.begin_quit();
                }
            }
            (ConfirmKind::KeepEdits { .. }, Answer::Cancel) => {}
            (ConfirmKind::SaveBeforeQuit, Answer::Yes) => {
                self.request_path(PathPurpose::SaveThenQuit).await;
            }
            (ConfirmKind::SaveBeforeQuit, Answer::No) => self.should_quit = true,
            (ConfirmKind::SaveBeforeQuit, Answer::Cancel) => self.toast.info("Quit cancelled"),
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(style_default()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.station_list.draw(frame, chunks[0], &self.state);
        draw_separator(frame, chunks[1]);
        draw_log_bar(
            frame,
            chunks[2],
            self.state.last_log.as_deref(),
            self.state.is_playing(),
        );
        draw_keys_bar(frame, chunks[3], self.state.input_mode());

        if let Some(modal) = self.modal.as_mut() {
            modal.component().draw(frame, area, &self.state);
        }
        self.toast.draw(frame, chunks[0]);
    }
}
