//! Action enum: all user-initiated intents the App dispatches.

use std::path::PathBuf;

use streamer_core::EntryFields;

/// Which question a confirmation dialog is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    /// "Keep playlist changes?" at the end of a manage session.
    KeepEdits { then_quit: bool },
    /// "Save current playlist?" when quitting with unsaved changes.
    SaveBeforeQuit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Cancel,
}

/// What a requested file path will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPurpose {
    Open,
    Save,
    SaveThenQuit,
}

/// What the entry form is filling in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPurpose {
    Add,
    Edit(usize),
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    SelectUp(usize),
    SelectDown(usize),
    SelectFirst,
    SelectLast,
    SelectIndex(usize),

    // ── Playback ─────────────────────────────────────────────────────────────
    PlaySelected,
    Stop,

    // ── Playlist file ────────────────────────────────────────────────────────
    OpenPlaylist,
    SavePlaylist,
    PathChosen(PathPurpose, PathBuf),

    // ── Editing ──────────────────────────────────────────────────────────────
    ToggleManage,
    AddEntry,
    EditEntry,
    DeleteEntry,
    SubmitEntry(FormPurpose, EntryFields),

    // ── Dialogs ──────────────────────────────────────────────────────────────
    Answered(ConfirmKind, Answer),
    CloseModal,
    ToggleHelp,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
