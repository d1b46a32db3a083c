//! File chooser seam. The store asks a [`PathPicker`] for paths and never
//! talks to a windowing toolkit itself.

use std::path::{Path, PathBuf};

use tracing::debug;

/// One entry of a chooser's file-type dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

/// Filters offered when opening or saving a playlist.
pub const PLAYLIST_FILTERS: &[FileFilter] = &[
    FileFilter {
        name: "CSV File",
        extensions: &["csv"],
    },
    FileFilter {
        name: "Text File",
        extensions: &["txt"],
    },
    FileFilter {
        name: "All Files",
        extensions: &["*"],
    },
];

/// What the chooser should show.
#[derive(Debug, Clone)]
pub struct PickRequest<'a> {
    pub title: &'a str,
    pub initial_dir: &'a Path,
    pub filters: &'a [FileFilter],
    /// Suggested file name (save only).
    pub file_name: Option<&'a str>,
}

pub trait PathPicker {
    /// Ask for an existing file. `None` when the user cancels.
    fn pick_open(&self, request: &PickRequest<'_>) -> Option<PathBuf>;

    /// Ask for a save destination. `None` when the user cancels.
    fn pick_save(&self, request: &PickRequest<'_>) -> Option<PathBuf>;
}

/// The desktop's native file chooser.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativePicker;

impl NativePicker {
    fn dialog(request: &PickRequest<'_>) -> rfd::FileDialog {
        let mut dialog = rfd::FileDialog::new()
            .set_title(request.title)
            .set_directory(request.initial_dir);
        for filter in request.filters {
            dialog = dialog.add_filter(filter.name, filter.extensions);
        }
        dialog
    }
}

impl PathPicker for NativePicker {
    fn pick_open(&self, request: &PickRequest<'_>) -> Option<PathBuf> {
        debug!("opening native file chooser in {:?}", request.initial_dir);
        Self::dialog(request).pick_file()
    }

    fn pick_save(&self, request: &PickRequest<'_>) -> Option<PathBuf> {
        debug!("opening native save chooser in {:?}", request.initial_dir);
        let mut dialog = Self::dialog(request);
        if let Some(name) = request.file_name {
            dialog = dialog.set_file_name(name);
        }
        dialog.save_file()
    }
}
