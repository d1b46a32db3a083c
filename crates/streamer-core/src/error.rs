//! Error types for the playlist store, the player controller, and the core
//! command interface.

use std::path::PathBuf;
use std::time::Duration;

/// Errors raised by the stream list store.
#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    /// The playlist file could not be opened for reading.
    #[error("cannot open playlist {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header row does not name one of the required columns.
    #[error("playlist header is missing the `{0}` column")]
    MissingColumn(&'static str),

    /// A data row is too short to supply one of the required fields.
    #[error("playlist line {line} has no `{field}` field")]
    MissingField { line: u64, field: &'static str },

    /// The CSV reader rejected the file.
    #[error("malformed playlist: {0}")]
    Csv(#[from] csv::Error),

    /// The destination could not be written.
    #[error("cannot write playlist {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An edit targeted a position outside the list.
    #[error("entry index {index} out of range (list has {len} entries)")]
    Index { index: usize, len: usize },
}

/// Errors raised by the player process controller.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// The platform identifier matches no known invocation form.
    #[error("unsupported platform `{0}`: no player invocation form known")]
    UnsupportedPlatform(String),

    /// The external player could not be launched.
    #[error("failed to launch player `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Killing the running player failed.
    #[error("failed to stop player: {0}")]
    Kill(#[source] std::io::Error),

    /// The killed player did not exit within the configured bound.
    #[error("player did not exit within {0:?}")]
    ShutdownTimeout(Duration),
}

/// Anything the core command interface can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Playlist(#[from] PlaylistError),

    #[error(transparent)]
    Player(#[from] PlayerError),

    /// Persisting session state failed.
    #[error("failed to persist session state: {0}")]
    State(#[source] anyhow::Error),
}

impl CoreError {
    /// True for caller-contract violations (bad index) as opposed to
    /// environmental failures the user should simply be warned about.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Playlist(PlaylistError::Index { .. }))
    }
}
