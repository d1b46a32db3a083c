//! Core of the Play Radio front end: the editable stream list and the
//! external player process it drives.

pub mod config;
pub mod core;
pub mod dialog;
pub mod error;
pub mod platform;
pub mod player;
pub mod playlist;
pub mod state;

pub use crate::core::{Command, Outcome, QuitCheck, RadioCore};
pub use crate::error::{CoreError, PlayerError, PlaylistError};
pub use crate::playlist::{EntryFields, PlaylistStore, StreamEntry, StreamList};
