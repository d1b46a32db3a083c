use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What the app remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentState {
    #[serde(default)]
    pub last_playlist: Option<PathBuf>,
    #[serde(default)]
    pub last_selected: Option<usize>,
}

impl PersistentState {
    /// Missing or unreadable state means a fresh start.
    pub fn load(state_file: &Path) -> Self {
        if let Ok(content) = std::fs::read_to_string(state_file) {
            match serde_json::from_str::<PersistentState>(&content) {
                Ok(persistent) => return persistent,
                Err(e) => tracing::warn!("ignoring corrupt state file {:?}: {}", state_file, e),
            }
        }
        PersistentState::default()
    }

    pub fn save(&self, state_file: &Path) -> anyhow::Result<()> {
        if let Some(parent) = state_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(state_file, json)?;
        Ok(())
    }
}
