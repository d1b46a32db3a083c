use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playlist: PlaylistConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Where the stream list comes from at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistConfig {
    /// Playlist loaded at startup when no previous session points elsewhere.
    /// Relative paths resolve against the working directory.
    #[serde(default = "default_playlist_file")]
    pub default_file: PathBuf,
}

/// External player invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Command name looked up on PATH (Unix-like platforms).
    #[serde(default = "default_player_command")]
    pub command: String,
    /// Full path to the player executable (Windows).
    #[serde(default = "default_windows_path")]
    pub windows_path: PathBuf,
    /// Start the selected stream as soon as the app opens.
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
    /// Upper bound on waiting for a killed player to exit.
    /// Unset means wait for as long as it takes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Use the desktop's native file chooser for load/save; when false the
    /// TUI asks for a path on its prompt line.
    #[serde(default = "default_native_dialogs")]
    pub native_dialogs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Session state (last playlist, last selection).
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    /// Log output of the TUI.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            default_file: default_playlist_file(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: default_player_command(),
            windows_path: default_windows_path(),
            autoplay: default_autoplay(),
            stop_timeout_secs: None,
        }
    }
}

impl PlayerConfig {
    pub fn stop_timeout(&self) -> Option<Duration> {
        self.stop_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            native_dialogs: default_native_dialogs(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            log_file: default_log_file(),
        }
    }
}

fn default_playlist_file() -> PathBuf {
    PathBuf::from("plylist.csv")
}

fn default_player_command() -> String {
    "cvlc".to_string()
}

fn default_windows_path() -> PathBuf {
    PathBuf::from("C:/Program Files (x86)/VideoLAN/VLC/vlc.exe")
}

fn default_autoplay() -> bool {
    true
}

fn default_native_dialogs() -> bool {
    true
}

fn default_state_file() -> PathBuf {
    platform::data_dir().join("state.json")
}

fn default_log_file() -> PathBuf {
    platform::data_dir().join("playradio.log")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.playlist.default_file, PathBuf::from("plylist.csv"));
        assert_eq!(config.player.command, "cvlc");
        assert!(config.player.windows_path.ends_with("vlc.exe"));
        assert!(config.player.autoplay);
        assert!(config.player.stop_timeout().is_none());
        assert!(config.ui.native_dialogs);
        assert!(config.paths.state_file.ends_with("playradio/state.json"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [player]
            command = "vlc"
            stop_timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.player.command, "vlc");
        assert_eq!(config.player.stop_timeout(), Some(Duration::from_secs(3)));
        assert!(config.player.autoplay);
        assert_eq!(config.playlist.default_file, PathBuf::from("plylist.csv"));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.ui.native_dialogs = false;
        config.playlist.default_file = PathBuf::from("/srv/radio/list.csv");
        let text = toml::to_string_pretty(&config).unwrap();
        let back = Config::from_toml_str(&text).unwrap();
        assert!(!back.ui.native_dialogs);
        assert_eq!(back.playlist.default_file, config.playlist.default_file);
    }
}
