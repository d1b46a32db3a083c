use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::PlayerError;

const APP_DIR: &str = "playradio";

/// Operating-system family, used only to pick the player invocation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// Platform of the running binary.
    pub fn current() -> Result<Self, PlayerError> {
        Self::from_identifier(std::env::consts::FAMILY)
    }

    /// Map a platform identifier to an invocation family.
    ///
    /// Accepts the `std::env::consts::FAMILY` values as well as the
    /// `posix` / `nt` spellings used by other runtimes.
    pub fn from_identifier(id: &str) -> Result<Self, PlayerError> {
        match id {
            "unix" | "posix" | "linux" | "macos" => Ok(Self::Unix),
            "windows" | "nt" => Ok(Self::Windows),
            other => Err(PlayerError::UnsupportedPlatform(other.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix => f.write_str("unix"),
            Self::Windows => f.write_str("windows"),
        }
    }
}

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/playradio/ (XDG standard)
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join(APP_DIR)
    }
    #[cfg(windows)]
    {
        // Portable installs keep a data/ folder beside the executable
        if let Some(dir) = exe_dir() {
            let portable_data = dir.join("data");
            if portable_data.exists() {
                return portable_data;
            }
        }

        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(windows)]
    {
        if let Some(dir) = exe_dir() {
            if dir.join("config.toml").exists() {
                return dir;
            }
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    // On macOS and Linux, always use ~/.config/playradio/
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }
}

#[cfg(windows)]
fn exe_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

/// Locate the external player so a missing install can be reported at
/// startup instead of on the first play.
///
/// `program` is either a bare command name (searched on `PATH`) or a path.
pub fn find_player_binary(program: &str) -> Option<PathBuf> {
    let direct = Path::new(program);
    if direct.components().count() > 1 || direct.is_absolute() {
        return direct.exists().then(|| direct.to_path_buf());
    }
    find_on_path(program)
}

fn find_on_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path) {
        let p = dir.join(name);
        if p.is_file() {
            return Some(p);
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{}.exe", name));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}
