//! Path management for huddle configuration and state files.
//!
//! ```text
//! ~/.config/huddle/                 # Config directory
//! └── config.toml                   # Client configuration
//!
//! ~/.local/share/huddle/            # State directory (overridable)
//! ├── credential.toml               # token / role / user id (0600)
//! ├── conversation_session.toml     # server conversation id
//! └── logs/
//!     └── huddle.log.YYYY-MM-DD
//! ```

use huddle_core::error::HuddleError;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "huddle";

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const CREDENTIAL_FILE_NAME: &str = "credential.toml";
pub const SESSION_FILE_NAME: &str = "conversation_session.toml";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config or data directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for HuddleError {
    fn from(err: PathError) -> Self {
        HuddleError::config(err.to_string())
    }
}

/// Resolves where huddle keeps its files.
pub struct HuddlePaths;

impl HuddlePaths {
    /// Returns the huddle configuration directory (e.g. `~/.config/huddle/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Returns the default state directory (e.g. `~/.local/share/huddle/`).
    pub fn default_state_dir() -> Result<PathBuf, PathError> {
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns `override_dir` when set, otherwise the default state directory.
    pub fn state_dir(override_dir: Option<&Path>) -> Result<PathBuf, PathError> {
        match override_dir {
            Some(dir) => Ok(dir.to_path_buf()),
            None => Self::default_state_dir(),
        }
    }

    pub fn credential_file(state_dir: &Path) -> PathBuf {
        state_dir.join(CREDENTIAL_FILE_NAME)
    }

    pub fn session_file(state_dir: &Path) -> PathBuf {
        state_dir.join(SESSION_FILE_NAME)
    }

    pub fn logs_dir(state_dir: &Path) -> PathBuf {
        state_dir.join("logs")
    }
}
