//! Persisted process-wide state.
//!
//! A small JSON document at `~/.leettutor/state.json` that survives between
//! invocations: whether the welcome notice was shown, and which notebook is
//! currently the active target.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::config_dir;
use crate::error::{LeetTutorError, Result};

/// State file name inside the config directory.
const STATE_FILE_NAME: &str = "state.json";

/// Persisted key-value state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Set once the first-run welcome notice has been printed.
    #[serde(default)]
    pub welcome_shown: bool,

    /// Notebook targeted by commands that are not given one explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_notebook: Option<PathBuf>,
}

/// Reads and writes [`AppState`] at a fixed path.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store at the default location (`~/.leettutor/state.json`).
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(config_dir()?.join(STATE_FILE_NAME)))
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state. A missing file yields the default state; an unreadable
    /// one is logged and also treated as default.
    pub fn load(&self) -> AppState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return AppState::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "state file unreadable");
                return AppState::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "state file malformed");
            AppState::default()
        })
    }

    /// Persist the state, creating the parent directory if needed.
    pub fn save(&self, state: &AppState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LeetTutorError::io(parent, e))?;
        }
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| LeetTutorError::validation(format!("state serialization: {e}")))?;
        std::fs::write(&self.path, content).map_err(|e| LeetTutorError::io(&self.path, e))
    }

    /// Check-and-set the welcome flag. Returns `true` exactly once: on the
    /// first call against a fresh state.
    pub fn take_first_run(&self) -> Result<bool> {
        let mut state = self.load();
        if state.welcome_shown {
            return Ok(false);
        }
        state.welcome_shown = true;
        self.save(&state)?;
        Ok(true)
    }

    /// Record `path` as the active notebook.
    pub fn set_active_notebook(&self, path: &Path) -> Result<()> {
        let mut state = self.load();
        state.active_notebook = Some(path.to_path_buf());
        self.save(&state)
    }
}
