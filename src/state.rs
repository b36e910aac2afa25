//! Persistent recent/favorite script lists.
//!
//! The state document is loaded once when the store opens and rewritten in
//! full after every mutation. Entries are plain absolute paths; whether they
//! still point at scripts is checked when they are listed, and stale entries
//! stay on disk until a later write replaces the list.

use crate::catalog::{sort_scripts, Catalog, Script};
use crate::config::write_document;
use crate::error::{DeckError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the state document inside the app home
pub const STATE_FILE: &str = "scriptdeck_state.json";

/// The state document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Most-recent-first, no duplicates
    #[serde(default)]
    pub recent: Vec<String>,
    /// Set semantics; stored as a list
    #[serde(default)]
    pub favorites: Vec<String>,
}

impl State {
    /// Interpret arbitrary JSON as state; anything malformed reads as empty.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        let strings = |key: &str| -> Vec<String> {
            match map.get(key) {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
                _ => Vec::new(),
            }
        };
        Self {
            recent: strings("recent"),
            favorites: strings("favorites"),
        }
    }

    /// Move `path` to the front of `recent` and cut the list to `limit`
    pub fn push_recent(&mut self, path: &str, limit: usize) {
        self.recent.retain(|entry| entry != path);
        self.recent.insert(0, path.to_string());
        self.recent.truncate(limit);
    }

    /// Flip favorite membership; returns the new membership
    pub fn toggle_favorite(&mut self, path: &str) -> bool {
        if self.favorites.iter().any(|entry| entry == path) {
            self.favorites.retain(|entry| entry != path);
            false
        } else {
            self.favorites.push(path.to_string());
            true
        }
    }

    pub fn is_favorite(&self, path: &str) -> bool {
        self.favorites.iter().any(|entry| entry == path)
    }
}

/// Owner of the in-memory [`State`] and its document on disk.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
    state: State,
}

impl StateStore {
    /// Open `<home>/scriptdeck_state.json`
    pub fn open(home: &Path) -> Self {
        Self::with_path(home.join(STATE_FILE))
    }

    /// Open a state document at an explicit path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            state: State::default(),
        };
        store.load();
        store
    }

    /// Re-read the document; absent or corrupt content yields empty state.
    pub fn load(&mut self) -> &State {
        self.state = match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(value) => State::from_value(value),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "State document corrupt, starting empty");
                    State::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "State document not found, starting empty");
                State::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "State document unreadable, starting empty");
                State::default()
            }
        };
        &self.state
    }

    /// Write the in-memory state to disk. Callers may ignore failures.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.state)?;
        write_document(&self.path, &json)
            .map_err(|e| DeckError::state(format!("{}: {e}", self.path.display())))
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!(path = %self.path.display(), error = %e, "Failed to persist state");
        }
    }

    /// Record a run of `script`, bounded by `limit`, and persist
    pub fn add_recent(&mut self, script: &Path, limit: usize) {
        let key = Script::from_path(script).key();
        self.state.push_recent(&key, limit);
        debug!(path = %key, limit, "Recorded recent run");
        self.persist();
    }

    /// Flip favorite status of `script` and persist; returns the new status
    pub fn toggle_favorite(&mut self, script: &Path) -> bool {
        let key = Script::from_path(script).key();
        let now_favorite = self.state.toggle_favorite(&key);
        debug!(path = %key, favorite = now_favorite, "Toggled favorite");
        self.persist();
        now_favorite
    }

    pub fn is_favorite(&self, script: &Path) -> bool {
        self.state.is_favorite(&Script::from_path(script).key())
    }

    /// Recent scripts that still exist, most recent first, at most `limit`
    pub fn list_recent(&self, limit: usize, catalog: &Catalog) -> Vec<Script> {
        self.state
            .recent
            .iter()
            .map(Path::new)
            .filter(|path| catalog.is_script(path))
            .map(Script::from_path)
            .take(limit)
            .collect()
    }

    /// Favorite scripts that still exist, sorted by file name
    pub fn list_favorites(&self, catalog: &Catalog) -> Vec<Script> {
        let mut scripts: Vec<Script> = self
            .state
            .favorites
            .iter()
            .map(Path::new)
            .filter(|path| catalog.is_script(path))
            .map(Script::from_path)
            .collect();
        sort_scripts(&mut scripts);
        scripts
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
