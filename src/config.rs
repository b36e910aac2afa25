//! Configuration document handling.
//!
//! The configuration is a single pretty-printed JSON document living in the app
//! home. Loading never fails: an absent, unreadable or non-object document is
//! replaced by defaults, and every other document is migrated field by field so
//! that old or hand-edited files keep working.

use crate::catalog::resolve_path;
use crate::error::{DeckError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the configuration document inside the app home
pub const CONFIG_FILE: &str = "scriptdeck_config.json";

/// Directory names skipped by recursive search out of the box
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".venv",
    "venv",
    "__pycache__",
    ".git",
    ".pytest_cache",
    ".mypy_cache",
    ".idea",
    ".vscode",
];

/// Default bound of the recent-run list
pub const DEFAULT_RECENT_LIMIT: usize = 15;

/// Default number of lines shown by the code preview before paging kicks in
pub const DEFAULT_PREVIEW_LINES: usize = 200;

#[cfg(windows)]
const DEFAULT_INTERPRETER: &str = "python";
#[cfg(not(windows))]
const DEFAULT_INTERPRETER: &str = "python3";

/// Typed configuration document.
///
/// Keys unknown to this version are collected into `extra` and written back
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub app_name: String,
    /// Root under which unit directories live; always absolute after load
    pub base_dir: PathBuf,
    /// Menu key -> unit directory name under `base_dir`
    pub units: BTreeMap<String, String>,
    pub show_hidden_folders: bool,
    /// Editor command line; the path is appended as the final argument.
    /// Empty means the platform default opener.
    pub preferred_editor: String,
    /// Event log file name, relative to the app home
    pub log_file: String,
    pub confirm_before_run: bool,
    pub code_preview_lines: usize,
    pub ignore_dirs: Vec<String>,
    pub recent_limit: usize,
    pub favorites_enabled: bool,
    pub ask_args_before_run: bool,
    pub open_unit_folder_shortcut: bool,
    /// Program that runs scripts: `<interpreter> <script> <args...>`
    pub interpreter: String,
    /// Recognized script extensions, without the dot, matched case-insensitively
    pub script_extensions: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Config {
    /// Default document rooted at `base_dir`
    pub fn defaults(base_dir: &Path) -> Self {
        let units = [("1", "Unit 1"), ("2", "Unit 2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            app_name: "Script Deck".to_string(),
            base_dir: base_dir.to_path_buf(),
            units,
            show_hidden_folders: false,
            preferred_editor: "code -n".to_string(),
            log_file: "scriptdeck.log".to_string(),
            confirm_before_run: true,
            code_preview_lines: DEFAULT_PREVIEW_LINES,
            ignore_dirs: DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            favorites_enabled: true,
            ask_args_before_run: true,
            open_unit_folder_shortcut: true,
            interpreter: DEFAULT_INTERPRETER.to_string(),
            script_extensions: vec!["py".to_string()],
            extra: Map::new(),
        }
    }

    /// Directory of the unit registered under `key`
    pub fn unit_path(&self, key: &str) -> Option<PathBuf> {
        self.units.get(key).map(|name| self.base_dir.join(name))
    }
}

/// Merge a loaded document over the defaults, one key at a time.
///
/// A key is kept when it deserializes in the position of its default,
/// otherwise the default value takes its place. Unknown keys pass through.
pub fn migrate(document: Map<String, Value>, defaults: &Config) -> Result<Config> {
    let template = match serde_json::to_value(defaults)? {
        Value::Object(map) => map,
        _ => return Err(DeckError::config("default configuration is not an object")),
    };

    let mut merged = document;
    for (key, default_value) in &template {
        let accepted = merged
            .get(key)
            .is_some_and(|value| field_accepts(&template, key, value));
        if !accepted {
            if merged.contains_key(key) {
                warn!(key = %key, "Invalid configuration value replaced by default");
            } else {
                debug!(key = %key, "Missing configuration key filled from default");
            }
            merged.insert(key.clone(), default_value.clone());
        }
    }

    let mut config: Config = serde_json::from_value(Value::Object(merged))?;
    if config.recent_limit == 0 {
        warn!("recent_limit must be positive, using default");
        config.recent_limit = defaults.recent_limit;
    }
    Ok(config)
}

fn field_accepts(template: &Map<String, Value>, key: &str, value: &Value) -> bool {
    let mut candidate = template.clone();
    candidate.insert(key.to_string(), value.clone());
    serde_json::from_value::<Config>(Value::Object(candidate)).is_ok()
}

/// Expand `~`, anchor relative paths at `home`, and resolve.
pub fn resolve_base_dir(raw: &Path, home: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(&raw.to_string_lossy()).as_ref());
    let anchored = if expanded.is_relative() {
        home.join(expanded)
    } else {
        expanded
    };
    resolve_path(&anchored)
}

/// Owner of the in-memory configuration and its document on disk.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    home: PathBuf,
    config: Config,
}

impl ConfigStore {
    /// Open `<home>/scriptdeck_config.json`, creating or migrating it
    pub fn open(home: &Path) -> Self {
        Self::with_path(home.join(CONFIG_FILE), home)
    }

    /// Open a configuration document at an explicit path
    pub fn with_path(path: impl Into<PathBuf>, home: &Path) -> Self {
        let home = resolve_path(home);
        let mut store = Self {
            path: path.into(),
            config: Config::defaults(&home),
            home,
        };
        store.load();
        store
    }

    /// Re-read the document from disk.
    ///
    /// Always succeeds; the merged result is persisted immediately.
    pub fn load(&mut self) -> &Config {
        let defaults = Config::defaults(&self.home);

        let mut config = match self.read_document() {
            Some(document) => migrate(document, &defaults).unwrap_or_else(|e| {
                warn!(error = %e, "Configuration could not be migrated, using defaults");
                defaults.clone()
            }),
            None => defaults,
        };
        config.base_dir = resolve_base_dir(&config.base_dir, &self.home);
        self.config = config;

        if let Err(e) = self.save() {
            warn!(path = %self.path.display(), error = %e, "Failed to persist configuration");
        }
        &self.config
    }

    fn read_document(&self) -> Option<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    info!(path = %self.path.display(), "Configuration not found, creating defaults");
                } else {
                    warn!(path = %self.path.display(), error = %e, "Configuration unreadable, using defaults");
                }
                return None;
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => {
                warn!(path = %self.path.display(), "Configuration is not a JSON object, using defaults");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Configuration is corrupt, using defaults");
                None
            }
        }
    }

    /// Write the in-memory configuration to disk.
    ///
    /// Failures leave the in-memory copy authoritative; callers may ignore them.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.config)?;
        write_document(&self.path, &json)
    }

    /// Replace the configuration and persist it
    pub fn replace(&mut self, config: Config) -> Result<()> {
        self.config = config;
        self.save()
    }

    /// Reset a `base_dir` that no longer exists to the app home.
    ///
    /// Returns true when a reset happened.
    pub fn heal_base_dir(&mut self) -> bool {
        if self.config.base_dir.is_dir() {
            return false;
        }
        warn!(
            missing = %self.config.base_dir.display(),
            home = %self.home.display(),
            "base_dir does not exist, resetting to app home"
        );
        self.config.base_dir = self.home.clone();
        if let Err(e) = self.save() {
            warn!(error = %e, "Failed to persist healed base_dir");
        }
        true
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The app home: anchor for relative paths and fallback `base_dir`
    pub fn home(&self) -> &Path {
        &self.home
    }
}

/// Replace a document on disk in one step (write temp file, then rename).
pub(crate) fn write_document(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;
    debug!(path = %path.display(), bytes = json.len(), "Document written");
    Ok(())
}
