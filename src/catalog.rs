//! Directory catalog: units, folders and scripts under `base_dir`.
//!
//! Listings are derived from the filesystem on every call and never fail: a
//! missing or unreadable directory simply lists as empty.

use crate::config::Config;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A configured unit: menu key, display name and its directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub key: String,
    pub name: String,
    pub path: PathBuf,
}

/// A subdirectory of a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub name: String,
    pub path: PathBuf,
}

/// A runnable script file, identified by its resolved path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Script {
    pub name: String,
    pub path: PathBuf,
}

impl Script {
    /// Build a script from any path; the path is resolved
    pub fn from_path(path: &Path) -> Self {
        let path = resolve_path(path);
        let name = file_name_of(&path);
        Self { name, path }
    }

    /// Directory the script runs in
    pub fn folder(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Stable string form used in the state document
    pub fn key(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Read-only view of the directory tree, built from a [`Config`].
#[derive(Debug, Clone)]
pub struct Catalog {
    base_dir: PathBuf,
    units: BTreeMap<String, String>,
    show_hidden_folders: bool,
    ignore_dirs: HashSet<String>,
    extensions: Vec<String>,
}

impl Catalog {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_dir: config.base_dir.clone(),
            units: config.units.clone(),
            show_hidden_folders: config.show_hidden_folders,
            ignore_dirs: config.ignore_dirs.iter().cloned().collect(),
            extensions: config
                .script_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// One entry per configured unit, ordered by key
    pub fn units(&self) -> Vec<Unit> {
        self.units
            .iter()
            .map(|(key, name)| Unit {
                key: key.clone(),
                name: name.clone(),
                path: self.base_dir.join(name),
            })
            .collect()
    }

    pub fn unit(&self, key: &str) -> Option<Unit> {
        self.units.get(key).map(|name| Unit {
            key: key.to_string(),
            name: name.clone(),
            path: self.base_dir.join(name),
        })
    }

    /// Immediate subdirectories of `unit_path`, case-insensitively sorted.
    ///
    /// Dot-directories are hidden unless `show_hidden_folders` is set.
    pub fn folders(&self, unit_path: &Path) -> Vec<Folder> {
        let mut folders: Vec<Folder> = read_entries(unit_path)
            .into_iter()
            .filter(|path| path.is_dir())
            .filter_map(|path| {
                let name = file_name_of(&path);
                if !self.show_hidden_folders && name.starts_with('.') {
                    return None;
                }
                Some(Folder { name, path })
            })
            .collect();
        folders.sort_by(|a, b| compare_names(&a.name, &b.name));
        folders
    }

    /// Immediate script files of `folder`, case-insensitively sorted
    pub fn scripts(&self, folder: &Path) -> Vec<Script> {
        let mut scripts: Vec<Script> = read_entries(folder)
            .into_iter()
            .filter(|path| self.is_script(path))
            .map(|path| Script::from_path(&path))
            .collect();
        sort_scripts(&mut scripts);
        scripts
    }

    /// Whether `path` is an existing file with a recognized extension whose
    /// name does not start with `__`.
    pub fn is_script(&self, path: &Path) -> bool {
        path.is_file() && self.has_script_name(path)
    }

    pub(crate) fn has_script_name(&self, path: &Path) -> bool {
        let name = file_name_of(path);
        if name.starts_with("__") {
            return false;
        }
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|known| *known == ext))
    }

    pub(crate) fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignore_dirs.contains(name)
    }
}

/// Entries of a directory; unreadable or missing directories yield nothing.
pub(crate) fn read_entries(dir: &Path) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect(),
        Err(e) => {
            debug!(path = %dir.display(), error = %e, "Directory not listable, treating as empty");
            Vec::new()
        }
    }
}

/// Case-insensitive name order, with the raw name as tie breaker
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub fn sort_scripts(scripts: &mut [Script]) {
    scripts.sort_by(|a, b| compare_names(&a.name, &b.name));
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Absolute, resolved form of `path`.
///
/// Existing paths are canonicalized; anything else is made absolute against
/// the current directory without touching the filesystem.
pub fn resolve_path(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// `path` relative to `base` for display, or the full path when outside it
pub fn relative_to(path: &Path, base: &Path) -> String {
    let path = resolve_path(path);
    let base = resolve_path(base);
    match path.strip_prefix(&base) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
        Ok(_) => ".".to_string(),
        Err(_) => path.display().to_string(),
    }
}
