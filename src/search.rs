//! Recursive script search inside a unit.
//!
//! Walks the unit depth-first without following directory symlinks. Any
//! directory named in `ignore_dirs` is skipped together with its subtree, and
//! directories that cannot be read contribute nothing instead of aborting the
//! walk.

use crate::catalog::{read_entries, sort_scripts, Catalog, Script};
use std::fs;
use std::path::Path;
use tracing::debug;

impl Catalog {
    /// Scripts under `unit_path` whose file name contains `query`
    /// (case-insensitive), sorted by file name.
    ///
    /// A blank query matches nothing.
    pub fn search(&self, unit_path: &Path, query: &str) -> Vec<Script> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        self.walk(unit_path, &needle, &mut hits);
        sort_scripts(&mut hits);

        debug!(
            unit = %unit_path.display(),
            query = %needle,
            hits = hits.len(),
            "Search finished"
        );
        hits
    }

    fn walk(&self, dir: &Path, needle: &str, hits: &mut Vec<Script>) {
        for path in read_entries(dir) {
            let Ok(metadata) = fs::symlink_metadata(&path) else {
                continue;
            };
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if metadata.is_dir() {
                if self.is_ignored_dir(&name) {
                    debug!(path = %path.display(), "Skipping ignored directory");
                    continue;
                }
                self.walk(&path, needle, hits);
            } else if name.to_lowercase().contains(needle) && self.is_script(&path) {
                hits.push(Script::from_path(&path));
            }
        }
    }
}
