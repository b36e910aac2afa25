//! Tests for the directory catalog and recursive search
//!
//! These tests verify:
//! - Unit, folder and script listings over a real directory tree
//! - Script predicate (extension, `__` prefix)
//! - Ignored directories in search
//! - Graceful handling of missing directories

use scriptdeck::catalog::{resolve_path, Catalog, Folder, Script};
use scriptdeck::config::Config;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// base/U1/lab1/{a.py, b.py, __init__.py}, base/U1/.venv/c.py
fn course_tree() -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    let base = resolve_path(dir.path());
    let lab = base.join("U1").join("lab1");
    fs::create_dir_all(&lab).unwrap();
    for name in ["a.py", "b.py", "__init__.py"] {
        fs::write(lab.join(name), "print('hi')\n").unwrap();
    }
    let venv = base.join("U1").join(".venv");
    fs::create_dir_all(&venv).unwrap();
    fs::write(venv.join("c.py"), "").unwrap();

    let mut config = Config::defaults(&base);
    config.units = [("1".to_string(), "U1".to_string())].into_iter().collect();
    (dir, config)
}

fn folder_names(folders: &[Folder]) -> Vec<String> {
    folders.iter().map(|f| f.name.clone()).collect()
}

fn script_names(scripts: &[Script]) -> Vec<String> {
    scripts.iter().map(|s| s.name.clone()).collect()
}

// =============================================================================
// Listings
// =============================================================================

#[test]
fn test_end_to_end_listing() {
    let (_dir, config) = course_tree();
    let catalog = Catalog::from_config(&config);

    let units = catalog.units();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].key, "1");
    assert_eq!(units[0].name, "U1");

    let folders = catalog.folders(&units[0].path);
    assert_eq!(folder_names(&folders), vec!["lab1"]);

    let scripts = catalog.scripts(&folders[0].path);
    assert_eq!(script_names(&scripts), vec!["a.py", "b.py"]);
}

#[test]
fn test_search_skips_ignored_dirs() {
    let (_dir, config) = course_tree();
    let catalog = Catalog::from_config(&config);
    let unit = catalog.unit("1").unwrap();

    let hits = catalog.search(&unit.path, "A");
    assert_eq!(script_names(&hits), vec!["a.py"]);

    // c.py lives only under .venv
    assert!(catalog.search(&unit.path, "c").is_empty());
}

#[test]
fn test_hidden_folders_shown_when_enabled() {
    let (_dir, mut config) = course_tree();
    config.show_hidden_folders = true;
    let catalog = Catalog::from_config(&config);
    let unit = catalog.unit("1").unwrap();

    let folders = catalog.folders(&unit.path);
    assert_eq!(folder_names(&folders), vec![".venv", "lab1"]);

    // Still ignored by search
    assert!(catalog.search(&unit.path, "c.py").is_empty());
}

#[test]
fn test_missing_unit_directory_lists_empty() {
    let (_dir, mut config) = course_tree();
    config.units.insert("2".to_string(), "Missing".to_string());
    let catalog = Catalog::from_config(&config);
    let unit = catalog.unit("2").unwrap();

    assert!(catalog.folders(&unit.path).is_empty());
    assert!(catalog.search(&unit.path, "a").is_empty());
    assert!(catalog.unit("9").is_none());
}

#[test]
fn test_folders_sorted_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let unit = dir.path().join("U");
    for name in ["beta", "Alpha", "gamma"] {
        fs::create_dir_all(unit.join(name)).unwrap();
    }
    fs::write(unit.join("loose.py"), "").unwrap();
    let config = Config::defaults(dir.path());
    let catalog = Catalog::from_config(&config);

    let folders = catalog.folders(&unit);
    assert_eq!(folder_names(&folders), vec!["Alpha", "beta", "gamma"]);
}

// =============================================================================
// Script predicate
// =============================================================================

#[test]
fn test_is_script_predicate() {
    let (dir, config) = course_tree();
    let catalog = Catalog::from_config(&config);
    let lab = resolve_path(dir.path()).join("U1").join("lab1");
    fs::write(lab.join("notes.txt"), "").unwrap();
    fs::write(lab.join("UPPER.PY"), "").unwrap();

    assert!(catalog.is_script(&lab.join("a.py")));
    assert!(catalog.is_script(&lab.join("UPPER.PY")));
    assert!(!catalog.is_script(&lab.join("__init__.py")));
    assert!(!catalog.is_script(&lab.join("notes.txt")));
    assert!(!catalog.is_script(&lab.join("gone.py")));
    assert!(!catalog.is_script(Path::new("/")));
}

#[test]
fn test_configured_extensions() {
    let (dir, mut config) = course_tree();
    config.script_extensions = vec!["sh".to_string(), ".R".to_string()];
    let lab = resolve_path(dir.path()).join("U1").join("lab1");
    fs::write(lab.join("run.sh"), "").unwrap();
    fs::write(lab.join("plot.r"), "").unwrap();
    let catalog = Catalog::from_config(&config);

    let scripts = catalog.scripts(&lab);
    assert_eq!(script_names(&scripts), vec!["plot.r", "run.sh"]);
}
