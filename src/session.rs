//! Per-process session: both stores plus the components built from them.
//!
//! The session is the navigator's single handle on configuration and state;
//! nothing else holds them.

use crate::catalog::{resolve_path, Catalog, Script};
use crate::config::ConfigStore;
use crate::error::{DeckError, Result};
use crate::event_log::{Event, EventLog};
use crate::launcher::{Launcher, RunOptions, RunOutcome, RunPrompt};
use crate::state::StateStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where the documents live: an explicit choice, otherwise the directory of
/// the running executable
pub fn resolve_home(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(home) = explicit {
        return Ok(home);
    }
    let exe = std::env::current_exe()?;
    home_for_executable(&exe)
        .ok_or_else(|| DeckError::config(format!("{} has no parent directory", exe.display())))
}

/// Directory containing the (resolved) executable
pub fn home_for_executable(exe: &Path) -> Option<PathBuf> {
    resolve_path(exe).parent().map(Path::to_path_buf)
}

/// Reset a missing `base_dir` and record the reset in the event log
fn heal_base_dir(config: &mut ConfigStore) {
    let missing = config.config().base_dir.clone();
    if config.heal_base_dir() {
        EventLog::from_config(config.config(), config.home())
            .record(Event::ConfigReset, &format!("base_dir {} missing", missing.display()));
    }
}

#[derive(Debug)]
pub struct Session {
    pub config: ConfigStore,
    pub state: StateStore,
}

impl Session {
    /// Open (or create) both documents in `home` and heal a missing `base_dir`
    pub fn open(home: &Path) -> Self {
        if let Err(e) = fs::create_dir_all(home) {
            warn!(home = %home.display(), error = %e, "Could not create app home");
        }

        let mut config = ConfigStore::open(home);
        heal_base_dir(&mut config);

        let state = StateStore::open(config.home());
        debug!(
            config = %config.path().display(),
            state = %state.path().display(),
            "Session opened"
        );
        Self { config, state }
    }

    /// Re-read the configuration document (e.g. after it was edited)
    pub fn reload_config(&mut self) {
        self.config.load();
        heal_base_dir(&mut self.config);
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::from_config(self.config.config())
    }

    pub fn event_log(&self) -> EventLog {
        EventLog::from_config(self.config.config(), self.config.home())
    }

    pub fn launcher(&self) -> Launcher {
        Launcher::new(self.config.config(), self.event_log())
    }

    pub fn list_recent(&self) -> Vec<Script> {
        self.state
            .list_recent(self.config.config().recent_limit, &self.catalog())
    }

    pub fn list_favorites(&self) -> Vec<Script> {
        self.state.list_favorites(&self.catalog())
    }

    pub fn is_favorite(&self, script: &Script) -> bool {
        self.state.is_favorite(&script.path)
    }

    pub fn toggle_favorite(&mut self, script: &Script) -> bool {
        let now_favorite = self.state.toggle_favorite(&script.path);
        self.event_log().record(
            Event::ToggleFavorite,
            &format!("{} favorite={}", script.path.display(), now_favorite),
        );
        now_favorite
    }

    /// Run with explicit options
    pub fn run(
        &mut self,
        script: &Script,
        options: &RunOptions,
        prompt: &mut dyn RunPrompt,
    ) -> RunOutcome {
        let launcher = self.launcher();
        launcher.run(&mut self.state, script, options, prompt)
    }

    /// Run with the configured confirmation/argument behaviour, optionally
    /// inverting the confirmation flag
    pub fn run_configured(
        &mut self,
        script: &Script,
        invert_confirm: bool,
        prompt: &mut dyn RunPrompt,
    ) -> RunOutcome {
        let mut options = RunOptions::from_config(self.config.config());
        if invert_confirm {
            options.confirm = !options.confirm;
        }
        self.run(script, &options, prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_home_wins() {
        let home = resolve_home(Some(PathBuf::from("/srv/deck"))).unwrap();
        assert_eq!(home, PathBuf::from("/srv/deck"));
    }

    #[test]
    fn test_default_home_is_executable_dir() {
        let exe = std::env::current_exe().unwrap();
        let home = resolve_home(None).unwrap();
        assert_eq!(home, resolve_path(&exe).parent().unwrap());
        // Not tied to wherever the process was started from
        assert_eq!(resolve_home(None).unwrap(), home);
    }

    #[test]
    fn test_home_for_executable() {
        let dir = TempDir::new().unwrap();
        let exe = dir.path().join("scriptdeck");
        std::fs::write(&exe, "").unwrap();
        assert_eq!(home_for_executable(&exe), Some(resolve_path(dir.path())));
    }

    #[test]
    fn test_sessions_on_same_home_share_history() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("x.py");
        std::fs::write(&script, "").unwrap();

        let mut first = Session::open(dir.path());
        first.state.add_recent(&script, 15);

        let second = Session::open(dir.path());
        let recent: Vec<String> = second.list_recent().into_iter().map(|s| s.name).collect();
        assert_eq!(recent, vec!["x.py"]);
    }
}
