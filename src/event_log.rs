//! Append-only event log.
//!
//! One line per event: `[YYYY-MM-DD HH:MM:SS] EVENT details`. The file is
//! opened, appended to and closed for every event; write failures are dropped.

use crate::config::Config;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};
use tracing::debug;

/// Kinds of events written to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    Run,
    OpenEditor,
    OpenFolder,
    ToggleFavorite,
    ConfigReset,
}

#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log file named by `log_file`, placed in the app home
    pub fn from_config(config: &Config, home: &Path) -> Self {
        Self::new(home.join(&config.log_file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event line
    pub fn append(&self, event: Event, details: &str) -> std::io::Result<()> {
        let line = format_line(&Local::now().format("%Y-%m-%d %H:%M:%S").to_string(), event, details);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }

    /// Append one event line, ignoring failures
    pub fn record(&self, event: Event, details: &str) {
        if let Err(e) = self.append(event, details) {
            debug!(path = %self.path.display(), error = %e, "Event log write dropped");
        }
    }
}

fn format_line(timestamp: &str, event: Event, details: &str) -> String {
    // Keep one event per line even when details carry newlines
    let details = details.replace(['\r', '\n'], " ");
    format!("[{timestamp}] {event} {details}\n")
}
