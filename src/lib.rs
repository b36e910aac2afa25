//! Script Deck library
//!
//! Browse course-project units, folders and scripts; preview, run and open
//! them; remember recent runs and favorites.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod event_log;
pub mod launcher;
pub mod logging;
pub mod preview;
pub mod search;
pub mod session;
pub mod state;
pub mod theme;
pub mod ui;

// Re-export main types for convenience
pub use catalog::{Catalog, Folder, Script, Unit};
pub use config::{Config, ConfigStore};
pub use error::{DeckError, Result};
pub use event_log::{Event, EventLog};
pub use launcher::{Launcher, RunOptions, RunOutcome, RunPrompt};
pub use preview::Preview;
pub use session::Session;
pub use state::{State, StateStore};
