//! Navigator state definitions
//!
//! Contains the screen stack, menu entries and line-input state of the TUI.
//! Nothing here touches the terminal; the types are driven by `App`.

use crate::catalog::{Folder, Script, Unit};
use crate::preview::Preview;
use std::path::PathBuf;

/// Where a flat script list comes from; used to rebuild it after changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    Recent,
    Favorites,
    Search { unit: Unit, query: String },
}

/// What a screen shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    Unit(Unit),
    Folder(Folder),
    Scripts(ScriptSource),
    ScriptActions(Script),
    /// `scroll` is the first visible line of an unpaged preview
    Preview {
        preview: Preview,
        page: usize,
        scroll: usize,
    },
}

/// Effect of activating a menu entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    OpenUnit(Unit),
    ShowRecent,
    ShowFavorites,
    StartSearch,
    SearchUnit(Unit),
    EditConfig,
    ReloadConfig,
    EnterFolder(Folder),
    SelectScript(Script),
    PreviewScript(Script),
    RunScript(Script),
    /// Run with `confirm_before_run` inverted
    RunScriptInverted(Script),
    EditScript(Script),
    ToggleFavorite(Script),
    RevealFolder(PathBuf),
    Back,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub action: MenuAction,
}

impl MenuEntry {
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// One level of the navigation stack
#[derive(Debug, Clone)]
pub struct Screen {
    pub title: String,
    /// Path or context line under the title
    pub subtitle: String,
    pub view: View,
    pub entries: Vec<MenuEntry>,
    /// Shown above the entries when the listing itself is empty
    pub empty_message: Option<String>,
    pub selected: usize,
}

impl Screen {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, view: View) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            view,
            entries: Vec::new(),
            empty_message: None,
            selected: 0,
        }
    }

    pub fn select_next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.entries.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.entries.len() - 1);
        }
    }

    pub fn selected_entry(&self) -> Option<&MenuEntry> {
        self.entries.get(self.selected)
    }

    /// Keep the selection inside the entry list after a rebuild
    pub fn clamp_selection(&mut self) {
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
    }
}

/// What a line of typed input is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    UnitKey,
    Query(Unit),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub purpose: InputPurpose,
    pub prompt: String,
    pub buffer: String,
}

/// Work the main loop has to do outside the alternate screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Run { script: Script, invert_confirm: bool },
    Quit,
}

/// Main navigator state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub stack: Vec<Screen>,
    pub status_message: String,
    /// The status line reports a failure
    pub status_is_error: bool,
    pub input: Option<InputState>,
    pub help_visible: bool,
}

impl AppState {
    pub fn current(&self) -> Option<&Screen> {
        self.stack.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Screen> {
        self.stack.last_mut()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = true;
    }

    /// Breadcrumb of screen titles, root first
    pub fn breadcrumb(&self) -> String {
        self.stack
            .iter()
            .map(|screen| screen.title.as_str())
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_with(count: usize) -> Screen {
        let mut screen = Screen::new("t", "", View::Home);
        screen.entries = (0..count)
            .map(|i| MenuEntry::new(format!("entry {i}"), MenuAction::Back))
            .collect();
        screen
    }

    #[test]
    fn test_selection_wraps() {
        let mut screen = screen_with(3);
        screen.select_previous();
        assert_eq!(screen.selected, 2);
        screen.select_next();
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn test_selection_on_empty_screen() {
        let mut screen = screen_with(0);
        screen.select_next();
        screen.select_previous();
        assert_eq!(screen.selected, 0);
        assert!(screen.selected_entry().is_none());
    }

    #[test]
    fn test_clamp_selection() {
        let mut screen = screen_with(5);
        screen.selected = 4;
        screen.entries.truncate(2);
        screen.clamp_selection();
        assert_eq!(screen.selected, 1);
    }

    #[test]
    fn test_status_kind_follows_last_message() {
        let mut state = AppState::default();
        state.set_error("boom");
        assert!(state.status_is_error);
        state.set_status("fine");
        assert!(!state.status_is_error);
        assert_eq!(state.status_message, "fine");
    }
}
