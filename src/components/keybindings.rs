//! Keybinding system for context-aware keyboard shortcuts
//!
//! Provides a registry of keybindings that change based on what the navigator
//! is currently showing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    NavigateUp,
    NavigateDown,
    First,
    Last,
    Select,
    Back,
    Quit,
    Help,
    PreviousPage,
    NextPage,
    Submit,
    Cancel,
    DeleteChar,
}

/// Key contexts with distinct bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyMode {
    /// A menu screen (home, unit, folder, script list, script actions)
    Menu,
    /// Paged code preview
    Preview,
    /// Line input (unit key, search query)
    Input,
}

/// A keybinding definition
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub display: String,
    pub description: String,
}

impl Keybinding {
    /// Create a new keybinding with no modifiers
    pub fn new(key: KeyCode, action: KeyAction, display: &str, description: &str) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::NONE,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    /// Create a keybinding with modifiers
    pub fn with_modifiers(
        key: KeyCode,
        modifiers: KeyModifiers,
        action: KeyAction,
        display: &str,
        description: &str,
    ) -> Self {
        Self {
            key,
            modifiers,
            action,
            display: display.to_string(),
            description: description.to_string(),
        }
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        // Shift is implied by the character itself (e.g. '?')
        let modifiers = event.modifiers - KeyModifiers::SHIFT;
        self.key == event.code && self.modifiers == modifiers
    }
}

/// Context-aware keybinding registry
pub struct KeybindingContext {
    mode_bindings: HashMap<KeyMode, Vec<Keybinding>>,
    /// Available in every mode
    global_bindings: Vec<Keybinding>,
}

impl Default for KeybindingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingContext {
    pub fn new() -> Self {
        let mut ctx = Self {
            mode_bindings: HashMap::new(),
            global_bindings: Vec::new(),
        };
        ctx.register_defaults();
        ctx
    }

    fn register_defaults(&mut self) {
        self.global_bindings = vec![Keybinding::with_modifiers(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
            KeyAction::Quit,
            "Ctrl+C",
            "Quit",
        )];

        self.mode_bindings.insert(
            KeyMode::Menu,
            vec![
                Keybinding::new(KeyCode::Up, KeyAction::NavigateUp, "Up", "Navigate up"),
                Keybinding::new(KeyCode::Char('k'), KeyAction::NavigateUp, "K", "Navigate up"),
                Keybinding::new(KeyCode::Down, KeyAction::NavigateDown, "Down", "Navigate down"),
                Keybinding::new(KeyCode::Char('j'), KeyAction::NavigateDown, "J", "Navigate down"),
                Keybinding::new(KeyCode::Home, KeyAction::First, "Home", "Go to first"),
                Keybinding::new(KeyCode::End, KeyAction::Last, "End", "Go to last"),
                Keybinding::new(KeyCode::Enter, KeyAction::Select, "Enter", "Select"),
                Keybinding::new(KeyCode::Esc, KeyAction::Back, "Esc", "Back"),
                Keybinding::new(KeyCode::Backspace, KeyAction::Back, "Bksp", "Back"),
                Keybinding::new(KeyCode::Char('b'), KeyAction::Back, "B", "Back"),
                Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Help"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Quit, "Q", "Quit"),
            ],
        );

        self.mode_bindings.insert(
            KeyMode::Preview,
            vec![
                Keybinding::new(KeyCode::PageUp, KeyAction::PreviousPage, "PgUp", "Previous page"),
                Keybinding::new(KeyCode::Up, KeyAction::PreviousPage, "Up", "Previous page"),
                Keybinding::new(KeyCode::PageDown, KeyAction::NextPage, "PgDn", "Next page"),
                Keybinding::new(KeyCode::Down, KeyAction::NextPage, "Down", "Next page"),
                Keybinding::new(KeyCode::Char(' '), KeyAction::NextPage, "Space", "Next page"),
                Keybinding::new(KeyCode::Enter, KeyAction::NextPage, "Enter", "Next page"),
                Keybinding::new(KeyCode::Esc, KeyAction::Back, "Esc", "Close preview"),
                Keybinding::new(KeyCode::Char('q'), KeyAction::Back, "Q", "Close preview"),
                Keybinding::new(KeyCode::Char('b'), KeyAction::Back, "B", "Close preview"),
                Keybinding::new(KeyCode::Char('?'), KeyAction::Help, "?", "Help"),
            ],
        );

        self.mode_bindings.insert(
            KeyMode::Input,
            vec![
                Keybinding::new(KeyCode::Enter, KeyAction::Submit, "Enter", "Submit"),
                Keybinding::new(KeyCode::Esc, KeyAction::Cancel, "Esc", "Cancel"),
                Keybinding::new(KeyCode::Backspace, KeyAction::DeleteChar, "Bksp", "Delete"),
            ],
        );
    }

    /// Get keybindings for a mode, mode-specific first, then global
    pub fn get_bindings(&self, mode: KeyMode) -> Vec<&Keybinding> {
        let mut bindings: Vec<&Keybinding> = Vec::new();
        if let Some(mode_bindings) = self.mode_bindings.get(&mode) {
            bindings.extend(mode_bindings.iter());
        }
        bindings.extend(self.global_bindings.iter());
        bindings
    }

    /// Action bound to `event` in `mode`, if any
    pub fn resolve(&self, mode: KeyMode, event: &KeyEvent) -> Option<KeyAction> {
        self.get_bindings(mode)
            .into_iter()
            .find(|binding| binding.matches(event))
            .map(|binding| binding.action)
    }

    /// Get navigation bar items for display
    pub fn get_nav_items(&self, mode: KeyMode) -> Vec<NavBarItem> {
        let priority_actions: &[KeyAction] = match mode {
            KeyMode::Menu => &[
                KeyAction::NavigateUp,
                KeyAction::Select,
                KeyAction::Back,
                KeyAction::Help,
                KeyAction::Quit,
            ],
            KeyMode::Preview => &[KeyAction::PreviousPage, KeyAction::NextPage, KeyAction::Back],
            KeyMode::Input => &[KeyAction::Submit, KeyAction::Cancel],
        };

        let bindings = self.get_bindings(mode);
        priority_actions
            .iter()
            .filter_map(|action| bindings.iter().find(|b| b.action == *action))
            .map(|binding| {
                if binding.action == KeyAction::NavigateUp {
                    NavBarItem {
                        key_display: "Up/Dn".to_string(),
                        action_label: "Navigate".to_string(),
                    }
                } else {
                    NavBarItem {
                        key_display: binding.display.clone(),
                        action_label: binding.description.clone(),
                    }
                }
            })
            .collect()
    }

    /// Get full help content for a mode (for the help overlay)
    pub fn get_help_content(&self, mode: KeyMode) -> Vec<HelpSection> {
        let sections: [(&str, &[KeyAction]); 3] = [
            (
                "Navigation",
                &[
                    KeyAction::NavigateUp,
                    KeyAction::NavigateDown,
                    KeyAction::First,
                    KeyAction::Last,
                    KeyAction::PreviousPage,
                    KeyAction::NextPage,
                ],
            ),
            (
                "Actions",
                &[
                    KeyAction::Select,
                    KeyAction::Submit,
                    KeyAction::Cancel,
                    KeyAction::DeleteChar,
                ],
            ),
            ("General", &[KeyAction::Back, KeyAction::Help, KeyAction::Quit]),
        ];

        sections
            .iter()
            .filter_map(|(title, actions)| {
                let items: Vec<(String, String)> = self
                    .get_bindings(mode)
                    .into_iter()
                    .filter(|b| actions.contains(&b.action))
                    .map(|b| (b.display.clone(), b.description.clone()))
                    .collect();
                if items.is_empty() {
                    None
                } else {
                    Some(HelpSection {
                        title: title.to_string(),
                        items,
                    })
                }
            })
            .collect()
    }
}

/// Navigation bar item for display
#[derive(Debug, Clone)]
pub struct NavBarItem {
    pub key_display: String,
    pub action_label: String,
}

/// Help section for the help overlay
#[derive(Debug, Clone)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_menu_bindings_resolve() {
        let ctx = KeybindingContext::new();
        assert_eq!(ctx.resolve(KeyMode::Menu, &key(KeyCode::Down)), Some(KeyAction::NavigateDown));
        assert_eq!(ctx.resolve(KeyMode::Menu, &key(KeyCode::Char('j'))), Some(KeyAction::NavigateDown));
        assert_eq!(ctx.resolve(KeyMode::Menu, &key(KeyCode::Enter)), Some(KeyAction::Select));
        assert_eq!(ctx.resolve(KeyMode::Menu, &key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_shifted_characters_match() {
        let ctx = KeybindingContext::new();
        let event = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(ctx.resolve(KeyMode::Menu, &event), Some(KeyAction::Help));
    }

    #[test]
    fn test_global_quit_everywhere() {
        let ctx = KeybindingContext::new();
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for mode in [KeyMode::Menu, KeyMode::Preview, KeyMode::Input] {
            assert_eq!(ctx.resolve(mode, &event), Some(KeyAction::Quit));
        }
    }

    #[test]
    fn test_input_mode_leaves_letters_unbound() {
        let ctx = KeybindingContext::new();
        assert_eq!(ctx.resolve(KeyMode::Input, &key(KeyCode::Char('q'))), None);
        assert_eq!(ctx.resolve(KeyMode::Input, &key(KeyCode::Enter)), Some(KeyAction::Submit));
    }

    #[test]
    fn test_help_content_has_sections() {
        let ctx = KeybindingContext::new();
        let sections = ctx.get_help_content(KeyMode::Menu);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Navigation", "Actions", "General"]);
        assert_eq!(ctx.get_nav_items(KeyMode::Menu)[0].key_display, "Up/Dn");
    }
}
