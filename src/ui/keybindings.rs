//! Keyboard shortcuts for the wizard.
//!
//! [`SHORTCUTS`] is the single registry used for the footer hint line;
//! [`action_for`] maps a key event to what the app should do with it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleTheme,
    FocusNext,
    FocusPrev,
    Previous,
    Next,
    Submit,
    /// Hand the key to the focused input
    Edit,
}

/// A keyboard shortcut definition
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    /// Alternative key with no modifiers (e.g. Esc for Ctrl+B)
    pub alt_key: Option<KeyCode>,
    pub description: &'static str,
    pub context: ShortcutContext,
}

/// Where a shortcut applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutContext {
    /// Every step
    Global,
    /// Steps before the last one
    Navigation,
    /// Only the last step
    LastStep,
}

impl ShortcutContext {
    pub fn applies(self, is_last: bool) -> bool {
        match self {
            ShortcutContext::Global => true,
            ShortcutContext::Navigation => !is_last,
            ShortcutContext::LastStep => is_last,
        }
    }
}

impl Shortcut {
    /// Format key for display (e.g., "Ctrl+T", "Ctrl+B/Esc")
    pub fn key_display(&self) -> String {
        let mut primary = format_keycode(&self.key);
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            primary = format!("Ctrl+{}", primary.to_uppercase());
        }
        match &self.alt_key {
            Some(alt) => format!("{}/{}", primary, format_keycode(alt)),
            None => primary,
        }
    }
}

fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        _ => format!("{:?}", key),
    }
}

/// Static registry of all keyboard shortcuts
pub static SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        key: KeyCode::Tab,
        modifiers: KeyModifiers::NONE,
        alt_key: Some(KeyCode::BackTab),
        description: "Fields",
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Enter,
        modifiers: KeyModifiers::NONE,
        alt_key: None,
        description: "Next",
        context: ShortcutContext::Navigation,
    },
    Shortcut {
        key: KeyCode::Char('s'),
        modifiers: KeyModifiers::CONTROL,
        alt_key: None,
        description: "Submit",
        context: ShortcutContext::LastStep,
    },
    Shortcut {
        key: KeyCode::Char('b'),
        modifiers: KeyModifiers::CONTROL,
        alt_key: Some(KeyCode::Esc),
        description: "Back",
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('t'),
        modifiers: KeyModifiers::CONTROL,
        alt_key: None,
        description: "Theme",
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('c'),
        modifiers: KeyModifiers::CONTROL,
        alt_key: None,
        description: "Quit",
        context: ShortcutContext::Global,
    },
];

/// Shortcuts that apply on the current step, in registry order
pub fn shortcuts_for_step(is_last: bool) -> impl Iterator<Item = &'static Shortcut> {
    SHORTCUTS.iter().filter(move |s| s.context.applies(is_last))
}

/// One-line hint for the footer
pub fn footer_hint(is_last: bool) -> String {
    shortcuts_for_step(is_last)
        .map(|s| format!("{} {}", s.key_display(), s.description))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Map a key press to an action.
///
/// `multiline_focused` keeps Enter and the arrow keys inside a text area.
pub fn action_for(key: &KeyEvent, multiline_focused: bool, is_last: bool) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('t') => Action::ToggleTheme,
            KeyCode::Char('b') => Action::Previous,
            KeyCode::Char('s') if is_last => Action::Submit,
            KeyCode::Char('s') => Action::Next,
            _ => Action::Edit,
        };
    }

    match key.code {
        KeyCode::Esc => Action::Previous,
        KeyCode::Tab => Action::FocusNext,
        KeyCode::BackTab => Action::FocusPrev,
        KeyCode::Enter if multiline_focused => Action::Edit,
        KeyCode::Enter if is_last => Action::Submit,
        KeyCode::Enter => Action::Next,
        KeyCode::Down if !multiline_focused => Action::FocusNext,
        KeyCode::Up if !multiline_focused => Action::FocusPrev,
        _ => Action::Edit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_all_shortcuts_have_descriptions() {
        for shortcut in SHORTCUTS {
            assert!(
                !shortcut.description.is_empty(),
                "Shortcut {:?} has empty description",
                shortcut.key
            );
        }
    }

    #[test]
    fn test_key_display() {
        let previous = SHORTCUTS
            .iter()
            .find(|s| s.description == "Back")
            .unwrap();
        assert_eq!(previous.key_display(), "Ctrl+B/Esc");

        let fields = &SHORTCUTS[0];
        assert_eq!(fields.key_display(), "Tab/Shift+Tab");
    }

    #[test]
    fn test_global_chords() {
        assert_eq!(action_for(&ctrl('c'), false, false), Action::Quit);
        assert_eq!(action_for(&ctrl('t'), true, true), Action::ToggleTheme);
        assert_eq!(action_for(&ctrl('b'), false, false), Action::Previous);
        assert_eq!(action_for(&plain(KeyCode::Esc), true, false), Action::Previous);
    }

    #[test]
    fn test_enter_follows_step_and_focus() {
        let enter = plain(KeyCode::Enter);
        assert_eq!(action_for(&enter, false, false), Action::Next);
        assert_eq!(action_for(&enter, false, true), Action::Submit);
        assert_eq!(action_for(&enter, true, true), Action::Edit);
    }

    #[test]
    fn test_ctrl_s_submits_only_on_last_step() {
        assert_eq!(action_for(&ctrl('s'), true, true), Action::Submit);
        assert_eq!(action_for(&ctrl('s'), true, false), Action::Next);
    }

    #[test]
    fn test_focus_keys() {
        assert_eq!(action_for(&plain(KeyCode::Tab), true, false), Action::FocusNext);
        assert_eq!(
            action_for(&plain(KeyCode::BackTab), false, false),
            Action::FocusPrev
        );
        assert_eq!(action_for(&plain(KeyCode::Down), false, false), Action::FocusNext);
        assert_eq!(action_for(&plain(KeyCode::Down), true, false), Action::Edit);
        assert_eq!(action_for(&plain(KeyCode::Char('x')), false, false), Action::Edit);
    }

    #[test]
    fn test_footer_hint_per_step() {
        let early = footer_hint(false);
        assert!(early.contains("Enter Next"));
        assert!(!early.contains("Submit"));

        let last = footer_hint(true);
        assert!(last.contains("Ctrl+S Submit"));
        assert!(!last.contains("Enter Next"));
    }
}
