use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use super::keymap;

/// Where keys are being interpreted; decides which bindings apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyContext {
    Global,
    List,
    Dialog,
    Popup,
    Login,
    Modal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ToggleLocale,
    SignOut,
    ScreenStep(i32),
    Teams,
    SwitchTeam,
    Permissions,
    Create,
    Edit,
    Select(i32),
    Page(i32),
    PageSize,
    Refresh,
    Submit,
    Cancel,
    FieldStep(i32),
    MoveEntry(i32),
    RemoveEntry,
    Activate,
    Toggle,
}

/// Result of routing one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Action(KeyAction),
    /// Text editing for the focused input.
    Edit(TextEdit),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Backspace,
    Clear,
}

/// Bindings of `context` first, then the global ones, then plain text input.
pub fn classify(key: &KeyEvent, context: KeyContext) -> KeyCommand {
    if let Some(action) = keymap::classify_key(key, context) {
        return KeyCommand::Action(action);
    }
    if let Some(action) = keymap::classify_key(key, KeyContext::Global) {
        return KeyCommand::Action(action);
    }
    match text_edit(key) {
        Some(edit) => KeyCommand::Edit(edit),
        None => KeyCommand::None,
    }
}

fn text_edit(key: &KeyEvent) -> Option<TextEdit> {
    let plain = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();
    match key.code {
        KeyCode::Char(ch) if plain => Some(TextEdit::Insert(ch)),
        KeyCode::Char('u') if key.modifiers == KeyModifiers::CONTROL => Some(TextEdit::Clear),
        KeyCode::Backspace => Some(TextEdit::Backspace),
        _ => None,
    }
}

impl TextEdit {
    /// Applies the edit to `text`. Returns whether it changed.
    pub fn apply(self, text: &mut String) -> bool {
        match self {
            TextEdit::Insert(ch) => {
                text.push(ch);
                true
            }
            TextEdit::Backspace => text.pop().is_some(),
            TextEdit::Clear => {
                let changed = !text.is_empty();
                text.clear();
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn context_bindings_win_over_text() {
        let enter = key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(classify(&enter, KeyContext::List), KeyCommand::Action(KeyAction::Edit));
        assert_eq!(
            classify(&enter, KeyContext::Dialog),
            KeyCommand::Action(KeyAction::Activate)
        );
        let up = key(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(
            classify(&up, KeyContext::Popup),
            KeyCommand::Action(KeyAction::Select(-1))
        );
    }

    #[test]
    fn global_bindings_apply_everywhere() {
        let quit = key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(classify(&quit, KeyContext::Dialog), KeyCommand::Action(KeyAction::Quit));
        let locale = key(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(
            classify(&locale, KeyContext::Login),
            KeyCommand::Action(KeyAction::ToggleLocale)
        );
    }

    #[test]
    fn printable_keys_edit_text() {
        let upper = key(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(
            classify(&upper, KeyContext::Dialog),
            KeyCommand::Edit(TextEdit::Insert('A'))
        );
        let mut text = String::from("3");
        assert!(TextEdit::Insert('0').apply(&mut text));
        assert!(TextEdit::Backspace.apply(&mut text));
        assert_eq!(text, "3");
    }

    #[test]
    fn shift_tab_moves_back() {
        let back = key(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(
            classify(&back, KeyContext::Dialog),
            KeyCommand::Action(KeyAction::FieldStep(-1))
        );
    }
}
