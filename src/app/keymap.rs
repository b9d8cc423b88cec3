//! Key bindings, loaded once from `keymap/default.keymap.json`.

use std::{str::FromStr, sync::LazyLock};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use thiserror::Error;

use super::input::{KeyAction, KeyContext};

const DEFAULT_KEYMAP: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/keymap/default.keymap.json"
));

#[derive(Debug, Error, PartialEq, Eq)]
enum KeymapError {
    #[error("binding {0} lists no contexts")]
    NoContexts(String),
    #[error("binding {0} lists no key combos")]
    NoCombos(String),
    #[error("combo '{0}' names no key")]
    MissingKey(String),
    #[error("unsupported modifier '{0}'")]
    Modifier(String),
    #[error("unsupported key '{0}'")]
    Key(String),
    #[error("binding {id}: {source}")]
    Combo {
        id: String,
        #[source]
        source: Box<KeymapError>,
    },
}

#[derive(Deserialize)]
struct BindingFile {
    id: String,
    description: String,
    contexts: Vec<KeyContext>,
    action: ActionFile,
    combos: Vec<String>,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum ActionFile {
    Quit,
    ToggleLocale,
    SignOut,
    ScreenStep { delta: i32 },
    Teams,
    SwitchTeam,
    Permissions,
    Create,
    Edit,
    Select { delta: i32 },
    Page { delta: i32 },
    PageSize,
    Refresh,
    Submit,
    Cancel,
    FieldStep { delta: i32 },
    MoveEntry { delta: i32 },
    RemoveEntry,
    Activate,
    Toggle,
}

impl From<ActionFile> for KeyAction {
    fn from(action: ActionFile) -> Self {
        match action {
            ActionFile::Quit => KeyAction::Quit,
            ActionFile::ToggleLocale => KeyAction::ToggleLocale,
            ActionFile::SignOut => KeyAction::SignOut,
            ActionFile::ScreenStep { delta } => KeyAction::ScreenStep(delta),
            ActionFile::Teams => KeyAction::Teams,
            ActionFile::SwitchTeam => KeyAction::SwitchTeam,
            ActionFile::Permissions => KeyAction::Permissions,
            ActionFile::Create => KeyAction::Create,
            ActionFile::Edit => KeyAction::Edit,
            ActionFile::Select { delta } => KeyAction::Select(delta),
            ActionFile::Page { delta } => KeyAction::Page(delta),
            ActionFile::PageSize => KeyAction::PageSize,
            ActionFile::Refresh => KeyAction::Refresh,
            ActionFile::Submit => KeyAction::Submit,
            ActionFile::Cancel => KeyAction::Cancel,
            ActionFile::FieldStep { delta } => KeyAction::FieldStep(delta),
            ActionFile::MoveEntry { delta } => KeyAction::MoveEntry(delta),
            ActionFile::RemoveEntry => KeyAction::RemoveEntry,
            ActionFile::Activate => KeyAction::Activate,
            ActionFile::Toggle => KeyAction::Toggle,
        }
    }
}

struct KeyBinding {
    action: KeyAction,
    contexts: Vec<KeyContext>,
    combos: Vec<KeyPattern>,
    snippet: String,
}

impl TryFrom<BindingFile> for KeyBinding {
    type Error = KeymapError;

    fn try_from(file: BindingFile) -> Result<Self, KeymapError> {
        if file.contexts.is_empty() {
            return Err(KeymapError::NoContexts(file.id));
        }
        if file.combos.is_empty() {
            return Err(KeymapError::NoCombos(file.id));
        }
        let combos = file
            .combos
            .iter()
            .map(|combo| combo.parse::<KeyPattern>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| KeymapError::Combo {
                id: file.id.clone(),
                source: Box::new(source),
            })?;
        let keys = file.combos.join("/");
        Ok(Self {
            action: file.action.into(),
            contexts: file.contexts,
            snippet: format!("{keys} {}", file.description),
            combos,
        })
    }
}

impl KeyBinding {
    fn applies(&self, key: &KeyEvent, context: KeyContext) -> bool {
        self.contexts.contains(&context) && self.combos.iter().any(|combo| combo.matches(key))
    }
}

/// One combo such as `Ctrl+S`. Letters match either case; Shift is only
/// significant when spelled out.
#[derive(Debug, Clone, PartialEq, Eq)]
struct KeyPattern {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl FromStr for KeyPattern {
    type Err = KeymapError;

    fn from_str(combo: &str) -> Result<Self, KeymapError> {
        let mut parts: Vec<&str> = combo
            .split('+')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        let key = parts
            .pop()
            .ok_or_else(|| KeymapError::MissingKey(combo.to_string()))?;
        let mut modifiers = KeyModifiers::NONE;
        for part in parts {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return Err(KeymapError::Modifier(part.to_string())),
            };
        }
        Ok(Self {
            code: key_code(key)?,
            modifiers,
        })
    }
}

fn key_code(key: &str) -> Result<KeyCode, KeymapError> {
    let code = match key.to_ascii_lowercase().as_str() {
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "enter" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        single if single.chars().count() == 1 => {
            KeyCode::Char(single.chars().next().unwrap_or_default())
        }
        _ => return Err(KeymapError::Key(key.to_string())),
    };
    Ok(code)
}

impl KeyPattern {
    fn matches(&self, key: &KeyEvent) -> bool {
        let code = match key.code {
            KeyCode::Char(ch) => KeyCode::Char(ch.to_ascii_lowercase()),
            other => other,
        };
        let mut modifiers = key.modifiers;
        let implied = matches!(code, KeyCode::Char(_) | KeyCode::BackTab);
        if implied && !self.modifiers.contains(KeyModifiers::SHIFT) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        code == self.code && modifiers == self.modifiers
    }
}

fn load(source: &str) -> Result<Vec<KeyBinding>, String> {
    let files: Vec<BindingFile> = serde_json::from_str(source).map_err(|err| err.to_string())?;
    files
        .into_iter()
        .map(|file| KeyBinding::try_from(file).map_err(|err| err.to_string()))
        .collect()
}

static KEYMAP: LazyLock<Vec<KeyBinding>> = LazyLock::new(|| {
    load(DEFAULT_KEYMAP).unwrap_or_else(|err| panic!("invalid keymap/default.keymap.json: {err}"))
});

pub(super) fn classify_key(key: &KeyEvent, context: KeyContext) -> Option<KeyAction> {
    KEYMAP
        .iter()
        .find(|binding| binding.applies(key, context))
        .map(|binding| binding.action)
}

pub(super) fn help_text(context: KeyContext) -> Option<String> {
    let snippets = KEYMAP
        .iter()
        .filter(|binding| binding.contexts.contains(&context))
        .map(|binding| binding.snippet.as_str())
        .collect::<Vec<_>>();
    if snippets.is_empty() {
        None
    } else {
        Some(snippets.join(" • "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_context_has_help() {
        for context in [
            KeyContext::Global,
            KeyContext::List,
            KeyContext::Dialog,
            KeyContext::Popup,
            KeyContext::Login,
            KeyContext::Modal,
        ] {
            assert!(help_text(context).is_some(), "{context:?} has no bindings");
        }
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let pattern: KeyPattern = "Alt+Up".parse().unwrap();
        assert!(pattern.matches(&KeyEvent::new(KeyCode::Up, KeyModifiers::ALT)));
        assert!(!pattern.matches(&KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)));
        assert!(!pattern.matches(&KeyEvent::new(
            KeyCode::Up,
            KeyModifiers::ALT | KeyModifiers::CONTROL
        )));
        assert_eq!(
            "Hyper+X".parse::<KeyPattern>(),
            Err(KeymapError::Modifier("Hyper".into()))
        );
    }

    #[test]
    fn letters_ignore_case_and_implied_shift() {
        let pattern: KeyPattern = "Ctrl+S".parse().unwrap();
        assert!(pattern.matches(&KeyEvent::new(
            KeyCode::Char('S'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        )));
        let empty = r#"[{"id": "x", "description": "", "contexts": [],
            "action": {"kind": "quit"}, "combos": ["Q"]}]"#;
        assert!(load(empty).is_err());
    }
}
