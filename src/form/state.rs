use std::{collections::HashSet, sync::Arc};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::i18n::{Locale, LocaleHandle};

use super::{
    error::{FieldCoercionError, FieldErrors},
    path::{EntryKey, FieldPath, metadata_segments},
    record::{FieldSlot, FieldValue, FormRecord, SlotKind},
    validation::{FormValidator, ValidationOutcome},
};

/// Owns one dialog's record and every error shown next to its fields.
#[derive(Debug)]
pub struct FormController<R: FormRecord> {
    record: R,
    validator: Arc<FormValidator<R>>,
    locale: LocaleHandle,
    errors: FieldErrors,
    coercion: FieldErrors,
    global_errors: Vec<String>,
    validated: bool,
    dirty: bool,
}

impl<R: FormRecord> FormController<R> {
    pub fn new(validator: Arc<FormValidator<R>>, locale: LocaleHandle) -> Self {
        Self {
            record: R::default(),
            validator,
            locale,
            errors: FieldErrors::new(),
            coercion: FieldErrors::new(),
            global_errors: Vec::new(),
            validated: false,
            dirty: false,
        }
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn locale(&self) -> Locale {
        self.locale.get()
    }

    pub fn slots(&self) -> Vec<FieldSlot> {
        self.record.slots(self.locale.get())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn read(&self, path: &FieldPath) -> Option<FieldValue> {
        self.record.read(path)
    }

    pub fn set(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FieldCoercionError> {
        self.record.write(path, value)?;
        self.coercion.remove(path);
        self.dirty = true;
        if self.validated {
            self.blur(path);
        }
        Ok(())
    }

    /// Applies typed text to a scalar slot. Unparseable input leaves the
    /// previous value in place and is reported on the field.
    pub fn set_text(&mut self, path: &FieldPath, kind: &SlotKind, raw: &str) -> bool {
        match kind.parse_text(raw) {
            Ok(value) => match self.set(path, value) {
                Ok(()) => true,
                Err(err) => {
                    self.coercion.replace(path.clone(), err.message);
                    false
                }
            },
            Err(msg) => {
                let text = self.locale.text(msg);
                self.coercion.replace(path.clone(), text);
                self.dirty = true;
                false
            }
        }
    }

    pub fn edit(&mut self, apply: impl FnOnce(&mut R)) {
        apply(&mut self.record);
        self.dirty = true;
        if self.validated {
            self.validate_all();
        }
    }

    /// Revalidates the fields under `prefix` only.
    pub fn blur(&mut self, prefix: &FieldPath) {
        let scoped = self
            .validator
            .check_prefix(&self.record, prefix, self.locale.get());
        self.errors.remove_prefix(prefix);
        self.errors.extend(scoped);
    }

    /// Whole-record validation. Returns the payload when nothing is wrong,
    /// else the number of open issues.
    pub fn validate(&mut self) -> Result<Value, usize> {
        self.validated = true;
        match self.validate_all() {
            Some(value) if self.coercion.is_empty() => Ok(value),
            _ => Err(self.issue_count()),
        }
    }

    fn validate_all(&mut self) -> Option<Value> {
        match self.validator.check(&self.record, self.locale.get()) {
            ValidationOutcome::Valid(value) => {
                self.errors.clear();
                self.global_errors.clear();
                Some(value)
            }
            ValidationOutcome::Invalid {
                errors,
                global_errors,
            } => {
                debug!(issues = errors.len(), "form validation failed");
                self.errors = errors;
                self.global_errors = global_errors;
                None
            }
        }
    }

    pub fn error(&self, path: &FieldPath) -> Option<&str> {
        self.coercion.get(path).or_else(|| self.errors.get(path))
    }

    pub fn errors(&self) -> impl Iterator<Item = (&FieldPath, &str)> {
        self.coercion.iter().chain(
            self.errors
                .iter()
                .filter(|(path, _)| self.coercion.get(path).is_none()),
        )
    }

    pub fn global_errors(&self) -> &[String] {
        &self.global_errors
    }

    pub fn issue_count(&self) -> usize {
        self.errors().count() + self.global_errors.len()
    }

    pub fn has_errors(&self) -> bool {
        self.issue_count() > 0
    }

    pub fn append_entry(&mut self, array: &FieldPath) -> Option<EntryKey> {
        let key = self.record.append_entry(array)?;
        self.dirty = true;
        if self.validated {
            self.blur(array);
        }
        Some(key)
    }

    pub fn remove_entry(&mut self, array: &FieldPath, key: EntryKey) -> bool {
        if !self.record.remove_entry(array, key) {
            return false;
        }
        self.dirty = true;
        self.prune_dead_entries();
        if self.validated {
            self.blur(array);
        }
        true
    }

    pub fn move_entry(&mut self, array: &FieldPath, key: EntryKey, delta: i32) -> bool {
        let moved = self.record.move_entry(array, key, delta);
        if moved {
            self.dirty = true;
        }
        moved
    }

    fn prune_dead_entries(&mut self) {
        let alive: HashSet<EntryKey> = self
            .record
            .slots(self.locale.get())
            .iter()
            .flat_map(|slot| slot.path.entry_keys().collect::<Vec<_>>())
            .collect();
        self.errors.retain_entries(|key| alive.contains(&key));
        self.coercion.retain_entries(|key| alive.contains(&key));
    }

    /// Shows backend field errors inline. Keys that match no field are
    /// returned so the caller can surface them elsewhere.
    pub fn apply_remote_errors(&mut self, metadata: &IndexMap<String, String>) -> Vec<String> {
        let mut unmatched = Vec::new();
        for (key, message) in metadata {
            match self.record.resolve(&metadata_segments(key)) {
                Some(path) if self.record.read(&path).is_some() => {
                    self.errors.replace(path, message.clone());
                }
                _ => unmatched.push(format!("{key}: {message}")),
            }
        }
        unmatched
    }

    pub fn seed(&mut self, record: R) {
        self.record = record;
        self.clear_state();
    }

    pub fn reset(&mut self) {
        self.seed(R::default());
    }

    fn clear_state(&mut self) {
        self.errors.clear();
        self.coercion.clear();
        self.global_errors.clear();
        self.validated = false;
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        form::FieldValue,
        records::{StrategyForm, TeamForm},
    };

    fn team_controller() -> FormController<TeamForm> {
        let validator = Arc::new(FormValidator::new().expect("team schema"));
        FormController::new(validator, LocaleHandle::new(Locale::EnUs))
    }

    #[test]
    fn blur_only_touches_the_blurred_field() {
        let mut form = team_controller();
        form.set(&FieldPath::field("logo"), FieldValue::Text("x".repeat(300)))
            .unwrap();
        form.blur(&FieldPath::field("name"));
        assert!(form.error(&FieldPath::field("name")).is_some());
        assert!(form.error(&FieldPath::field("logo")).is_none());
    }

    #[test]
    fn remote_errors_land_on_their_field() {
        let mut form = team_controller();
        let mut metadata = IndexMap::new();
        metadata.insert("name".to_string(), "required".to_string());
        metadata.insert("owner".to_string(), "unknown".to_string());
        let unmatched = form.apply_remote_errors(&metadata);
        assert_eq!(form.error(&FieldPath::field("name")), Some("required"));
        assert_eq!(unmatched, vec!["owner: unknown".to_string()]);
    }

    #[test]
    fn coercion_errors_block_submit_until_fixed() {
        let validator = Arc::new(FormValidator::new().expect("strategy schema"));
        let mut form: FormController<StrategyForm> =
            FormController::new(validator, LocaleHandle::new(Locale::EnUs));
        form.set(&FieldPath::field("name"), FieldValue::Text("cpu".into()))
            .unwrap();
        let step = FieldPath::field("step");
        assert!(!form.set_text(&step, &SlotKind::Integer, "ten"));
        assert_eq!(form.error(&step), Some("A number is required"));
        assert!(form.validate().is_err());
        assert!(form.set_text(&step, &SlotKind::Integer, "10"));
        assert!(form.validate().is_ok());
    }
}
