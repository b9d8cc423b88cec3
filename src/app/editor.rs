use tracing::{debug, warn};

use crate::{
    dialog::{DialogEffect, DialogPhase, DialogSession, SubmitRequest},
    form::{FieldPath, FieldSlot, FieldValue, FormController, FormRecord, SlotKind},
    i18n::{Locale, Msg},
    lookup::OptionLookup,
    presentation::{FieldRow, FormView, PopupView, RowKind},
};

use super::{
    input::TextEdit,
    popup::{ChoicePopup, PermissionPopup, Popup},
};

#[derive(Debug, Clone)]
struct TextBuffer {
    path: FieldPath,
    text: String,
}

/// Focused row plus the raw text being typed into it. The buffer lets a
/// numeric field show `1.` or an empty string while the record keeps its
/// last parseable value.
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldFocus {
    index: usize,
    buffer: Option<TextBuffer>,
}

impl FieldFocus {
    pub(crate) fn reset(&mut self) {
        self.index = 0;
        self.buffer = None;
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn focused<'a>(&self, slots: &'a [FieldSlot]) -> Option<&'a FieldSlot> {
        slots.get(self.index.min(slots.len().saturating_sub(1)))
    }

    fn text_for(&self, path: &FieldPath) -> Option<&str> {
        self.buffer
            .as_ref()
            .filter(|buffer| &buffer.path == path)
            .map(|buffer| buffer.text.as_str())
    }

    /// Leaves the text field being edited, validating what it holds.
    pub(crate) fn commit<R: FormRecord>(&mut self, form: &mut FormController<R>) {
        if let Some(buffer) = self.buffer.take() {
            form.blur(&buffer.path);
        }
    }

    pub(crate) fn step<R: FormRecord>(&mut self, form: &mut FormController<R>, delta: i32) {
        self.commit(form);
        let len = form.slots().len();
        if len == 0 {
            self.index = 0;
            return;
        }
        self.index = (self.index.min(len - 1) as i64 + delta as i64).rem_euclid(len as i64) as usize;
    }

    pub(crate) fn focus_where<R: FormRecord>(
        &mut self,
        form: &mut FormController<R>,
        matches: impl Fn(&FieldSlot) -> bool,
    ) {
        self.commit(form);
        if let Some(index) = form.slots().iter().position(matches) {
            self.index = index;
        }
    }

    pub(crate) fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }

    /// Applies a key to the focused text slot. Returns false when the slot
    /// takes no text.
    pub(crate) fn edit<R: FormRecord>(
        &mut self,
        form: &mut FormController<R>,
        edit: TextEdit,
    ) -> bool {
        let slots = form.slots();
        let Some(slot) = self.focused(&slots) else {
            return false;
        };
        if !slot.kind.accepts_text() {
            return false;
        }
        if self.text_for(&slot.path).is_none() {
            let current = form
                .read(&slot.path)
                .map(|value| value.as_text())
                .unwrap_or_default();
            self.buffer = Some(TextBuffer {
                path: slot.path.clone(),
                text: current,
            });
        }
        let Some(buffer) = self.buffer.as_mut() else {
            return false;
        };
        if edit.apply(&mut buffer.text) {
            form.set_text(&slot.path, &slot.kind, &buffer.text);
        }
        true
    }

    pub(crate) fn paste<R: FormRecord>(&mut self, form: &mut FormController<R>, text: &str) {
        for ch in text.chars().filter(|ch| !ch.is_control()) {
            if !self.edit(form, TextEdit::Insert(ch)) {
                break;
            }
        }
    }

    /// Flips a focused flag slot.
    pub(crate) fn toggle_flag<R: FormRecord>(&mut self, form: &mut FormController<R>) -> bool {
        let slots = form.slots();
        let Some(slot) = self.focused(&slots) else {
            return false;
        };
        if slot.kind != SlotKind::Flag {
            return false;
        }
        let current = matches!(form.read(&slot.path), Some(FieldValue::Flag(true)));
        if let Err(err) = form.set(&slot.path, FieldValue::Flag(!current)) {
            warn!(path = %slot.path, error = %err, "flag write rejected");
        }
        true
    }

    pub(crate) fn rows<R: FormRecord>(
        &self,
        form: &FormController<R>,
        options: Option<&OptionLookup>,
    ) -> Vec<FieldRow> {
        let locale = form.locale();
        form.slots()
            .into_iter()
            .map(|slot| {
                let (value, kind) = self.display(form, options, &slot, locale);
                let error = match &slot.kind {
                    SlotKind::AppendEntry { array } => form.error(array),
                    _ => form.error(&slot.path),
                };
                FieldRow {
                    label: slot.label,
                    value,
                    error: error.map(str::to_string),
                    required: slot.required,
                    depth: slot.depth,
                    kind,
                }
            })
            .collect()
    }

    fn display<R: FormRecord>(
        &self,
        form: &FormController<R>,
        options: Option<&OptionLookup>,
        slot: &FieldSlot,
        locale: Locale,
    ) -> (String, RowKind) {
        let value = form.read(&slot.path);
        match &slot.kind {
            SlotKind::Text { secret } => {
                let text = self
                    .text_for(&slot.path)
                    .map(str::to_string)
                    .or_else(|| value.map(|value| value.as_text()))
                    .unwrap_or_default();
                if *secret {
                    ("•".repeat(text.chars().count()), RowKind::Input)
                } else {
                    (text, RowKind::Input)
                }
            }
            SlotKind::Integer | SlotKind::Number => {
                let text = self
                    .text_for(&slot.path)
                    .map(str::to_string)
                    .or_else(|| value.map(|value| value.as_text()))
                    .unwrap_or_default();
                (text, RowKind::Input)
            }
            SlotKind::Flag => {
                let on = matches!(value, Some(FieldValue::Flag(true)));
                let text = if on { "[x]" } else { "[ ]" };
                (text.to_string(), RowKind::Toggle)
            }
            SlotKind::Select(source) | SlotKind::MultiSelect(source) => {
                let Some(options) = options else {
                    return (String::new(), RowKind::Choice);
                };
                let set = options.options(*source, locale);
                let text = match value {
                    Some(FieldValue::Choice(choice)) => set.display_one(choice),
                    Some(FieldValue::Choices(choices)) => set.display(&choices),
                    _ => String::new(),
                };
                if options.is_loading(*source) && set.is_empty() {
                    (locale.text(Msg::Loading).to_string(), RowKind::Choice)
                } else {
                    (text, RowKind::Choice)
                }
            }
            SlotKind::Pick(_) => (
                value.map(|value| value.as_text()).unwrap_or_default(),
                RowKind::Choice,
            ),
            SlotKind::Permissions => {
                let text = match value {
                    Some(FieldValue::Tags(tags)) => tags.join(", "),
                    _ => String::new(),
                };
                (text, RowKind::Choice)
            }
            SlotKind::EntryHeader { .. } => (String::new(), RowKind::Header),
            SlotKind::AppendEntry { .. } => (String::new(), RowKind::Action),
        }
    }
}

/// A dialog session plus what the terminal needs to edit it: the focused
/// row and the open option popup.
#[derive(Debug)]
pub(crate) struct DialogEditor<R: FormRecord> {
    session: DialogSession<R>,
    focus: FieldFocus,
    popup: Option<Popup>,
}

impl<R: FormRecord> DialogEditor<R> {
    pub(crate) fn new(session: DialogSession<R>) -> Self {
        Self {
            session,
            focus: FieldFocus::default(),
            popup: None,
        }
    }

    pub(crate) fn session(&self) -> &DialogSession<R> {
        &self.session
    }

    pub(crate) fn is_open(&self) -> bool {
        self.session.is_open()
    }

    pub(crate) fn has_popup(&self) -> bool {
        self.popup.is_some()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.session.is_open() && self.session.form().is_dirty()
    }

    fn reset(&mut self) {
        self.focus.reset();
        self.popup = None;
    }

    pub(crate) fn open_create(&mut self) {
        self.reset();
        self.session.open_create();
    }

    pub(crate) fn open_edit(&mut self, id: u64, preview: Option<R>) {
        self.reset();
        self.session.open_edit(id, preview);
    }

    pub(crate) fn open_with(&mut self, id: u64, record: R) {
        self.reset();
        self.session.open_with(id, record);
    }

    pub(crate) fn close(&mut self) {
        self.reset();
        self.session.close();
    }

    pub(crate) fn session_mut(&mut self) -> &mut DialogSession<R> {
        &mut self.session
    }

    pub(crate) fn poll(&mut self) -> Vec<DialogEffect> {
        self.session.poll()
    }

    pub(crate) fn step(&mut self, delta: i32) {
        if let Some(form) = self.session.form_mut() {
            self.focus.step(form, delta);
        }
    }

    pub(crate) fn edit_text(&mut self, edit: TextEdit) -> bool {
        match self.session.form_mut() {
            Some(form) => self.focus.edit(form, edit),
            None => false,
        }
    }

    pub(crate) fn paste(&mut self, text: &str) {
        if let Some(form) = self.session.form_mut() {
            self.focus.paste(form, text);
        }
    }

    fn focused_slot(&self) -> Option<FieldSlot> {
        let slots = self.session.form().slots();
        self.focus.focused(&slots).cloned()
    }

    /// Enter on the focused row: toggles flags, opens option popups, adds
    /// array entries and otherwise moves on to the next row.
    pub(crate) fn activate(&mut self) {
        if self.session.phase() != DialogPhase::Editing {
            return;
        }
        let Some(slot) = self.focused_slot() else {
            return;
        };
        let locale = self.session.form().locale();
        let value = self.session.form().read(&slot.path);
        let label = slot.label.clone();
        match slot.kind {
            SlotKind::Flag => {
                if let Some(form) = self.session.form_mut() {
                    self.focus.toggle_flag(form);
                }
            }
            SlotKind::Select(source) => {
                let options = self.session.options().options(source, locale);
                let current = match value {
                    Some(FieldValue::Choice(choice)) => choice,
                    _ => None,
                };
                self.popup = Some(Popup::Choice(ChoicePopup::single(
                    slot.path, label, options, current,
                )));
            }
            SlotKind::MultiSelect(source) => {
                let options = self.session.options().options(source, locale);
                let current = match value {
                    Some(FieldValue::Choices(choices)) => choices,
                    _ => Vec::new(),
                };
                self.popup = Some(Popup::Choice(ChoicePopup::multi(
                    slot.path, label, options, current,
                )));
            }
            SlotKind::Pick(names) => {
                let current = value.map(|value| value.as_text()).unwrap_or_default();
                self.popup = Some(Popup::Choice(ChoicePopup::pick(
                    slot.path, label, names, &current,
                )));
            }
            SlotKind::Permissions => {
                let current = match value {
                    Some(FieldValue::Tags(tags)) => tags,
                    _ => Vec::new(),
                };
                self.popup = Some(Popup::Permissions(PermissionPopup::new(
                    slot.path, label, current,
                )));
            }
            SlotKind::AppendEntry { array } => {
                let Some(form) = self.session.form_mut() else {
                    return;
                };
                if let Some(key) = form.append_entry(&array) {
                    debug!(array = %array, %key, "entry appended");
                    self.focus.focus_where(form, |candidate| {
                        matches!(&candidate.kind, SlotKind::EntryHeader { key: k, .. } if *k == key)
                    });
                }
            }
            SlotKind::Text { .. }
            | SlotKind::Integer
            | SlotKind::Number
            | SlotKind::EntryHeader { .. } => self.step(1),
        }
    }

    pub(crate) fn remove_entry(&mut self) -> bool {
        let Some(SlotKind::EntryHeader { array, key }) = self.focused_slot().map(|slot| slot.kind)
        else {
            return false;
        };
        let Some(form) = self.session.form_mut() else {
            return false;
        };
        self.focus.commit(form);
        let removed = form.remove_entry(&array, key);
        self.focus.clamp(form.slots().len());
        removed
    }

    pub(crate) fn move_entry(&mut self, delta: i32) -> bool {
        let Some(SlotKind::EntryHeader { array, key }) = self.focused_slot().map(|slot| slot.kind)
        else {
            return false;
        };
        let Some(form) = self.session.form_mut() else {
            return false;
        };
        if !form.move_entry(&array, key, delta) {
            return false;
        }
        self.focus.focus_where(form, |candidate| {
            matches!(&candidate.kind, SlotKind::EntryHeader { key: k, .. } if *k == key)
        });
        true
    }

    pub(crate) fn popup_select(&mut self, delta: i32) {
        if let Some(popup) = self.popup.as_mut() {
            popup.select(delta);
        }
    }

    pub(crate) fn popup_toggle(&mut self) {
        if let Some(popup) = self.popup.as_mut() {
            popup.toggle();
        }
    }

    pub(crate) fn popup_cancel(&mut self) {
        self.popup = None;
    }

    /// Writes the popup's choice back and closes it.
    pub(crate) fn popup_apply(&mut self) {
        let Some(popup) = self.popup.take() else {
            return;
        };
        let Some((path, value)) = popup.apply() else {
            return;
        };
        if let Some(form) = self.session.form_mut() {
            match form.set(&path, value) {
                Ok(()) => form.blur(&path),
                Err(err) => warn!(path = %path, error = %err, "choice write rejected"),
            }
        }
    }

    pub(crate) fn begin_submit(&mut self) -> Result<SubmitRequest, usize> {
        if let Some(form) = self.session.form_mut() {
            self.focus.commit(form);
        }
        self.session.begin_submit()
    }

    pub(crate) fn view(&self) -> FormView {
        let form = self.session.form();
        let locale = form.locale();
        let note = match self.session.phase() {
            DialogPhase::Opening => Some(locale.text(Msg::Loading).to_string()),
            DialogPhase::Submitting => Some(locale.text(Msg::Submitting).to_string()),
            _ => None,
        };
        FormView {
            title: self.session.title().to_string(),
            rows: self.focus.rows(form, Some(self.session.options())),
            focus: self.focus.index(),
            global_errors: form.global_errors().to_vec(),
            note,
        }
    }

    pub(crate) fn popup_view(&self) -> Option<PopupView> {
        self.popup.as_ref().map(Popup::view)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        dialog::{DebounceWindows, DialogSpec, RefreshSignal},
        form::FormValidator,
        i18n::LocaleHandle,
        lookup::ManualClock,
        records::{RolePermissionForm, StrategyForm, TeamForm},
    };

    fn editor<R: FormRecord>() -> DialogEditor<R> {
        let spec = DialogSpec {
            resource: "/v1/test",
            create_title: Msg::CreateTeam,
            edit_title: Msg::EditTeam,
        };
        let session = DialogSession::new(
            spec,
            Arc::new(FormValidator::new().unwrap()),
            LocaleHandle::new(Locale::EnUs),
            Arc::new(ManualClock::new()),
            DebounceWindows::default(),
            RefreshSignal::new(),
        );
        DialogEditor::new(session)
    }

    fn type_text<R: FormRecord>(editor: &mut DialogEditor<R>, text: &str) {
        for ch in text.chars() {
            assert!(editor.edit_text(TextEdit::Insert(ch)));
        }
    }

    #[test]
    fn typing_writes_through_to_the_record() {
        let mut team = editor::<TeamForm>();
        team.open_create();
        type_text(&mut team, "Ops");
        assert_eq!(team.session().form().record().name, "Ops");
        assert_eq!(team.view().rows[0].value, "Ops");
    }

    #[test]
    fn leaving_an_empty_required_field_reports_it() {
        let mut team = editor::<TeamForm>();
        team.open_create();
        type_text(&mut team, "x");
        assert!(team.edit_text(TextEdit::Backspace));
        team.step(1);
        let view = team.view();
        assert_eq!(view.focus, 1);
        assert!(view.rows[0].error.is_some());
    }

    #[test]
    fn append_row_adds_a_level_and_focuses_it() {
        let mut strategy = editor::<StrategyForm>();
        strategy.open_create();
        let before = strategy.session().form().record().strategy_level.len();
        let append = strategy
            .session()
            .form()
            .slots()
            .iter()
            .position(|slot| {
                matches!(&slot.kind, SlotKind::AppendEntry { array } if *array == StrategyForm::levels_path())
            })
            .unwrap();
        strategy.step(append as i32);
        strategy.activate();
        assert_eq!(strategy.session().form().record().strategy_level.len(), before + 1);
        assert_eq!(strategy.view().rows[strategy.view().focus].kind, RowKind::Header);

        assert!(strategy.remove_entry());
        assert_eq!(strategy.session().form().record().strategy_level.len(), before);
    }

    #[test]
    fn permission_popup_writes_tags() {
        let mut role = editor::<RolePermissionForm>();
        role.open_create();
        role.step(1);
        role.activate();
        assert!(role.has_popup());
        role.popup_toggle();
        role.popup_apply();
        assert!(!role.has_popup());
        assert!(!role.session().form().record().permissions.is_empty());
    }

    #[test]
    fn nothing_is_editable_while_closed() {
        let mut team = editor::<TeamForm>();
        assert!(!team.edit_text(TextEdit::Insert('a')));
        team.activate();
        assert!(!team.has_popup());
    }
}
