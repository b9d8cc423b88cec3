use crate::{
    form::{FieldPath, FieldValue, OptionGroups, OptionSet},
    presentation::{PopupLine, PopupView},
    records::permission_groups,
};

#[derive(Debug, Clone)]
enum ChoiceSource {
    Options(OptionSet),
    Names(&'static [&'static str]),
}

impl ChoiceSource {
    fn labels(&self) -> Vec<String> {
        match self {
            ChoiceSource::Options(options) => {
                options.items().iter().map(|item| item.label.clone()).collect()
            }
            ChoiceSource::Names(names) => names.iter().map(|name| name.to_string()).collect(),
        }
    }
}

/// Option list for a select, a multi-select or a fixed pick list.
#[derive(Debug, Clone)]
pub(crate) struct ChoicePopup {
    path: FieldPath,
    title: String,
    source: ChoiceSource,
    labels: Vec<String>,
    selected: usize,
    /// Present for multi-selects.
    flags: Option<Vec<bool>>,
    previous: Vec<u64>,
}

impl ChoicePopup {
    pub(crate) fn single(
        path: FieldPath,
        title: impl Into<String>,
        options: OptionSet,
        current: Option<u64>,
    ) -> Self {
        let selected = current
            .and_then(|value| options.position_of(value))
            .unwrap_or(0);
        Self::build(path, title.into(), ChoiceSource::Options(options), selected, None, Vec::new())
    }

    pub(crate) fn multi(
        path: FieldPath,
        title: impl Into<String>,
        options: OptionSet,
        current: Vec<u64>,
    ) -> Self {
        let flags = options.flags(&current);
        Self::build(
            path,
            title.into(),
            ChoiceSource::Options(options),
            0,
            Some(flags),
            current,
        )
    }

    pub(crate) fn pick(
        path: FieldPath,
        title: impl Into<String>,
        names: &'static [&'static str],
        current: &str,
    ) -> Self {
        let selected = names.iter().position(|name| *name == current).unwrap_or(0);
        Self::build(path, title.into(), ChoiceSource::Names(names), selected, None, Vec::new())
    }

    fn build(
        path: FieldPath,
        title: String,
        source: ChoiceSource,
        selected: usize,
        flags: Option<Vec<bool>>,
        previous: Vec<u64>,
    ) -> Self {
        Self {
            path,
            title,
            labels: source.labels(),
            source,
            selected,
            flags,
            previous,
        }
    }

    pub(crate) fn select(&mut self, delta: i32) {
        self.selected = wrap(self.selected, delta, self.labels.len());
    }

    /// Disabled options can be cleared but never added.
    pub(crate) fn toggle(&mut self) {
        let disabled = match &self.source {
            ChoiceSource::Options(options) => options
                .items()
                .get(self.selected)
                .is_some_and(|item| item.disabled),
            ChoiceSource::Names(_) => false,
        };
        if let Some(flag) = self
            .flags
            .as_mut()
            .and_then(|flags| flags.get_mut(self.selected))
        {
            if *flag || !disabled {
                *flag = !*flag;
            }
        }
    }

    /// The value to write back. An empty option list yields nothing.
    pub(crate) fn apply(&self) -> Option<(FieldPath, FieldValue)> {
        let value = match (&self.source, &self.flags) {
            (ChoiceSource::Options(options), Some(flags)) => {
                FieldValue::Choices(options.from_flags(flags, &self.previous))
            }
            (ChoiceSource::Options(options), None) => {
                let item = options
                    .items()
                    .get(self.selected)
                    .filter(|item| !item.disabled)?;
                FieldValue::Choice(Some(item.value))
            }
            (ChoiceSource::Names(names), _) => {
                FieldValue::Text(names.get(self.selected)?.to_string())
            }
        };
        Some((self.path.clone(), value))
    }

    pub(crate) fn view(&self) -> PopupView {
        let lines = self
            .labels
            .iter()
            .enumerate()
            .map(|(index, label)| PopupLine {
                marker: self.flags.as_ref().map(|flags| {
                    if flags.get(index).copied().unwrap_or(false) {
                        "[x]"
                    } else {
                        "[ ]"
                    }
                }),
                text: label.clone(),
                depth: 0,
            })
            .collect();
        PopupView {
            title: self.title.clone(),
            lines,
            selected: self.selected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PermissionRow {
    Module(usize),
    Item(usize, usize),
}

/// Grouped permission picker: modules expand to their permissions, and
/// toggling a module row selects or clears the whole module.
#[derive(Debug, Clone)]
pub(crate) struct PermissionPopup {
    path: FieldPath,
    title: String,
    groups: OptionGroups<String>,
    rows: Vec<PermissionRow>,
    selected: usize,
    selection: Vec<String>,
}

impl PermissionPopup {
    pub(crate) fn new(path: FieldPath, title: impl Into<String>, current: Vec<String>) -> Self {
        let groups = permission_groups();
        let rows = groups
            .groups()
            .iter()
            .enumerate()
            .flat_map(|(module, group)| {
                std::iter::once(PermissionRow::Module(module))
                    .chain((0..group.items.len()).map(move |item| PermissionRow::Item(module, item)))
            })
            .collect();
        Self {
            path,
            title: title.into(),
            groups,
            rows,
            selected: 0,
            selection: current,
        }
    }

    pub(crate) fn select(&mut self, delta: i32) {
        self.selected = wrap(self.selected, delta, self.rows.len());
    }

    pub(crate) fn toggle(&mut self) {
        self.selection = match self.rows.get(self.selected) {
            Some(PermissionRow::Module(module)) => {
                self.groups.toggle_module(*module, &self.selection)
            }
            Some(PermissionRow::Item(module, item)) => {
                match self.groups.groups()[*module].items.get(*item) {
                    Some(permission) => self.groups.toggle_item(permission, &self.selection),
                    None => return,
                }
            }
            None => return,
        };
    }

    pub(crate) fn selection(&self) -> &[String] {
        &self.selection
    }

    pub(crate) fn apply(&self) -> (FieldPath, FieldValue) {
        (self.path.clone(), FieldValue::Tags(self.selection.clone()))
    }

    pub(crate) fn view(&self) -> PopupView {
        let groups = self.groups.groups();
        let lines = self
            .rows
            .iter()
            .map(|row| match *row {
                PermissionRow::Module(module) => PopupLine {
                    marker: Some(self.groups.module_state(module, &self.selection).glyph()),
                    text: groups[module].name.clone(),
                    depth: 0,
                },
                PermissionRow::Item(module, item) => {
                    let name = &groups[module].items[item];
                    PopupLine {
                        marker: Some(if self.selection.contains(name) {
                            "[x]"
                        } else {
                            "[ ]"
                        }),
                        text: name.clone(),
                        depth: 1,
                    }
                }
            })
            .collect();
        PopupView {
            title: self.title.clone(),
            lines,
            selected: self.selected,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Popup {
    Choice(ChoicePopup),
    Permissions(PermissionPopup),
}

impl Popup {
    pub(crate) fn select(&mut self, delta: i32) {
        match self {
            Popup::Choice(popup) => popup.select(delta),
            Popup::Permissions(popup) => popup.select(delta),
        }
    }

    pub(crate) fn toggle(&mut self) {
        match self {
            Popup::Choice(popup) => popup.toggle(),
            Popup::Permissions(popup) => popup.toggle(),
        }
    }

    pub(crate) fn apply(&self) -> Option<(FieldPath, FieldValue)> {
        match self {
            Popup::Choice(popup) => popup.apply(),
            Popup::Permissions(popup) => Some(popup.apply()),
        }
    }

    pub(crate) fn view(&self) -> PopupView {
        match self {
            Popup::Choice(popup) => popup.view(),
            Popup::Permissions(popup) => popup.view(),
        }
    }
}

fn wrap(current: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as i64 + delta as i64).rem_euclid(len as i64) as usize
}
