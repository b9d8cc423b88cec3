use std::sync::Arc;

use crate::domain::OptionItem;

/// Options backing a select, loaded once per dialog session and never
/// mutated afterwards. Cloning shares the same list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSet {
    items: Arc<[OptionItem]>,
}

impl OptionSet {
    pub fn new(items: Vec<OptionItem>) -> Self {
        Self { items: items.into() }
    }

    pub fn items(&self) -> &[OptionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn label_of(&self, value: u64) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.value == value)
            .map(|item| item.label.as_str())
    }

    pub fn position_of(&self, value: u64) -> Option<usize> {
        self.items.iter().position(|item| item.value == value)
    }

    /// Returns the selection with `value` flipped. Disabled options can be
    /// deselected but never added.
    pub fn toggle(&self, selection: &[u64], value: u64) -> Vec<u64> {
        if selection.contains(&value) {
            return selection.iter().copied().filter(|v| *v != value).collect();
        }
        match self.items.iter().find(|item| item.value == value) {
            Some(item) if !item.disabled => {
                let mut next = selection.to_vec();
                next.push(value);
                next
            }
            _ => selection.to_vec(),
        }
    }

    pub fn flags(&self, selection: &[u64]) -> Vec<bool> {
        self.items
            .iter()
            .map(|item| selection.contains(&item.value))
            .collect()
    }

    /// Selection in option order. Values the set does not know about are
    /// kept at the end so an edit never silently drops them.
    pub fn from_flags(&self, flags: &[bool], previous: &[u64]) -> Vec<u64> {
        let mut values: Vec<u64> = self
            .items
            .iter()
            .zip(flags.iter())
            .filter_map(|(item, flag)| flag.then_some(item.value))
            .collect();
        values.extend(
            previous
                .iter()
                .copied()
                .filter(|value| self.position_of(*value).is_none()),
        );
        values
    }

    pub fn display(&self, selection: &[u64]) -> String {
        let labels = selection
            .iter()
            .map(|value| match self.label_of(*value) {
                Some(label) => label.to_string(),
                None => value.to_string(),
            })
            .collect::<Vec<_>>();
        format!("[{}]", labels.join(", "))
    }

    pub fn display_one(&self, value: Option<u64>) -> String {
        match value {
            Some(value) => self
                .label_of(value)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
            None => String::new(),
        }
    }
}

impl From<Vec<OptionItem>> for OptionSet {
    fn from(items: Vec<OptionItem>) -> Self {
        OptionSet::new(items)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    Checked,
    Indeterminate,
    Unchecked,
}

impl TriState {
    pub fn glyph(self) -> &'static str {
        match self {
            TriState::Checked => "[x]",
            TriState::Indeterminate => "[-]",
            TriState::Unchecked => "[ ]",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionGroup<T> {
    pub name: String,
    pub items: Vec<T>,
}

/// Items grouped by module, as used by the permission editor. Every
/// module state is derived from the full selection on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionGroups<T> {
    groups: Vec<OptionGroup<T>>,
}

impl<T: Clone + PartialEq> OptionGroups<T> {
    pub fn new(groups: Vec<OptionGroup<T>>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[OptionGroup<T>] {
        &self.groups
    }

    pub fn module_state(&self, module: usize, selection: &[T]) -> TriState {
        let Some(group) = self.groups.get(module) else {
            return TriState::Unchecked;
        };
        let chosen = group
            .items
            .iter()
            .filter(|item| selection.contains(item))
            .count();
        if chosen == 0 {
            TriState::Unchecked
        } else if chosen == group.items.len() {
            TriState::Checked
        } else {
            TriState::Indeterminate
        }
    }

    /// Selects the whole module unless it is already fully selected, in
    /// which case the module is cleared.
    pub fn toggle_module(&self, module: usize, selection: &[T]) -> Vec<T> {
        let Some(group) = self.groups.get(module) else {
            return selection.to_vec();
        };
        if self.module_state(module, selection) == TriState::Checked {
            return selection
                .iter()
                .filter(|item| !group.items.contains(item))
                .cloned()
                .collect();
        }
        let mut next = selection.to_vec();
        for item in &group.items {
            if !next.contains(item) {
                next.push(item.clone());
            }
        }
        next
    }

    pub fn toggle_item(&self, item: &T, selection: &[T]) -> Vec<T> {
        if selection.contains(item) {
            selection.iter().filter(|v| *v != item).cloned().collect()
        } else {
            let mut next = selection.to_vec();
            next.push(item.clone());
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> OptionSet {
        OptionSet::new(vec![
            OptionItem::new(1, "ops"),
            OptionItem::new(2, "dev").disabled(true),
            OptionItem::new(3, "dba"),
        ])
    }

    #[test]
    fn disabled_options_cannot_be_added() {
        let set = options();
        assert_eq!(set.toggle(&[], 2), Vec::<u64>::new());
        assert_eq!(set.toggle(&[2], 2), Vec::<u64>::new());
        assert_eq!(set.toggle(&[1], 3), vec![1, 3]);
    }

    #[test]
    fn unknown_values_survive_flag_edits() {
        let set = options();
        let values = set.from_flags(&[false, false, true], &[1, 42]);
        assert_eq!(values, vec![3, 42]);
        assert_eq!(set.display(&values), "[dba, 42]");
    }

    #[test]
    fn module_state_follows_the_full_selection() {
        let groups = OptionGroups::new(vec![
            OptionGroup {
                name: "strategy".into(),
                items: vec!["strategy:list", "strategy:create"],
            },
            OptionGroup {
                name: "team".into(),
                items: vec!["team:list"],
            },
        ]);
        let selection = vec!["strategy:list"];
        assert_eq!(groups.module_state(0, &selection), TriState::Indeterminate);
        let selection = groups.toggle_module(0, &selection);
        assert_eq!(groups.module_state(0, &selection), TriState::Checked);
        let selection = groups.toggle_module(0, &selection);
        assert_eq!(groups.module_state(0, &selection), TriState::Unchecked);
        assert_eq!(groups.module_state(1, &selection), TriState::Unchecked);
    }
}
