use indexmap::IndexMap;
use thiserror::Error;

use super::path::{EntryKey, FieldPath};

/// Typed input could not be turned into the value a field holds.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{path}: {message}")]
pub struct FieldCoercionError {
    pub path: FieldPath,
    pub message: String,
}

impl FieldCoercionError {
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

/// Current error per field path, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    entries: IndexMap<FieldPath, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: FieldPath, message: impl Into<String>) {
        self.entries.entry(path).or_insert_with(|| message.into());
    }

    pub fn replace(&mut self, path: FieldPath, message: impl Into<String>) {
        self.entries.insert(path, message.into());
    }

    pub fn get(&self, path: &FieldPath) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn remove(&mut self, path: &FieldPath) -> Option<String> {
        self.entries.shift_remove(path)
    }

    pub fn remove_prefix(&mut self, prefix: &FieldPath) {
        self.entries.retain(|path, _| !path.starts_with(prefix));
    }

    /// Drops errors addressed through an entry that no longer exists.
    pub fn retain_entries(&mut self, alive: impl Fn(EntryKey) -> bool) {
        self.entries
            .retain(|path, _| path.entry_keys().all(|key| alive(key)));
    }

    pub fn extend(&mut self, other: FieldErrors) {
        for (path, message) in other.entries {
            self.insert(path, message);
        }
    }

    pub fn under<'a>(&'a self, prefix: &'a FieldPath) -> impl Iterator<Item = (&'a FieldPath, &'a str)> {
        self.iter().filter(move |(path, _)| path.starts_with(prefix))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &str)> {
        self.entries.iter().map(|(path, message)| (path, message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_error_per_path_wins() {
        let mut errors = FieldErrors::new();
        errors.insert(FieldPath::field("name"), "first");
        errors.insert(FieldPath::field("name"), "second");
        assert_eq!(errors.get(&FieldPath::field("name")), Some("first"));
        errors.replace(FieldPath::field("name"), "third");
        assert_eq!(errors.get(&FieldPath::field("name")), Some("third"));
    }

    #[test]
    fn errors_of_dead_entries_are_dropped() {
        let live = EntryKey::fresh();
        let dead = EntryKey::fresh();
        let levels = FieldPath::field("strategyLevel");
        let mut errors = FieldErrors::new();
        errors.insert(levels.entry(live).join("duration"), "bad");
        errors.insert(levels.entry(dead).join("duration"), "bad");
        errors.insert(FieldPath::field("name"), "required");
        errors.retain_entries(|key| key == live);
        assert_eq!(errors.len(), 2);
        assert!(errors.get(&levels.entry(dead).join("duration")).is_none());
    }
}
