use schemars::{JsonSchema, r#gen::SchemaGenerator, schema::Schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeSeq};
use serde_json::Value;

use super::path::EntryKey;

#[derive(Debug, Clone)]
pub struct Entry<T> {
    key: EntryKey,
    pub value: T,
}

impl<T> Entry<T> {
    pub fn key(&self) -> EntryKey {
        self.key
    }
}

/// Ordered list of structurally identical sub-records. Entries are owned by
/// the array and identified by a key handed out at creation.
#[derive(Debug, Clone)]
pub struct FieldArray<T> {
    entries: Vec<Entry<T>>,
    selected: usize,
}

impl<T> Default for FieldArray<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            selected: 0,
        }
    }
}

impl<T> FieldArray<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            entries: values
                .into_iter()
                .map(|value| Entry {
                    key: EntryKey::fresh(),
                    value,
                })
                .collect(),
            selected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entry<T>> {
        self.entries.iter_mut()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = EntryKey> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    pub fn get(&self, key: EntryKey) -> Option<&T> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: EntryKey) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|entry| entry.key == key)
            .map(|entry| &mut entry.value)
    }

    pub fn index_of(&self, key: EntryKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    pub fn key_at(&self, index: usize) -> Option<EntryKey> {
        self.entries.get(index).map(|entry| entry.key)
    }

    /// Pushes `value` at the end and returns its key. Existing entries keep
    /// their keys and values.
    pub fn append(&mut self, value: T) -> EntryKey {
        let key = EntryKey::fresh();
        self.entries.push(Entry { key, value });
        self.selected = self.entries.len() - 1;
        key
    }

    pub fn remove(&mut self, key: EntryKey) -> Option<T> {
        let index = self.index_of(key)?;
        self.remove_at(index).map(|entry| entry.value)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Entry<T>> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
        Some(removed)
    }

    pub fn move_entry(&mut self, key: EntryKey, delta: i32) -> bool {
        let Some(index) = self.index_of(key) else {
            return false;
        };
        let target = index as i64 + delta as i64;
        if target < 0 || target >= self.entries.len() as i64 {
            return false;
        }
        self.entries.swap(index, target as usize);
        self.selected = target as usize;
        true
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.selected.min(self.entries.len() - 1))
        }
    }

    pub fn selected_key(&self) -> Option<EntryKey> {
        self.selected_index().and_then(|index| self.key_at(index))
    }

    pub fn select(&mut self, delta: i32) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let len = self.entries.len() as i32;
        let next = (self.selected as i32 + delta).clamp(0, len - 1);
        let changed = next as usize != self.selected;
        self.selected = next as usize;
        changed
    }

    pub fn summaries(&self, describe: impl Fn(&T) -> String) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| format!("#{} {}", idx + 1, describe(&entry.value)))
            .collect()
    }
}

impl<T: PartialEq> PartialEq for FieldArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.values().eq(other.values())
    }
}

impl<T: Serialize> Serialize for FieldArray<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for value in self.values() {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldArray<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<T>::deserialize(deserializer)?;
        Ok(FieldArray::from_values(values))
    }
}

impl<T: JsonSchema> JsonSchema for FieldArray<T> {
    fn schema_name() -> String {
        <Vec<T>>::schema_name()
    }

    fn is_referenceable() -> bool {
        false
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        <Vec<T>>::json_schema(generator)
    }
}

pub fn summarize_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(num) => num.to_string(),
        Value::String(text) => {
            if text.chars().count() > 24 {
                let head: String = text.chars().take(24).collect();
                format!("\"{head}…\"")
            } else {
                format!("\"{text}\"")
            }
        }
        Value::Array(items) => format!("array({})", items.len()),
        Value::Object(map) => format!("object({})", map.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn append_then_remove_restores_previous_entries() {
        let mut array = FieldArray::from_values(["a".to_string(), "b".to_string()]);
        let before: Vec<_> = array.iter().map(|e| (e.key(), e.value.clone())).collect();
        let key = array.append(String::new());
        assert_eq!(array.len(), 3);
        assert_eq!(array.remove(key), Some(String::new()));
        let after: Vec<_> = array.iter().map(|e| (e.key(), e.value.clone())).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn removal_shifts_positions_but_keeps_keys() {
        let mut array = FieldArray::from_values([1, 2, 3]);
        let third = array.key_at(2).unwrap();
        array.remove_at(0);
        assert_eq!(array.index_of(third), Some(1));
        assert_eq!(array.get(third), Some(&3));
    }

    #[test]
    fn serializes_as_a_plain_list() {
        let array = FieldArray::from_values([json!({"a": 1}), json!({"a": 2})]);
        assert_eq!(serde_json::to_value(&array).unwrap(), json!([{"a": 1}, {"a": 2}]));
        let parsed: FieldArray<u8> = serde_json::from_value(json!([4, 5])).unwrap();
        assert_eq!(parsed.values().copied().collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn move_entry_respects_bounds() {
        let mut array = FieldArray::from_values(['x', 'y']);
        let first = array.key_at(0).unwrap();
        assert!(!array.move_entry(first, -1));
        assert!(array.move_entry(first, 1));
        assert_eq!(array.index_of(first), Some(1));
        assert_eq!(array.selected_key(), Some(first));
    }

    #[test]
    fn summarize_value_truncates_long_strings_on_char_boundaries() {
        let value = Value::String("告警规则名称非常长非常长非常长非常长非常长非常长的文本".to_string());
        let summary = summarize_value(&value);
        assert!(summary.ends_with("…\""));
        assert_eq!(summary.chars().count(), 24 + 3);
    }
}
