use indexmap::IndexMap;
use schemars::{
    JsonSchema,
    r#gen::SchemaGenerator,
    schema::{InstanceType, ObjectValidation, Schema, SchemaObject},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};

use super::{array::FieldArray, path::EntryKey};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Editable string map (strategy labels). Rows keep their order and their
/// [`EntryKey`] while keys are being typed, and serialize as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValueList {
    rows: FieldArray<KeyValuePair>,
}

impl KeyValueList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &FieldArray<KeyValuePair> {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut FieldArray<KeyValuePair> {
        &mut self.rows
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> EntryKey {
        self.rows.append(KeyValuePair::new(key, value))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.rows
            .values()
            .filter(|pair| pair.key == key)
            .last()
            .map(|pair| pair.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows with a blank key never reach the payload; a repeated key keeps
    /// the last row.
    pub fn to_map(&self) -> IndexMap<String, String> {
        let mut map = IndexMap::new();
        for pair in self.rows.values() {
            let key = pair.key.trim();
            if key.is_empty() {
                continue;
            }
            map.insert(key.to_string(), pair.value.clone());
        }
        map
    }

    pub fn describe(&self) -> String {
        if self.rows.is_empty() {
            return "{}".to_string();
        }
        self.to_map()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<(String, String)> for KeyValueList {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            rows: FieldArray::from_values(
                iter.into_iter().map(|(key, value)| KeyValuePair { key, value }),
            ),
        }
    }
}

impl Serialize for KeyValueList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map = self.to_map();
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (key, value) in &map {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

impl<'de> Deserialize<'de> for KeyValueList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Option::<IndexMap<String, String>>::deserialize(deserializer)?;
        Ok(map.unwrap_or_default().into_iter().collect())
    }
}

impl JsonSchema for KeyValueList {
    fn schema_name() -> String {
        "KeyValueList".to_string()
    }

    fn is_referenceable() -> bool {
        false
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::Object.into()),
            object: Some(Box::new(ObjectValidation {
                additional_properties: Some(Box::new(generator.subschema_for::<String>())),
                ..Default::default()
            })),
            ..Default::default()
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_keys_are_left_out_of_the_payload() {
        let mut labels = KeyValueList::new();
        labels.push("env", "prod");
        labels.push("  ", "ignored");
        assert_eq!(serde_json::to_value(&labels).unwrap(), json!({"env": "prod"}));
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn null_deserializes_to_an_empty_list() {
        let labels: KeyValueList = serde_json::from_value(json!(null)).unwrap();
        assert!(labels.is_empty());
        let labels: KeyValueList = serde_json::from_value(json!({"a": "1", "b": "2"})).unwrap();
        assert_eq!(labels.get("b"), Some("2"));
    }
}
