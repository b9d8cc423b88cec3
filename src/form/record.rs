use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    domain::{Condition, DatasourceType, OptionItem, Status, StorageType, SustainType},
    i18n::{Locale, Msg},
};

use super::{
    error::FieldCoercionError,
    path::{EntryKey, FieldPath},
};

/// Where a select takes its options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionSource {
    Status,
    Condition,
    SustainType,
    DatasourceType,
    StorageType,
    Categories,
    StrategyGroups,
    Datasources,
    AlarmLevels,
    AlarmGroups,
    AlarmPages,
}

impl OptionSource {
    pub fn is_remote(self) -> bool {
        self.static_options(Locale::default()).is_none()
    }

    pub fn static_options(self, locale: Locale) -> Option<Vec<OptionItem>> {
        match self {
            OptionSource::Status => Some(Status::options(locale)),
            OptionSource::Condition => Some(Condition::options(locale)),
            OptionSource::SustainType => Some(SustainType::options(locale)),
            OptionSource::DatasourceType => Some(DatasourceType::options(locale)),
            OptionSource::StorageType => Some(StorageType::options(locale)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotKind {
    Text { secret: bool },
    Integer,
    Number,
    Flag,
    Select(OptionSource),
    MultiSelect(OptionSource),
    /// One of a fixed list of strings.
    Pick(&'static [&'static str]),
    Permissions,
    /// Row standing for a whole array entry; removal and reordering act on it.
    EntryHeader { array: FieldPath, key: EntryKey },
    AppendEntry { array: FieldPath },
}

impl SlotKind {
    pub fn text() -> Self {
        SlotKind::Text { secret: false }
    }

    pub fn secret() -> Self {
        SlotKind::Text { secret: true }
    }

    pub fn accepts_text(&self) -> bool {
        matches!(
            self,
            SlotKind::Text { .. } | SlotKind::Integer | SlotKind::Number
        )
    }

    /// Turns typed text into the value the slot holds.
    pub fn parse_text(&self, raw: &str) -> Result<FieldValue, Msg> {
        match self {
            SlotKind::Text { .. } => Ok(FieldValue::Text(raw.to_string())),
            SlotKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| Msg::ErrNumberExpected),
            SlotKind::Number => raw
                .trim()
                .parse::<f64>()
                .map(FieldValue::Number)
                .map_err(|_| Msg::ErrNumberExpected),
            _ => Err(Msg::ErrInvalidValue),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Flag(bool),
    Choice(Option<u64>),
    Choices(Vec<u64>),
    Tags(Vec<String>),
    Empty,
}

impl FieldValue {
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Integer(value) => value.to_string(),
            FieldValue::Number(value) => value.to_string(),
            FieldValue::Flag(flag) => flag.to_string(),
            FieldValue::Choice(Some(value)) => value.to_string(),
            FieldValue::Choice(None) | FieldValue::Empty => String::new(),
            FieldValue::Choices(values) => values
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::Tags(tags) => tags.join(", "),
        }
    }

    pub fn into_text(self, path: &FieldPath) -> Result<String, FieldCoercionError> {
        match self {
            FieldValue::Text(text) => Ok(text),
            other => Err(mismatch(path, "text", &other)),
        }
    }

    pub fn into_integer(self, path: &FieldPath) -> Result<i64, FieldCoercionError> {
        match self {
            FieldValue::Integer(value) => Ok(value),
            other => Err(mismatch(path, "integer", &other)),
        }
    }

    pub fn into_number(self, path: &FieldPath) -> Result<f64, FieldCoercionError> {
        match self {
            FieldValue::Number(value) => Ok(value),
            FieldValue::Integer(value) => Ok(value as f64),
            other => Err(mismatch(path, "number", &other)),
        }
    }

    pub fn into_flag(self, path: &FieldPath) -> Result<bool, FieldCoercionError> {
        match self {
            FieldValue::Flag(flag) => Ok(flag),
            other => Err(mismatch(path, "flag", &other)),
        }
    }

    pub fn into_choice(self, path: &FieldPath) -> Result<Option<u64>, FieldCoercionError> {
        match self {
            FieldValue::Choice(value) => Ok(value),
            other => Err(mismatch(path, "choice", &other)),
        }
    }

    pub fn into_choices(self, path: &FieldPath) -> Result<Vec<u64>, FieldCoercionError> {
        match self {
            FieldValue::Choices(values) => Ok(values),
            other => Err(mismatch(path, "choices", &other)),
        }
    }

    pub fn into_tags(self, path: &FieldPath) -> Result<Vec<String>, FieldCoercionError> {
        match self {
            FieldValue::Tags(tags) => Ok(tags),
            other => Err(mismatch(path, "tags", &other)),
        }
    }

    /// Reads an integer-coded enum out of a choice.
    pub fn into_code<E>(
        self,
        path: &FieldPath,
        from_code: impl Fn(i32) -> Option<E>,
    ) -> Result<E, FieldCoercionError> {
        let Some(code) = self.into_choice(path)? else {
            return Err(FieldCoercionError::new(path.clone(), "a value is required"));
        };
        i32::try_from(code)
            .ok()
            .and_then(from_code)
            .ok_or_else(|| FieldCoercionError::new(path.clone(), format!("unknown code {code}")))
    }
}

fn mismatch(path: &FieldPath, expected: &str, got: &FieldValue) -> FieldCoercionError {
    FieldCoercionError::new(path.clone(), format!("expected {expected}, got {got:?}"))
}

pub fn unknown_path(path: &FieldPath) -> FieldCoercionError {
    FieldCoercionError::new(path.clone(), "no such field")
}

/// One editable row of a dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    pub path: FieldPath,
    pub label: String,
    pub kind: SlotKind,
    pub required: bool,
    pub depth: u16,
}

impl FieldSlot {
    pub fn new(path: FieldPath, label: impl Into<String>, kind: SlotKind) -> Self {
        Self {
            path,
            label: label.into(),
            kind,
            required: false,
            depth: 0,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nested(mut self, depth: u16) -> Self {
        self.depth = depth;
        self
    }
}

/// Validation keyword, taken from the last segment of the failing schema
/// location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Minimum,
    Maximum,
    Type,
    MinItems,
    Enum,
    Other,
    /// Matches every keyword.
    Any,
}

impl Keyword {
    pub fn from_schema_location(location: &str) -> Self {
        match location.rsplit('/').next().unwrap_or_default() {
            "required" => Keyword::Required,
            "minLength" => Keyword::MinLength,
            "maxLength" => Keyword::MaxLength,
            "pattern" => Keyword::Pattern,
            "minimum" | "exclusiveMinimum" => Keyword::Minimum,
            "maximum" | "exclusiveMaximum" => Keyword::Maximum,
            "type" => Keyword::Type,
            "minItems" => Keyword::MinItems,
            "enum" => Keyword::Enum,
            _ => Keyword::Other,
        }
    }

    fn matches(self, other: Keyword) -> bool {
        self == Keyword::Any || self == other
    }
}

/// Localized message for a constraint, keyed by path pattern and keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMessage {
    pub pattern: &'static str,
    pub keyword: Keyword,
    pub msg: Msg,
}

impl FieldMessage {
    pub const fn new(pattern: &'static str, keyword: Keyword, msg: Msg) -> Self {
        Self {
            pattern,
            keyword,
            msg,
        }
    }
}

pub fn lookup_message(table: &[FieldMessage], pattern: &str, keyword: Keyword) -> Msg {
    table
        .iter()
        .find(|entry| entry.pattern == pattern && entry.keyword.matches(keyword))
        .map(|entry| entry.msg)
        .unwrap_or(match keyword {
            Keyword::Type => Msg::ErrNumberExpected,
            _ => Msg::ErrInvalidValue,
        })
}

/// A typed dialog record: serializes to the request payload and exposes its
/// fields to the editor by path.
pub trait FormRecord:
    Clone + Default + Serialize + DeserializeOwned + JsonSchema + Send + Sync + 'static
{
    /// Messages for every constraint the record's schema declares.
    fn messages() -> &'static [FieldMessage];

    fn slots(&self, locale: Locale) -> Vec<FieldSlot>;

    fn read(&self, path: &FieldPath) -> Option<FieldValue>;

    fn write(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FieldCoercionError>;

    /// Maps raw payload segments (`["strategyLevel", "0", "duration"]`) onto a
    /// path addressed by entry keys.
    fn resolve(&self, segments: &[String]) -> Option<FieldPath> {
        let path = FieldPath::plain(segments);
        (!path.is_root()).then_some(path)
    }

    fn append_entry(&mut self, _array: &FieldPath) -> Option<EntryKey> {
        None
    }

    fn remove_entry(&mut self, _array: &FieldPath, _key: EntryKey) -> bool {
        false
    }

    fn move_entry(&mut self, _array: &FieldPath, _key: EntryKey, _delta: i32) -> bool {
        false
    }

    fn id(&self) -> Option<u64>;

    fn set_id(&mut self, id: Option<u64>);

    fn display_name(&self) -> &str;
}

/// Resolves `[array, index, rest..]` against the keys of an array.
pub fn resolve_entry<'a>(
    base: FieldPath,
    keys: impl Iterator<Item = EntryKey>,
    segments: &'a [String],
) -> Option<(FieldPath, &'a [String])> {
    let (index, rest) = segments.split_first()?;
    let index = index.parse::<usize>().ok()?;
    let key = keys.into_iter().nth(index)?;
    Some((base.entry(key), rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_comes_from_the_last_schema_segment() {
        assert_eq!(
            Keyword::from_schema_location("/properties/strategyLevel/items/properties/duration/pattern"),
            Keyword::Pattern
        );
        assert_eq!(Keyword::from_schema_location("/required"), Keyword::Required);
        assert_eq!(Keyword::from_schema_location(""), Keyword::Other);
    }

    #[test]
    fn message_lookup_prefers_exact_keyword_then_any() {
        let table = [
            FieldMessage::new("name", Keyword::MinLength, Msg::ErrNameRequired),
            FieldMessage::new("name", Keyword::Any, Msg::ErrNameMax),
        ];
        assert_eq!(lookup_message(&table, "name", Keyword::MinLength), Msg::ErrNameRequired);
        assert_eq!(lookup_message(&table, "name", Keyword::MaxLength), Msg::ErrNameMax);
        assert_eq!(lookup_message(&table, "remark", Keyword::MaxLength), Msg::ErrInvalidValue);
    }

    #[test]
    fn numeric_slots_reject_free_text() {
        assert_eq!(SlotKind::Integer.parse_text(" 3 "), Ok(FieldValue::Integer(3)));
        assert_eq!(SlotKind::Integer.parse_text("abc"), Err(Msg::ErrNumberExpected));
        assert_eq!(SlotKind::Number.parse_text("1.5"), Ok(FieldValue::Number(1.5)));
    }
}
