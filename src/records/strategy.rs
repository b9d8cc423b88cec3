use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{Condition, DatasourceType, Status, SustainType},
    form::{
        EntryKey, FieldArray, FieldCoercionError, FieldMessage, FieldPath, FieldSlot, FieldValue,
        FormRecord, KeyValueList, KeyValuePair, Keyword, OptionSource, Segment, SlotKind,
        resolve_entry, unknown_path,
    },
    i18n::{Locale, Msg},
};

use super::{choice, top_field};

const LEVELS: &str = "strategyLevel";
const NOTICES: &str = "labelNotices";
const LABELS: &str = "labels";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Annotations {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
}

/// Label-matched notification route inside a level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabelNotice {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub alarm_group_ids: Vec<u64>,
}

impl LabelNotice {
    fn read(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "name" => FieldValue::Text(self.name.clone()),
            "value" => FieldValue::Text(self.value.clone()),
            "alarmGroupIds" => FieldValue::Choices(self.alarm_group_ids.clone()),
            _ => return None,
        })
    }

    fn write(
        &mut self,
        field: &str,
        path: &FieldPath,
        value: FieldValue,
    ) -> Result<(), FieldCoercionError> {
        match field {
            "name" => self.name = value.into_text(path)?,
            "value" => self.value = value.into_text(path)?,
            "alarmGroupIds" => self.alarm_group_ids = value.into_choices(path)?,
            _ => return Err(unknown_path(path)),
        }
        Ok(())
    }
}

/// One escalation level of a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StrategyLevel {
    #[schemars(regex(pattern = r"^[0-9]+s$"))]
    pub duration: String,
    #[schemars(range(min = 0))]
    pub count: i64,
    pub sustain_type: SustainType,
    #[schemars(regex(pattern = r"^[0-9]+s$"))]
    pub interval: String,
    pub status: Status,
    pub level_id: u64,
    pub threshold: f64,
    pub condition: Condition,
    #[serde(default)]
    pub alarm_group_ids: Vec<u64>,
    #[serde(default)]
    pub alarm_page_ids: Vec<u64>,
    #[serde(default)]
    pub label_notices: FieldArray<LabelNotice>,
}

impl Default for StrategyLevel {
    fn default() -> Self {
        Self {
            duration: String::new(),
            count: 0,
            sustain_type: SustainType::For,
            interval: String::new(),
            status: Status::Enable,
            level_id: 0,
            threshold: 0.0,
            condition: Condition::Unknown,
            alarm_group_ids: Vec::new(),
            alarm_page_ids: Vec::new(),
            label_notices: FieldArray::new(),
        }
    }
}

impl StrategyLevel {
    fn read(&self, rest: &[Segment]) -> Option<FieldValue> {
        match rest {
            [Segment::Field(field)] => Some(match field.as_str() {
                "duration" => FieldValue::Text(self.duration.clone()),
                "count" => FieldValue::Integer(self.count),
                "sustainType" => FieldValue::Choice(Some(self.sustain_type.code() as u64)),
                "interval" => FieldValue::Text(self.interval.clone()),
                "status" => FieldValue::Choice(Some(self.status.code() as u64)),
                "levelId" => FieldValue::Choice(choice(self.level_id)),
                "threshold" => FieldValue::Number(self.threshold),
                "condition" => FieldValue::Choice(Some(self.condition.code() as u64)),
                "alarmGroupIds" => FieldValue::Choices(self.alarm_group_ids.clone()),
                "alarmPageIds" => FieldValue::Choices(self.alarm_page_ids.clone()),
                NOTICES => FieldValue::Integer(self.label_notices.len() as i64),
                _ => return None,
            }),
            [Segment::Field(array), Segment::Entry(key), Segment::Field(field)]
                if array == NOTICES =>
            {
                self.label_notices.get(*key)?.read(field)
            }
            _ => None,
        }
    }

    fn write(
        &mut self,
        rest: &[Segment],
        path: &FieldPath,
        value: FieldValue,
    ) -> Result<(), FieldCoercionError> {
        match rest {
            [Segment::Field(field)] => match field.as_str() {
                "duration" => self.duration = value.into_text(path)?,
                "count" => self.count = value.into_integer(path)?,
                "sustainType" => self.sustain_type = value.into_code(path, SustainType::from_code)?,
                "interval" => self.interval = value.into_text(path)?,
                "status" => self.status = value.into_code(path, Status::from_code)?,
                "levelId" => self.level_id = value.into_choice(path)?.unwrap_or_default(),
                "threshold" => self.threshold = value.into_number(path)?,
                "condition" => self.condition = value.into_code(path, Condition::from_code)?,
                "alarmGroupIds" => self.alarm_group_ids = value.into_choices(path)?,
                "alarmPageIds" => self.alarm_page_ids = value.into_choices(path)?,
                _ => return Err(unknown_path(path)),
            },
            [Segment::Field(array), Segment::Entry(key), Segment::Field(field)]
                if array == NOTICES =>
            {
                let notice = self
                    .label_notices
                    .get_mut(*key)
                    .ok_or_else(|| unknown_path(path))?;
                notice.write(field, path, value)?;
            }
            _ => return Err(unknown_path(path)),
        }
        Ok(())
    }

    fn slots(&self, base: &FieldPath, locale: Locale, out: &mut Vec<FieldSlot>) {
        let field = |name: &str, label: Msg, kind: SlotKind| {
            FieldSlot::new(base.join(name), locale.text(label), kind).nested(1)
        };
        out.push(field("duration", Msg::FieldDuration, SlotKind::text()).required());
        out.push(field("count", Msg::FieldCount, SlotKind::Integer).required());
        out.push(field(
            "sustainType",
            Msg::FieldSustainType,
            SlotKind::Select(OptionSource::SustainType),
        ));
        out.push(field("interval", Msg::FieldInterval, SlotKind::text()).required());
        out.push(field(
            "condition",
            Msg::FieldCondition,
            SlotKind::Select(OptionSource::Condition),
        ));
        out.push(field("threshold", Msg::FieldThreshold, SlotKind::Number).required());
        out.push(field(
            "levelId",
            Msg::FieldAlarmLevel,
            SlotKind::Select(OptionSource::AlarmLevels),
        ));
        out.push(field("status", Msg::FieldStatus, SlotKind::Select(OptionSource::Status)));
        out.push(field(
            "alarmGroupIds",
            Msg::FieldAlarmGroups,
            SlotKind::MultiSelect(OptionSource::AlarmGroups),
        ));
        out.push(field(
            "alarmPageIds",
            Msg::FieldAlarmPages,
            SlotKind::MultiSelect(OptionSource::AlarmPages),
        ));

        let notices = base.join(NOTICES);
        for (index, entry) in self.label_notices.iter().enumerate() {
            let entry_path = notices.entry(entry.key());
            out.push(
                FieldSlot::new(
                    entry_path.clone(),
                    format!("{} #{}", locale.text(Msg::FieldLabelNotices), index + 1),
                    SlotKind::EntryHeader {
                        array: notices.clone(),
                        key: entry.key(),
                    },
                )
                .nested(1),
            );
            let nested = |name: &str, label: Msg, kind: SlotKind| {
                FieldSlot::new(entry_path.join(name), locale.text(label), kind).nested(2)
            };
            out.push(nested("name", Msg::FieldLabelName, SlotKind::text()));
            out.push(nested("value", Msg::FieldLabelValue, SlotKind::text()));
            out.push(nested(
                "alarmGroupIds",
                Msg::FieldAlarmGroups,
                SlotKind::MultiSelect(OptionSource::AlarmGroups),
            ));
        }
        out.push(
            FieldSlot::new(
                notices.clone(),
                locale.text(Msg::AddLabelNotice),
                SlotKind::AppendEntry { array: notices },
            )
            .nested(1),
        );
    }

    fn resolve(&self, base: FieldPath, segments: &[String]) -> Option<FieldPath> {
        match segments {
            [] => Some(base),
            [array, rest @ ..] if array == NOTICES => {
                let notices = base.join(NOTICES);
                if rest.is_empty() {
                    return Some(notices);
                }
                let (entry, rest) =
                    resolve_entry(notices, self.label_notices.keys(), rest)?;
                Some(match rest.first() {
                    Some(field) => entry.join(field.as_str()),
                    None => entry,
                })
            }
            [field, ..] => Some(base.join(field.as_str())),
        }
    }
}

/// Alert strategy dialog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StrategyForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub group_id: u64,
    #[schemars(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[schemars(length(max = 255))]
    pub remark: String,
    pub status: Status,
    #[serde(default)]
    pub categories_ids: Vec<u64>,
    #[serde(default)]
    pub alarm_group_ids: Vec<u64>,
    #[serde(default)]
    pub expr: String,
    #[serde(default)]
    pub datasource_ids: Vec<u64>,
    pub step: i64,
    pub source_type: DatasourceType,
    #[serde(default)]
    pub labels: KeyValueList,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default)]
    pub strategy_level: FieldArray<StrategyLevel>,
}

impl Default for StrategyForm {
    fn default() -> Self {
        Self {
            id: None,
            group_id: 0,
            name: String::new(),
            remark: String::new(),
            status: Status::Enable,
            categories_ids: Vec::new(),
            alarm_group_ids: Vec::new(),
            expr: String::new(),
            datasource_ids: Vec::new(),
            step: 10,
            source_type: DatasourceType::Metric,
            labels: KeyValueList::new(),
            annotations: Annotations::default(),
            strategy_level: FieldArray::new(),
        }
    }
}

static STRATEGY_MESSAGES: [FieldMessage; 8] = [
    FieldMessage::new("name", Keyword::Any, Msg::ErrNameRequired),
    FieldMessage::new("remark", Keyword::Any, Msg::ErrRemarkMax255),
    FieldMessage::new("step", Keyword::Any, Msg::ErrNumberExpected),
    FieldMessage::new("strategyLevel[].duration", Keyword::Any, Msg::ErrDurationPattern),
    FieldMessage::new("strategyLevel[].interval", Keyword::Any, Msg::ErrIntervalPattern),
    FieldMessage::new("strategyLevel[].count", Keyword::Minimum, Msg::ErrCountMin),
    FieldMessage::new("strategyLevel[].count", Keyword::Any, Msg::ErrNumberExpected),
    FieldMessage::new("strategyLevel[].threshold", Keyword::Any, Msg::ErrThresholdNumber),
];

impl StrategyForm {
    pub fn levels_path() -> FieldPath {
        FieldPath::field(LEVELS)
    }

    pub fn labels_path() -> FieldPath {
        FieldPath::field(LABELS)
    }

    pub fn level_path(key: EntryKey) -> FieldPath {
        Self::levels_path().entry(key)
    }

    fn level_and_rest<'p>(&self, path: &'p FieldPath) -> Option<(EntryKey, &'p [Segment])> {
        match path.segments() {
            [Segment::Field(array), Segment::Entry(key), rest @ ..] if array == LEVELS => {
                Some((*key, rest))
            }
            _ => None,
        }
    }

    fn label_row<'p>(&self, path: &'p FieldPath) -> Option<(EntryKey, &'p str)> {
        match path.segments() {
            [Segment::Field(array), Segment::Entry(key), Segment::Field(field)]
                if array == LABELS =>
            {
                Some((*key, field.as_str()))
            }
            _ => None,
        }
    }
}

impl FormRecord for StrategyForm {
    fn messages() -> &'static [FieldMessage] {
        &STRATEGY_MESSAGES
    }

    fn slots(&self, locale: Locale) -> Vec<FieldSlot> {
        let top = |name: &str, label: Msg, kind: SlotKind| {
            FieldSlot::new(FieldPath::field(name), locale.text(label), kind)
        };
        let mut out = vec![
            top("groupId", Msg::FieldGroup, SlotKind::Select(OptionSource::StrategyGroups)),
            top("name", Msg::FieldName, SlotKind::text()).required(),
            top("status", Msg::FieldStatus, SlotKind::Select(OptionSource::Status)),
            top(
                "categoriesIds",
                Msg::FieldCategories,
                SlotKind::MultiSelect(OptionSource::Categories),
            ),
            top(
                "alarmGroupIds",
                Msg::FieldAlarmGroups,
                SlotKind::MultiSelect(OptionSource::AlarmGroups),
            ),
            top(
                "sourceType",
                Msg::FieldSourceType,
                SlotKind::Select(OptionSource::DatasourceType),
            ),
            top(
                "datasourceIds",
                Msg::FieldDatasources,
                SlotKind::MultiSelect(OptionSource::Datasources),
            ),
            top("expr", Msg::FieldExpr, SlotKind::text()),
            top("step", Msg::FieldStep, SlotKind::Integer),
        ];

        let labels = Self::labels_path();
        for (index, row) in self.labels.rows().iter().enumerate() {
            let row_path = labels.entry(row.key());
            out.push(FieldSlot::new(
                row_path.clone(),
                format!("{} #{}", locale.text(Msg::FieldLabels), index + 1),
                SlotKind::EntryHeader {
                    array: labels.clone(),
                    key: row.key(),
                },
            ));
            out.push(
                FieldSlot::new(row_path.join("key"), locale.text(Msg::FieldLabelName), SlotKind::text())
                    .nested(1),
            );
            out.push(
                FieldSlot::new(
                    row_path.join("value"),
                    locale.text(Msg::FieldLabelValue),
                    SlotKind::text(),
                )
                .nested(1),
            );
        }
        out.push(FieldSlot::new(
            labels.clone(),
            locale.text(Msg::AddLabel),
            SlotKind::AppendEntry { array: labels },
        ));

        out.push(top("summary", Msg::FieldSummary, SlotKind::text()));
        out.push(top("description", Msg::FieldDescription, SlotKind::text()));

        let levels = Self::levels_path();
        for (index, entry) in self.strategy_level.iter().enumerate() {
            let entry_path = levels.entry(entry.key());
            out.push(FieldSlot::new(
                entry_path.clone(),
                locale.level_title(index + 1),
                SlotKind::EntryHeader {
                    array: levels.clone(),
                    key: entry.key(),
                },
            ));
            entry.value.slots(&entry_path, locale, &mut out);
        }
        out.push(FieldSlot::new(
            levels.clone(),
            locale.text(Msg::AddLevel),
            SlotKind::AppendEntry { array: levels },
        ));

        out.push(top("remark", Msg::FieldRemark, SlotKind::text()));
        out
    }

    fn read(&self, path: &FieldPath) -> Option<FieldValue> {
        if let Some(field) = top_field(path) {
            return Some(match field {
                "groupId" => FieldValue::Choice(choice(self.group_id)),
                "name" => FieldValue::Text(self.name.clone()),
                "remark" => FieldValue::Text(self.remark.clone()),
                "status" => FieldValue::Choice(Some(self.status.code() as u64)),
                "categoriesIds" => FieldValue::Choices(self.categories_ids.clone()),
                "alarmGroupIds" => FieldValue::Choices(self.alarm_group_ids.clone()),
                "expr" => FieldValue::Text(self.expr.clone()),
                "datasourceIds" => FieldValue::Choices(self.datasource_ids.clone()),
                "step" => FieldValue::Integer(self.step),
                "sourceType" => FieldValue::Choice(Some(self.source_type.code() as u64)),
                "summary" => FieldValue::Text(self.annotations.summary.clone()),
                "description" => FieldValue::Text(self.annotations.description.clone()),
                LABELS => FieldValue::Text(self.labels.describe()),
                LEVELS => FieldValue::Integer(self.strategy_level.len() as i64),
                _ => return None,
            });
        }
        if let Some((key, field)) = self.label_row(path) {
            let row = self.labels.rows().get(key)?;
            return match field {
                "key" => Some(FieldValue::Text(row.key.clone())),
                "value" => Some(FieldValue::Text(row.value.clone())),
                _ => None,
            };
        }
        let (key, rest) = self.level_and_rest(path)?;
        let level = self.strategy_level.get(key)?;
        if rest.is_empty() {
            return Some(FieldValue::Empty);
        }
        level.read(rest)
    }

    fn write(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FieldCoercionError> {
        if let Some(field) = top_field(path) {
            match field {
                "groupId" => self.group_id = value.into_choice(path)?.unwrap_or_default(),
                "name" => self.name = value.into_text(path)?,
                "remark" => self.remark = value.into_text(path)?,
                "status" => self.status = value.into_code(path, Status::from_code)?,
                "categoriesIds" => self.categories_ids = value.into_choices(path)?,
                "alarmGroupIds" => self.alarm_group_ids = value.into_choices(path)?,
                "expr" => self.expr = value.into_text(path)?,
                "datasourceIds" => self.datasource_ids = value.into_choices(path)?,
                "step" => self.step = value.into_integer(path)?,
                "sourceType" => {
                    self.source_type = value.into_code(path, DatasourceType::from_code)?
                }
                "summary" => self.annotations.summary = value.into_text(path)?,
                "description" => self.annotations.description = value.into_text(path)?,
                _ => return Err(unknown_path(path)),
            }
            return Ok(());
        }
        if let Some((key, field)) = self.label_row(path) {
            let row: &mut KeyValuePair = self
                .labels
                .rows_mut()
                .get_mut(key)
                .ok_or_else(|| unknown_path(path))?;
            match field {
                "key" => row.key = value.into_text(path)?,
                "value" => row.value = value.into_text(path)?,
                _ => return Err(unknown_path(path)),
            }
            return Ok(());
        }
        let (key, rest) = self.level_and_rest(path).ok_or_else(|| unknown_path(path))?;
        let level = self
            .strategy_level
            .get_mut(key)
            .ok_or_else(|| unknown_path(path))?;
        level.write(rest, path, value)
    }

    fn resolve(&self, segments: &[String]) -> Option<FieldPath> {
        match segments {
            [] => None,
            [array, rest @ ..] if array == LEVELS => {
                if rest.is_empty() {
                    return Some(Self::levels_path());
                }
                let (entry, rest) =
                    resolve_entry(Self::levels_path(), self.strategy_level.keys(), rest)?;
                let key = entry.entry_keys().last()?;
                self.strategy_level.get(key)?.resolve(entry, rest)
            }
            [field, ..] if field == LABELS => Some(Self::labels_path()),
            [field, rest @ ..] if field == "annotations" => {
                rest.first().map(|name| FieldPath::field(name.as_str()))
            }
            _ => Some(FieldPath::plain(segments)).filter(|path| !path.is_root()),
        }
    }

    fn append_entry(&mut self, array: &FieldPath) -> Option<EntryKey> {
        match array.segments() {
            [Segment::Field(name)] if name == LEVELS => {
                Some(self.strategy_level.append(StrategyLevel::default()))
            }
            [Segment::Field(name)] if name == LABELS => Some(self.labels.push("", "")),
            [Segment::Field(name), Segment::Entry(level), Segment::Field(nested)]
                if name == LEVELS && nested == NOTICES =>
            {
                let level = self.strategy_level.get_mut(*level)?;
                Some(level.label_notices.append(LabelNotice::default()))
            }
            _ => None,
        }
    }

    fn remove_entry(&mut self, array: &FieldPath, key: EntryKey) -> bool {
        match array.segments() {
            [Segment::Field(name)] if name == LEVELS => self.strategy_level.remove(key).is_some(),
            [Segment::Field(name)] if name == LABELS => {
                self.labels.rows_mut().remove(key).is_some()
            }
            [Segment::Field(name), Segment::Entry(level), Segment::Field(nested)]
                if name == LEVELS && nested == NOTICES =>
            {
                self.strategy_level
                    .get_mut(*level)
                    .is_some_and(|level| level.label_notices.remove(key).is_some())
            }
            _ => false,
        }
    }

    fn move_entry(&mut self, array: &FieldPath, key: EntryKey, delta: i32) -> bool {
        match array.segments() {
            [Segment::Field(name)] if name == LEVELS => self.strategy_level.move_entry(key, delta),
            [Segment::Field(name)] if name == LABELS => {
                self.labels.rows_mut().move_entry(key, delta)
            }
            [Segment::Field(name), Segment::Entry(level), Segment::Field(nested)]
                if name == LEVELS && nested == NOTICES =>
            {
                self.strategy_level
                    .get_mut(*level)
                    .is_some_and(|level| level.label_notices.move_entry(key, delta))
            }
            _ => false,
        }
    }

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: Option<u64>) {
        self.id = id;
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormValidator, ValidationOutcome};
    use serde_json::json;

    fn valid_level() -> StrategyLevel {
        StrategyLevel {
            duration: "30s".into(),
            interval: "10s".into(),
            threshold: 80.0,
            ..StrategyLevel::default()
        }
    }

    fn named(levels: Vec<StrategyLevel>) -> StrategyForm {
        StrategyForm {
            name: "cpu high".into(),
            strategy_level: FieldArray::from_values(levels),
            ..StrategyForm::default()
        }
    }

    fn errors_of(form: &StrategyForm) -> crate::form::FieldErrors {
        let validator = FormValidator::<StrategyForm>::new().unwrap();
        match validator.check(form, Locale::EnUs) {
            ValidationOutcome::Valid(_) => Default::default(),
            ValidationOutcome::Invalid { errors, .. } => errors,
        }
    }

    #[test]
    fn duration_must_be_seconds() {
        assert!(errors_of(&named(vec![valid_level()])).is_empty());
        for bad in ["30", "abc", "s", "30m"] {
            let mut level = valid_level();
            level.duration = bad.into();
            let form = named(vec![level]);
            let key = form.strategy_level.key_at(0).unwrap();
            let errors = errors_of(&form);
            assert_eq!(
                errors.get(&StrategyForm::level_path(key).join("duration")),
                Some("Duration must look like 30s"),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        let mut level = valid_level();
        level.threshold = f64::NAN;
        let form = named(vec![level]);
        let key = form.strategy_level.key_at(0).unwrap();
        let errors = errors_of(&form);
        assert_eq!(
            errors.get(&StrategyForm::level_path(key).join("threshold")),
            Some("Threshold must be a finite number")
        );
    }

    #[test]
    fn negative_count_is_rejected() {
        let mut level = valid_level();
        level.count = -1;
        let form = named(vec![level]);
        let key = form.strategy_level.key_at(0).unwrap();
        assert_eq!(
            errors_of(&form).get(&StrategyForm::level_path(key).join("count")),
            Some("Count cannot be negative")
        );
    }

    #[test]
    fn appended_level_is_validated_like_the_others() {
        let mut form = named(vec![valid_level()]);
        let key = form.append_entry(&StrategyForm::levels_path()).unwrap();
        let errors = errors_of(&form);
        assert!(errors.get(&StrategyForm::level_path(key).join("duration")).is_some());
        assert!(errors.get(&StrategyForm::level_path(key).join("interval")).is_some());
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn notice_name_edits_write_the_name() {
        let mut form = named(vec![valid_level()]);
        let level = form.strategy_level.key_at(0).unwrap();
        let notices = StrategyForm::level_path(level).join("labelNotices");
        let notice = form.append_entry(&notices).unwrap();
        let name = notices.entry(notice).join("name");
        form.write(&name, FieldValue::Text("severity".into())).unwrap();
        let stored = form.strategy_level.get(level).unwrap().label_notices.get(notice).unwrap();
        assert_eq!(stored.name, "severity");
        assert_eq!(stored.value, "");
    }

    #[test]
    fn payload_uses_backend_field_names() {
        let mut form = named(vec![valid_level()]);
        form.labels.push("env", "prod");
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["strategyLevel"][0]["duration"], json!("30s"));
        assert_eq!(value["strategyLevel"][0]["sustainType"], json!(1));
        assert_eq!(value["labels"], json!({"env": "prod"}));
        assert_eq!(value["step"], json!(10));
        assert!(value.get("id").is_none());
    }

    #[test]
    fn nested_pointers_resolve_to_entry_keys() {
        let mut form = named(vec![valid_level(), valid_level()]);
        let second = form.strategy_level.key_at(1).unwrap();
        let notices = StrategyForm::level_path(second).join("labelNotices");
        let notice = form.append_entry(&notices).unwrap();
        let segments: Vec<String> = ["strategyLevel", "1", "labelNotices", "0", "value"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(form.resolve(&segments), Some(notices.entry(notice).join("value")));
    }
}
