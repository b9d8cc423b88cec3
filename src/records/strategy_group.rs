use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{Status, StrategyGroupItem},
    form::{
        FieldCoercionError, FieldMessage, FieldPath, FieldSlot, FieldValue, FormRecord, Keyword,
        OptionSource, SlotKind, unknown_path,
    },
    i18n::{Locale, Msg},
};

use super::top_field;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StrategyGroupForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[schemars(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[schemars(length(max = 255))]
    pub remark: String,
    pub status: Status,
    #[serde(default)]
    pub categories_ids: Vec<u64>,
}

impl Default for StrategyGroupForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            remark: String::new(),
            status: Status::Enable,
            categories_ids: Vec::new(),
        }
    }
}

static GROUP_MESSAGES: [FieldMessage; 2] = [
    FieldMessage::new("name", Keyword::Any, Msg::ErrNameRequired),
    FieldMessage::new("remark", Keyword::Any, Msg::ErrRemarkMax255),
];

impl FormRecord for StrategyGroupForm {
    fn messages() -> &'static [FieldMessage] {
        &GROUP_MESSAGES
    }

    fn slots(&self, locale: Locale) -> Vec<FieldSlot> {
        vec![
            FieldSlot::new(
                FieldPath::field("name"),
                locale.text(Msg::FieldName),
                SlotKind::text(),
            )
            .required(),
            FieldSlot::new(
                FieldPath::field("status"),
                locale.text(Msg::FieldStatus),
                SlotKind::Select(OptionSource::Status),
            ),
            FieldSlot::new(
                FieldPath::field("categoriesIds"),
                locale.text(Msg::FieldCategories),
                SlotKind::MultiSelect(OptionSource::Categories),
            ),
            FieldSlot::new(
                FieldPath::field("remark"),
                locale.text(Msg::FieldRemark),
                SlotKind::text(),
            ),
        ]
    }

    fn read(&self, path: &FieldPath) -> Option<FieldValue> {
        Some(match top_field(path)? {
            "name" => FieldValue::Text(self.name.clone()),
            "remark" => FieldValue::Text(self.remark.clone()),
            "status" => FieldValue::Choice(Some(self.status.code() as u64)),
            "categoriesIds" => FieldValue::Choices(self.categories_ids.clone()),
            _ => return None,
        })
    }

    fn write(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FieldCoercionError> {
        match top_field(path) {
            Some("name") => self.name = value.into_text(path)?,
            Some("remark") => self.remark = value.into_text(path)?,
            Some("status") => self.status = value.into_code(path, Status::from_code)?,
            Some("categoriesIds") => self.categories_ids = value.into_choices(path)?,
            _ => return Err(unknown_path(path)),
        }
        Ok(())
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

impl From<StrategyGroupItem> for StrategyGroupForm {
    fn from(item: StrategyGroupItem) -> Self {
        Self {
            id: Some(item.id),
            categories_ids: item.categories.iter().map(|dict| dict.value).collect(),
            name: item.name,
            remark: item.remark,
            status: item.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormValidator, ValidationOutcome};

    #[test]
    fn long_remark_is_rejected_with_its_message() {
        let validator = FormValidator::<StrategyGroupForm>::new().unwrap();
        let group = StrategyGroupForm {
            name: "core".into(),
            remark: "r".repeat(256),
            ..StrategyGroupForm::default()
        };
        let ValidationOutcome::Invalid { errors, .. } = validator.check(&group, Locale::ZhCn) else {
            panic!("remark of 256 characters should fail");
        };
        assert_eq!(errors.get(&FieldPath::field("remark")), Some("备注最多255字符"));
        assert_eq!(errors.len(), 1);
    }
}
