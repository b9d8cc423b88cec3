use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    domain::TeamItem,
    form::{
        FieldCoercionError, FieldMessage, FieldPath, FieldSlot, FieldValue, FormRecord, Keyword,
        SlotKind, unknown_path,
    },
    i18n::{Locale, Msg},
};

use super::top_field;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TeamForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[schemars(length(min = 1, max = 20))]
    pub name: String,
    #[serde(default)]
    #[schemars(length(max = 255))]
    pub logo: String,
    #[serde(default)]
    #[schemars(length(max = 200))]
    pub remark: String,
}

static TEAM_MESSAGES: [FieldMessage; 4] = [
    FieldMessage::new("name", Keyword::MaxLength, Msg::ErrNameMax),
    FieldMessage::new("name", Keyword::Any, Msg::ErrNameRequired),
    FieldMessage::new("logo", Keyword::Any, Msg::ErrLogoMax),
    FieldMessage::new("remark", Keyword::Any, Msg::ErrRemarkMax200),
];

impl FormRecord for TeamForm {
    fn messages() -> &'static [FieldMessage] {
        &TEAM_MESSAGES
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
                FieldPath::field("logo"),
                locale.text(Msg::FieldLogo),
                SlotKind::text(),
            ),
            FieldSlot::new(
                FieldPath::field("remark"),
                locale.text(Msg::FieldRemark),
                SlotKind::text(),
            ),
        ]
    }

    fn read(&self, path: &FieldPath) -> Option<FieldValue> {
        Some(FieldValue::Text(match top_field(path)? {
            "name" => self.name.clone(),
            "logo" => self.logo.clone(),
            "remark" => self.remark.clone(),
            _ => return None,
        }))
    }

    fn write(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FieldCoercionError> {
        let slot = match top_field(path) {
            Some("name") => &mut self.name,
            Some("logo") => &mut self.logo,
            Some("remark") => &mut self.remark,
            _ => return Err(unknown_path(path)),
        };
        *slot = value.into_text(path)?;
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

impl From<TeamItem> for TeamForm {
    fn from(item: TeamItem) -> Self {
        Self {
            id: Some(item.id),
            name: item.name,
            logo: item.logo,
            remark: item.remark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormValidator, ValidationOutcome};

    #[test]
    fn name_length_is_bounded_on_both_sides() {
        let validator = FormValidator::<TeamForm>::new().unwrap();
        let too_long = TeamForm {
            name: "n".repeat(21),
            ..TeamForm::default()
        };
        let ValidationOutcome::Invalid { errors, .. } = validator.check(&too_long, Locale::EnUs)
        else {
            panic!("21 characters should fail");
        };
        assert_eq!(
            errors.get(&FieldPath::field("name")),
            Some("Name cannot exceed 20 characters")
        );

        let ops = TeamForm {
            name: "Ops".into(),
            logo: "http://x/y.png".into(),
            ..TeamForm::default()
        };
        assert!(validator.check(&ops, Locale::EnUs).is_valid());
    }
}
