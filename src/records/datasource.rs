use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{DatasourceType, Status, StorageType},
    form::{
        FieldCoercionError, FieldMessage, FieldPath, FieldSlot, FieldValue, FormRecord, Keyword,
        OptionSource, SlotKind, unknown_path,
    },
    i18n::{Locale, Msg},
};

use super::top_field;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[schemars(length(min = 1))]
    pub name: String,
    #[schemars(length(min = 1))]
    pub endpoint: String,
    pub storage_type: StorageType,
    pub status: Status,
    pub datasource_type: DatasourceType,
    #[serde(default)]
    #[schemars(length(max = 200))]
    pub remark: String,
}

impl Default for DatasourceForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            endpoint: String::new(),
            storage_type: StorageType::Prometheus,
            status: Status::Enable,
            datasource_type: DatasourceType::Metric,
            remark: String::new(),
        }
    }
}

static DATASOURCE_MESSAGES: [FieldMessage; 3] = [
    FieldMessage::new("name", Keyword::Any, Msg::ErrNameRequired),
    FieldMessage::new("endpoint", Keyword::Any, Msg::ErrEndpointRequired),
    FieldMessage::new("remark", Keyword::Any, Msg::ErrRemarkMax200),
];

impl FormRecord for DatasourceForm {
    fn messages() -> &'static [FieldMessage] {
        &DATASOURCE_MESSAGES
    }

    fn slots(&self, locale: Locale) -> Vec<FieldSlot> {
        let slot = |name: &str, label: Msg, kind: SlotKind| {
            FieldSlot::new(FieldPath::field(name), locale.text(label), kind)
        };
        vec![
            slot("name", Msg::FieldName, SlotKind::text()).required(),
            slot("endpoint", Msg::FieldEndpoint, SlotKind::text()).required(),
            slot(
                "storageType",
                Msg::FieldStorageType,
                SlotKind::Select(OptionSource::StorageType),
            ),
            slot(
                "datasourceType",
                Msg::FieldDatasourceType,
                SlotKind::Select(OptionSource::DatasourceType),
            ),
            slot("status", Msg::FieldStatus, SlotKind::Select(OptionSource::Status)),
            slot("remark", Msg::FieldRemark, SlotKind::text()),
        ]
    }

    fn read(&self, path: &FieldPath) -> Option<FieldValue> {
        Some(match top_field(path)? {
            "name" => FieldValue::Text(self.name.clone()),
            "endpoint" => FieldValue::Text(self.endpoint.clone()),
            "storageType" => FieldValue::Choice(Some(self.storage_type.code() as u64)),
            "status" => FieldValue::Choice(Some(self.status.code() as u64)),
            "datasourceType" => FieldValue::Choice(Some(self.datasource_type.code() as u64)),
            "remark" => FieldValue::Text(self.remark.clone()),
            _ => return None,
        })
    }

    fn write(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FieldCoercionError> {
        match top_field(path) {
            Some("name") => self.name = value.into_text(path)?,
            Some("endpoint") => self.endpoint = value.into_text(path)?,
            Some("storageType") => {
                self.storage_type = value.into_code(path, StorageType::from_code)?
            }
            Some("status") => self.status = value.into_code(path, Status::from_code)?,
            Some("datasourceType") => {
                self.datasource_type = value.into_code(path, DatasourceType::from_code)?
            }
            Some("remark") => self.remark = value.into_text(path)?,
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

impl From<crate::domain::DatasourceItem> for DatasourceForm {
    fn from(item: crate::domain::DatasourceItem) -> Self {
        Self {
            id: Some(item.id),
            name: item.name,
            endpoint: item.endpoint,
            storage_type: item.storage_type,
            status: item.status,
            datasource_type: item.datasource_type,
            remark: item.remark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormValidator, ValidationOutcome};

    #[test]
    fn name_and_endpoint_are_required() {
        let validator = FormValidator::<DatasourceForm>::new().unwrap();
        let ValidationOutcome::Invalid { errors, .. } =
            validator.check(&DatasourceForm::default(), Locale::EnUs)
        else {
            panic!("empty datasource should fail");
        };
        assert_eq!(errors.get(&FieldPath::field("name")), Some("Name is required"));
        assert_eq!(errors.get(&FieldPath::field("endpoint")), Some("Endpoint is required"));
    }

    #[test]
    fn defaults_follow_the_create_dialog() {
        let value = serde_json::to_value(DatasourceForm::default()).unwrap();
        assert_eq!(value["storageType"], 1);
        assert_eq!(value["datasourceType"], 1);
        assert_eq!(value["status"], 1);
    }
}
