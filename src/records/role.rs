use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    form::{
        FieldCoercionError, FieldMessage, FieldPath, FieldSlot, FieldValue, FormRecord, Keyword,
        OptionGroup, OptionGroups, SlotKind, unknown_path,
    },
    i18n::{Locale, Msg},
};

use super::top_field;

pub const ROLES: &[&str] = &["管理员", "编辑", "查看者"];

/// API permissions grouped by module.
pub const PERMISSION_MODULES: &[(&str, &[&str])] = &[
    ("用户管理", &["获取用户列表", "创建用户", "更新用户", "删除用户"]),
    ("文章管理", &["获取文章列表", "创建文章", "更新文章", "删除文章"]),
    ("评论管理", &["获取评论列表", "创建评论", "更新评论", "删除评论"]),
    ("角色管理", &["获取角色列表", "创建角色", "更新角色", "删除角色"]),
];

pub fn permission_groups() -> OptionGroups<String> {
    OptionGroups::new(
        PERMISSION_MODULES
            .iter()
            .map(|(module, items)| OptionGroup {
                name: module.to_string(),
                items: items.iter().map(|item| item.to_string()).collect(),
            })
            .collect(),
    )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RolePermissionForm {
    #[schemars(length(min = 1))]
    pub role: String,
    #[schemars(length(min = 1))]
    pub permissions: Vec<String>,
}

static ROLE_MESSAGES: [FieldMessage; 2] = [
    FieldMessage::new("role", Keyword::Any, Msg::ErrRoleRequired),
    FieldMessage::new("permissions", Keyword::Any, Msg::ErrPermissionsMin),
];

impl FormRecord for RolePermissionForm {
    fn messages() -> &'static [FieldMessage] {
        &ROLE_MESSAGES
    }

    fn slots(&self, locale: Locale) -> Vec<FieldSlot> {
        vec![
            FieldSlot::new(
                FieldPath::field("role"),
                locale.text(Msg::FieldRole),
                SlotKind::Pick(ROLES),
            )
            .required(),
            FieldSlot::new(
                FieldPath::field("permissions"),
                locale.text(Msg::FieldPermissions),
                SlotKind::Permissions,
            )
            .required(),
        ]
    }

    fn read(&self, path: &FieldPath) -> Option<FieldValue> {
        Some(match top_field(path)? {
            "role" => FieldValue::Text(self.role.clone()),
            "permissions" => FieldValue::Tags(self.permissions.clone()),
            _ => return None,
        })
    }

    fn write(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FieldCoercionError> {
        match top_field(path) {
            Some("role") => self.role = value.into_text(path)?,
            Some("permissions") => self.permissions = value.into_tags(path)?,
            _ => return Err(unknown_path(path)),
        }
        Ok(())
    }

    fn id(&self) -> Option<u64> {
        None
    }

    fn set_id(&mut self, _id: Option<u64>) {}

    fn display_name(&self) -> &str {
        &self.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormValidator, TriState, ValidationOutcome};

    #[test]
    fn at_least_one_permission_is_required() {
        let validator = FormValidator::<RolePermissionForm>::new().unwrap();
        let form = RolePermissionForm {
            role: ROLES[0].to_string(),
            permissions: Vec::new(),
        };
        let ValidationOutcome::Invalid { errors, .. } = validator.check(&form, Locale::EnUs) else {
            panic!("no permissions should fail");
        };
        assert_eq!(
            errors.get(&FieldPath::field("permissions")),
            Some("Select at least one permission")
        );
    }

    #[test]
    fn module_toggle_selects_the_whole_module() {
        let groups = permission_groups();
        let selection = groups.toggle_module(0, &[]);
        assert_eq!(selection.len(), PERMISSION_MODULES[0].1.len());
        assert_eq!(groups.module_state(0, &selection), TriState::Checked);
        assert_eq!(groups.module_state(1, &selection), TriState::Unchecked);
    }
}
