use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::form::{
    FieldCoercionError, FieldMessage, FieldPath, FieldSlot, FieldValue, FormRecord, Keyword,
    SlotKind, unknown_path,
};
use crate::i18n::{Locale, Msg};

use super::top_field;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoginForm {
    #[schemars(length(min = 1, max = 20))]
    pub username: String,
    #[schemars(length(min = 1, max = 20))]
    pub password: String,
    #[schemars(length(min = 1, max = 10))]
    pub captcha: String,
    #[serde(skip)]
    pub remember: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptchaAnswer {
    pub code: String,
    pub id: String,
}

/// Body of the login call. The password never leaves the console in clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub captcha: CaptchaAnswer,
}

impl LoginForm {
    pub fn to_request(&self, captcha_id: &str) -> LoginRequest {
        LoginRequest {
            username: self.username.clone(),
            password: format!("{:x}", md5::compute(self.password.as_bytes())),
            captcha: CaptchaAnswer {
                code: self.captcha.clone(),
                id: captcha_id.to_string(),
            },
        }
    }
}

static LOGIN_MESSAGES: [FieldMessage; 6] = [
    FieldMessage::new("username", Keyword::MaxLength, Msg::ErrUsernameMax),
    FieldMessage::new("username", Keyword::Any, Msg::ErrUsernameMin),
    FieldMessage::new("password", Keyword::MaxLength, Msg::ErrPasswordMax),
    FieldMessage::new("password", Keyword::Any, Msg::ErrPasswordMin),
    FieldMessage::new("captcha", Keyword::MaxLength, Msg::ErrCaptchaMax),
    FieldMessage::new("captcha", Keyword::Any, Msg::ErrCaptchaMin),
];

impl FormRecord for LoginForm {
    fn messages() -> &'static [FieldMessage] {
        &LOGIN_MESSAGES
    }

    fn slots(&self, locale: Locale) -> Vec<FieldSlot> {
        vec![
            FieldSlot::new(
                FieldPath::field("username"),
                locale.text(Msg::FieldUsername),
                SlotKind::text(),
            )
            .required(),
            FieldSlot::new(
                FieldPath::field("password"),
                locale.text(Msg::FieldPassword),
                SlotKind::secret(),
            )
            .required(),
            FieldSlot::new(
                FieldPath::field("captcha"),
                locale.text(Msg::FieldCaptcha),
                SlotKind::text(),
            )
            .required(),
            FieldSlot::new(
                FieldPath::field("remember"),
                locale.text(Msg::FieldRememberMe),
                SlotKind::Flag,
            ),
        ]
    }

    fn read(&self, path: &FieldPath) -> Option<FieldValue> {
        Some(match top_field(path)? {
            "username" => FieldValue::Text(self.username.clone()),
            "password" => FieldValue::Text(self.password.clone()),
            "captcha" => FieldValue::Text(self.captcha.clone()),
            "remember" => FieldValue::Flag(self.remember),
            _ => return None,
        })
    }

    fn write(&mut self, path: &FieldPath, value: FieldValue) -> Result<(), FieldCoercionError> {
        match top_field(path) {
            Some("username") => self.username = value.into_text(path)?,
            Some("password") => self.password = value.into_text(path)?,
            Some("captcha") => self.captcha = value.into_text(path)?,
            Some("remember") => self.remember = value.into_flag(path)?,
            _ => return Err(unknown_path(path)),
        }
        Ok(())
    }

    /// The backend reports captcha problems under `code`.
    fn resolve(&self, segments: &[String]) -> Option<FieldPath> {
        match segments.first().map(String::as_str) {
            Some("code") => Some(FieldPath::field("captcha")),
            Some(field) => Some(FieldPath::field(field)),
            None => None,
        }
    }

    fn id(&self) -> Option<u64> {
        None
    }

    fn set_id(&mut self, _id: Option<u64>) {}

    fn display_name(&self) -> &str {
        &self.username
    }
}
