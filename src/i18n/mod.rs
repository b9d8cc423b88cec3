use std::{
    fmt,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
};

use serde::{Deserialize, Serialize};

mod catalog;

pub use catalog::Msg;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::ZhCn, Locale::EnUs];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
        }
    }

    pub fn text(self, msg: Msg) -> &'static str {
        match self {
            Locale::ZhCn => msg.zh(),
            Locale::EnUs => msg.en(),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Locale::ZhCn => Locale::EnUs,
            Locale::EnUs => Locale::ZhCn,
        }
    }

    /// Success toast for a saved record.
    pub fn saved(self, name: &str, created: bool) -> String {
        match (self, created) {
            (Locale::ZhCn, true) => format!("{name}创建成功"),
            (Locale::ZhCn, false) => format!("{name}更新成功"),
            (Locale::EnUs, true) => format!("{name} created"),
            (Locale::EnUs, false) => format!("{name} updated"),
        }
    }

    pub fn page_size(self, size: usize) -> String {
        match self {
            Locale::ZhCn => format!("{size} 条/页"),
            Locale::EnUs => format!("{size} / page"),
        }
    }

    pub fn level_title(self, position: usize) -> String {
        match self {
            Locale::ZhCn => format!("策略等级 {position}"),
            Locale::EnUs => format!("Strategy level {position}"),
        }
    }

    fn code(self) -> u8 {
        match self {
            Locale::ZhCn => 0,
            Locale::EnUs => 1,
        }
    }

    fn from_code(code: u8) -> Self {
        match code {
            1 => Locale::EnUs,
            _ => Locale::ZhCn,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocale(pub String);

impl fmt::Display for UnknownLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown locale '{}' (expected zh-CN or en-US)", self.0)
    }
}

impl std::error::Error for UnknownLocale {}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "zh-cn" | "zh" => Ok(Locale::ZhCn),
            "en-us" | "en" => Ok(Locale::EnUs),
            _ => Err(UnknownLocale(raw.to_string())),
        }
    }
}

/// Active UI language shared by the views and the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct LocaleHandle {
    inner: Arc<AtomicU8>,
}

impl LocaleHandle {
    pub fn new(locale: Locale) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(locale.code())),
        }
    }

    pub fn get(&self) -> Locale {
        Locale::from_code(self.inner.load(Ordering::Relaxed))
    }

    pub fn set(&self, locale: Locale) {
        self.inner.store(locale.code(), Ordering::Relaxed);
    }

    pub fn text(&self, msg: Msg) -> &'static str {
        self.get().text(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_style_locale_names() {
        assert_eq!("zh-CN".parse::<Locale>(), Ok(Locale::ZhCn));
        assert_eq!("en_US".parse::<Locale>(), Ok(Locale::EnUs));
        assert!("fr-FR".parse::<Locale>().is_err());
    }

    #[test]
    fn switching_locale_is_visible_through_every_clone() {
        let handle = LocaleHandle::default();
        let shared = handle.clone();
        assert_eq!(shared.get(), Locale::ZhCn);
        handle.set(Locale::EnUs);
        assert_eq!(shared.get(), Locale::EnUs);
        assert_eq!(shared.text(Msg::NetworkAnomaly), "network anomaly");
    }

    #[test]
    fn saved_toast_carries_record_name() {
        assert_eq!(Locale::EnUs.saved("Ops", true), "Ops created");
        assert_eq!(Locale::ZhCn.saved("Ops", true), "Ops创建成功");
    }
}
