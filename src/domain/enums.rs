use schemars::{
    JsonSchema,
    r#gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

use crate::i18n::{Locale, Msg};

use super::model::OptionItem;

/// Integer-coded enum shared with the backend. `$sentinel` is the "unknown/all"
/// member that never shows up as a selectable option.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident default $default:ident sentinel $sentinel:ident {
            $($variant:ident = $code:literal => $msg:expr),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        pub enum $name {
            $($variant = $code),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn code(self) -> i32 {
                self as i32
            }

            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)*
                    _ => None,
                }
            }

            pub fn msg(self) -> Msg {
                match self {
                    $($name::$variant => $msg),*
                }
            }

            pub fn label(self, locale: Locale) -> &'static str {
                locale.text(self.msg())
            }

            pub fn options(locale: Locale) -> Vec<OptionItem> {
                Self::ALL
                    .iter()
                    .filter(|variant| **variant != $name::$sentinel)
                    .map(|variant| OptionItem::new(variant.code() as u64, variant.label(locale)))
                    .collect()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i32(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = i32::deserialize(deserializer)?;
                $name::from_code(code).ok_or_else(|| {
                    D::Error::custom(format!(concat!("invalid ", stringify!($name), " code {}"), code))
                })
            }
        }

        impl JsonSchema for $name {
            fn schema_name() -> String {
                stringify!($name).to_string()
            }

            fn is_referenceable() -> bool {
                false
            }

            fn json_schema(_: &mut SchemaGenerator) -> Schema {
                SchemaObject {
                    instance_type: Some(InstanceType::Integer.into()),
                    enum_values: Some(vec![$(serde_json::json!($code)),*]),
                    ..Default::default()
                }
                .into()
            }
        }
    };
}

code_enum! {
    Status default Enable sentinel All {
        All = 0 => Msg::StatusAll,
        Enable = 1 => Msg::StatusEnable,
        Disable = 2 => Msg::StatusDisable,
    }
}

code_enum! {
    Condition default Unknown sentinel Unknown {
        Unknown = 0 => Msg::StatusAll,
        Eq = 1 => Msg::ConditionEq,
        Ne = 2 => Msg::ConditionNe,
        Gt = 3 => Msg::ConditionGt,
        Gte = 4 => Msg::ConditionGte,
        Lt = 5 => Msg::ConditionLt,
        Lte = 6 => Msg::ConditionLte,
    }
}

code_enum! {
    SustainType default For sentinel Unknown {
        Unknown = 0 => Msg::SustainFor,
        For = 1 => Msg::SustainFor,
        Max = 2 => Msg::SustainMax,
        Min = 3 => Msg::SustainMin,
    }
}

code_enum! {
    DatasourceType default Metric sentinel Unknown {
        Unknown = 0 => Msg::StatusAll,
        Metric = 1 => Msg::DatasourceMetric,
        Log = 2 => Msg::DatasourceLog,
        Trace = 3 => Msg::DatasourceTrace,
    }
}

code_enum! {
    StorageType default Prometheus sentinel Unknown {
        Unknown = 0 => Msg::StatusAll,
        Prometheus = 1 => Msg::StoragePrometheus,
        VictoriaMetrics = 2 => Msg::StorageVictoriaMetrics,
    }
}

code_enum! {
    DictType default Unknown sentinel Unknown {
        Unknown = 0 => Msg::StatusAll,
        StrategyGroupCategory = 2 => Msg::FieldCategories,
        AlarmLevel = 3 => Msg::FieldAlarmLevel,
        AlarmPage = 4 => Msg::FieldAlarmPages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_round_trip_as_integer_codes() {
        assert_eq!(serde_json::to_value(Status::Disable).unwrap(), serde_json::json!(2));
        let parsed: Condition = serde_json::from_value(serde_json::json!(4)).unwrap();
        assert_eq!(parsed, Condition::Gte);
        assert!(serde_json::from_value::<StorageType>(serde_json::json!(9)).is_err());
    }

    #[test]
    fn options_skip_the_sentinel_member() {
        let options = DatasourceType::options(Locale::EnUs);
        let values: Vec<u64> = options.iter().map(|item| item.value).collect();
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(Status::options(Locale::ZhCn)[0].label, "启用");
    }

    #[test]
    fn defaults_match_the_form_defaults() {
        assert_eq!(Status::default(), Status::Enable);
        assert_eq!(SustainType::default(), SustainType::For);
        assert_eq!(StorageType::default(), StorageType::Prometheus);
    }
}
