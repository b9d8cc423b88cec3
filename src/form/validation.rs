use std::marker::PhantomData;

use jsonschema::{Validator, validator_for};
use serde_json::Value;
use thiserror::Error;

use crate::i18n::Locale;

use super::{
    error::FieldErrors,
    path::{FieldPath, pointer_segments},
    record::{FormRecord, Keyword, lookup_message},
};

#[derive(Debug, Error)]
#[error("failed to compile form schema: {message}")]
pub struct ValidatorBuildError {
    pub message: String,
}

#[derive(Debug)]
pub enum ValidationOutcome {
    Valid(Value),
    Invalid {
        errors: FieldErrors,
        global_errors: Vec<String>,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    pub fn issues(&self) -> usize {
        match self {
            ValidationOutcome::Valid(_) => 0,
            ValidationOutcome::Invalid {
                errors,
                global_errors,
            } => errors.len() + global_errors.len(),
        }
    }
}

/// Compiled JSON Schema of a record type. Constraints are declared on the
/// record with `schemars` attributes; failures are reported per field with
/// the record's localized messages.
pub struct FormValidator<R> {
    schema: Value,
    validator: Validator,
    _record: PhantomData<fn() -> R>,
}

impl<R: FormRecord> FormValidator<R> {
    pub fn new() -> Result<Self, ValidatorBuildError> {
        let schema = serde_json::to_value(schemars::schema_for!(R)).map_err(|err| {
            ValidatorBuildError {
                message: err.to_string(),
            }
        })?;
        let validator = validator_for(&schema).map_err(|err| ValidatorBuildError {
            message: err.to_string(),
        })?;
        Ok(Self {
            schema,
            validator,
            _record: PhantomData,
        })
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn check(&self, record: &R, locale: Locale) -> ValidationOutcome {
        let value = match serde_json::to_value(record) {
            Ok(value) => value,
            Err(err) => {
                return ValidationOutcome::Invalid {
                    errors: FieldErrors::new(),
                    global_errors: vec![format!("<root>: {err}")],
                };
            }
        };
        if self.validator.is_valid(&value) {
            return ValidationOutcome::Valid(value);
        }

        let mut errors = FieldErrors::new();
        let mut global = Vec::new();
        for error in self.validator.iter_errors(&value) {
            let pointer = error.instance_path.to_string();
            let keyword = Keyword::from_schema_location(&error.schema_path.to_string());
            match record.resolve(&pointer_segments(&pointer)) {
                Some(path) => {
                    let msg = lookup_message(R::messages(), &path.pattern(), keyword);
                    errors.insert(path, locale.text(msg));
                }
                None => {
                    let prefix = if pointer.is_empty() {
                        "<root>".to_string()
                    } else {
                        pointer
                    };
                    global.push(format!("{prefix}: {error}"));
                }
            }
        }
        ValidationOutcome::Invalid {
            errors,
            global_errors: global,
        }
    }

    /// Errors whose path lies under `prefix`, used when a single field loses
    /// focus.
    pub fn check_prefix(&self, record: &R, prefix: &FieldPath, locale: Locale) -> FieldErrors {
        let mut scoped = FieldErrors::new();
        if let ValidationOutcome::Invalid { errors, .. } = self.check(record, locale) {
            for (path, message) in errors.under(prefix) {
                scoped.insert(path.clone(), message);
            }
        }
        scoped
    }
}

impl<R> std::fmt::Debug for FormValidator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormValidator").finish_non_exhaustive()
    }
}
