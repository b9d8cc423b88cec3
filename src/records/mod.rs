//! Typed dialog records. Each one derives its JSON Schema; the constraints
//! live on the fields as `schemars` attributes.

mod datasource;
mod login;
mod role;
mod strategy;
mod strategy_group;
mod team;

pub use datasource::DatasourceForm;
pub use login::{CaptchaAnswer, LoginForm, LoginRequest};
pub use role::{PERMISSION_MODULES, ROLES, RolePermissionForm, permission_groups};
pub use strategy::{Annotations, LabelNotice, StrategyForm, StrategyLevel};
pub use strategy_group::StrategyGroupForm;
pub use team::TeamForm;

use crate::form::{FieldPath, Segment};

/// Name of a top-level field, when `path` addresses one.
pub(crate) fn top_field(path: &FieldPath) -> Option<&str> {
    match path.segments() {
        [Segment::Field(name)] => Some(name.as_str()),
        _ => None,
    }
}

fn choice(id: u64) -> Option<u64> {
    (id != 0).then_some(id)
}
