use crate::{
    domain::{DatasourceItem, DictItem, StrategyGroupItem, StrategyItem, TeamItem},
    i18n::Msg,
};

use super::{Column, TableSpec};

fn labels(items: &[DictItem]) -> String {
    items
        .iter()
        .map(|item| item.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn team_columns() -> TableSpec<TeamItem> {
    TableSpec::new(vec![
        Column::raw(Msg::FieldId, 4, |row: &TeamItem| row.id.to_string()),
        Column::raw(Msg::FieldName, 12, |row: &TeamItem| row.name.clone()),
        Column::rendered(Msg::FieldStatus, 6, |row: &TeamItem, locale| {
            row.status.label(locale).to_string()
        }),
        Column::raw(Msg::FieldRemark, 16, |row: &TeamItem| row.remark.clone()),
    ])
    .with_row_action(Msg::EditTeam)
}

pub fn datasource_columns() -> TableSpec<DatasourceItem> {
    TableSpec::new(vec![
        Column::raw(Msg::FieldId, 4, |row: &DatasourceItem| row.id.to_string()),
        Column::raw(Msg::FieldName, 12, |row: &DatasourceItem| row.name.clone()),
        Column::rendered(Msg::FieldStorageType, 10, |row: &DatasourceItem, locale| {
            row.storage_type.label(locale).to_string()
        }),
        Column::raw(Msg::FieldEndpoint, 20, |row: &DatasourceItem| row.endpoint.clone()),
        Column::rendered(Msg::FieldStatus, 6, |row: &DatasourceItem, locale| {
            row.status.label(locale).to_string()
        }),
    ])
    .with_row_action(Msg::EditDatasource)
}

pub fn strategy_group_columns() -> TableSpec<StrategyGroupItem> {
    TableSpec::new(vec![
        Column::raw(Msg::FieldId, 4, |row: &StrategyGroupItem| row.id.to_string()),
        Column::raw(Msg::FieldName, 12, |row: &StrategyGroupItem| row.name.clone()),
        Column::raw(Msg::FieldCategories, 10, |row: &StrategyGroupItem| {
            labels(&row.categories)
        }),
        Column::rendered(Msg::FieldStatus, 6, |row: &StrategyGroupItem, locale| {
            row.status.label(locale).to_string()
        }),
        Column::raw(Msg::FieldRemark, 16, |row: &StrategyGroupItem| row.remark.clone()),
    ])
    .with_row_action(Msg::EditStrategyGroup)
}

pub fn strategy_columns() -> TableSpec<StrategyItem> {
    TableSpec::new(vec![
        Column::raw(Msg::FieldId, 4, |row: &StrategyItem| row.id.to_string()),
        Column::raw(Msg::FieldName, 12, |row: &StrategyItem| row.name.clone()),
        Column::raw(Msg::FieldGroup, 10, |row: &StrategyItem| {
            row.group
                .as_ref()
                .map(|group| group.name.clone())
                .unwrap_or_default()
        }),
        Column::raw(Msg::FieldExpr, 24, |row: &StrategyItem| row.expr.clone()),
        Column::rendered(Msg::FieldStatus, 6, |row: &StrategyItem, locale| {
            row.status.label(locale).to_string()
        }),
    ])
    .with_row_action(Msg::EditStrategy)
}
