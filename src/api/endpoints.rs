use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{
    domain::{
        DatasourceItem, DetailReply, DictItem, DictType, ListReply, OptionItem, PaginationReq,
        StrategyGroupItem, StrategyItem, TeamItem,
    },
    form::OptionSource,
    i18n::Locale,
    records::{DatasourceForm, LoginRequest, StrategyForm, StrategyGroupForm},
};

use super::{
    backend::{ApiRequest, Backend},
    error::ApiError,
};

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}

fn encode<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Query behind every list page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub keyword: String,
    pub pagination: PaginationReq,
}

impl ListQuery {
    pub fn all() -> Self {
        Self {
            keyword: String::new(),
            pagination: PaginationReq::ALL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DictListRequest {
    pub pagination: PaginationReq,
    pub dict_type: DictType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptchaRequest {
    pub captcha_type: i32,
    pub width: u32,
    pub height: u32,
    pub theme: String,
}

impl Default for CaptchaRequest {
    fn default() -> Self {
        Self {
            captcha_type: 1,
            width: 100,
            height: 40,
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptchaReply {
    pub id: String,
    #[serde(default)]
    pub captcha: String,
    #[serde(default)]
    pub captcha_type: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginReply {
    pub token: String,
}

/// Whether a dialog submit creates or updates; decided by the record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    Create,
    Update(u64),
}

impl SubmitKind {
    pub fn for_id(id: Option<u64>) -> Self {
        match id {
            Some(id) => SubmitKind::Update(id),
            None => SubmitKind::Create,
        }
    }

    pub fn is_create(self) -> bool {
        self == SubmitKind::Create
    }
}

pub fn create_path(resource: &str) -> String {
    format!("{resource}/create")
}

pub fn update_path(resource: &str, id: u64) -> String {
    format!("{resource}/{id}")
}

/// Creates or updates `payload` under `resource` (e.g. `/v1/team`).
pub async fn submit_record(
    backend: &dyn Backend,
    resource: &str,
    kind: SubmitKind,
    payload: Value,
) -> Result<Value, ApiError> {
    let request = match kind {
        SubmitKind::Create => ApiRequest::post(create_path(resource), payload),
        SubmitKind::Update(id) => ApiRequest::put(update_path(resource, id), payload),
    };
    backend.send(request).await
}

async fn list<T: DeserializeOwned>(
    backend: &dyn Backend,
    path: &str,
    query: &ListQuery,
) -> Result<ListReply<T>, ApiError> {
    decode(backend.send(ApiRequest::post(path, encode(query)?)).await?)
}

pub async fn list_teams(
    backend: &dyn Backend,
    query: &ListQuery,
) -> Result<ListReply<TeamItem>, ApiError> {
    list(backend, "/v1/team/list", query).await
}

pub async fn list_datasources(
    backend: &dyn Backend,
    query: &ListQuery,
) -> Result<ListReply<DatasourceItem>, ApiError> {
    list(backend, "/v1/datasource/list", query).await
}

pub async fn list_strategy_groups(
    backend: &dyn Backend,
    query: &ListQuery,
) -> Result<ListReply<StrategyGroupItem>, ApiError> {
    list(backend, "/v1/strategy/group/list", query).await
}

pub async fn list_strategies(
    backend: &dyn Backend,
    query: &ListQuery,
) -> Result<ListReply<StrategyItem>, ApiError> {
    list(backend, "/v1/strategy/list", query).await
}

async fn detail<T: DeserializeOwned>(backend: &dyn Backend, path: String) -> Result<T, ApiError> {
    let reply: DetailReply<T> = decode(backend.send(ApiRequest::get(path)).await?)?;
    Ok(reply.detail)
}

pub async fn datasource_detail(
    backend: &dyn Backend,
    id: u64,
) -> Result<DatasourceForm, ApiError> {
    let item: DatasourceItem = detail(backend, format!("/v1/datasource/{id}")).await?;
    Ok(item.into())
}

pub async fn strategy_group_detail(
    backend: &dyn Backend,
    id: u64,
) -> Result<StrategyGroupForm, ApiError> {
    let item: StrategyGroupItem = detail(backend, format!("/v1/strategy/group/{id}")).await?;
    Ok(item.into())
}

pub async fn strategy_detail(backend: &dyn Backend, id: u64) -> Result<StrategyForm, ApiError> {
    let mut form: StrategyForm = detail(backend, format!("/v1/strategy/{id}")).await?;
    form.id = Some(id);
    Ok(form)
}

pub async fn dict_options(
    backend: &dyn Backend,
    dict_type: DictType,
) -> Result<Vec<OptionItem>, ApiError> {
    let body = encode(&DictListRequest {
        pagination: PaginationReq::ALL,
        dict_type,
    })?;
    let reply: ListReply<DictItem> =
        decode(backend.send(ApiRequest::post("/v1/dict/select/list", body)).await?)?;
    Ok(reply.list.into_iter().map(OptionItem::from).collect())
}

pub async fn notice_group_options(backend: &dyn Backend) -> Result<Vec<OptionItem>, ApiError> {
    let body = json!({ "pagination": PaginationReq::ALL });
    let reply: ListReply<DictItem> =
        decode(backend.send(ApiRequest::post("/v1/notify/group/select/list", body)).await?)?;
    Ok(reply.list.into_iter().map(OptionItem::from).collect())
}

/// Loads the options of a remote select source. Static sources resolve
/// without a request.
pub async fn source_options(
    backend: &dyn Backend,
    source: OptionSource,
) -> Result<Vec<OptionItem>, ApiError> {
    match source {
        OptionSource::Categories => dict_options(backend, DictType::StrategyGroupCategory).await,
        OptionSource::AlarmLevels => dict_options(backend, DictType::AlarmLevel).await,
        OptionSource::AlarmPages => dict_options(backend, DictType::AlarmPage).await,
        OptionSource::AlarmGroups => notice_group_options(backend).await,
        OptionSource::StrategyGroups => {
            let reply = list_strategy_groups(backend, &ListQuery::all()).await?;
            Ok(reply.list.iter().map(OptionItem::from).collect())
        }
        OptionSource::Datasources => {
            let reply = list_datasources(backend, &ListQuery::all()).await?;
            Ok(reply.list.iter().map(OptionItem::from).collect())
        }
        other => Ok(other.static_options(Locale::default()).unwrap_or_default()),
    }
}

pub async fn captcha(
    backend: &dyn Backend,
    request: &CaptchaRequest,
) -> Result<CaptchaReply, ApiError> {
    decode(
        backend
            .send(ApiRequest::post("/v1/auth/captcha", encode(request)?))
            .await?,
    )
}

pub async fn login(backend: &dyn Backend, request: &LoginRequest) -> Result<LoginReply, ApiError> {
    decode(
        backend
            .send(ApiRequest::post("/v1/auth/login", encode(request)?))
            .await?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_paths_follow_the_record_id() {
        assert_eq!(SubmitKind::for_id(None), SubmitKind::Create);
        assert_eq!(create_path("/v1/team"), "/v1/team/create");
        assert_eq!(update_path("/v1/strategy/group", 7), "/v1/strategy/group/7");
    }

    #[test]
    fn list_query_omits_an_empty_keyword() {
        let value = serde_json::to_value(ListQuery::default()).unwrap();
        assert_eq!(value, json!({"pagination": {"pageNum": 1, "pageSize": 10}}));
    }
}
