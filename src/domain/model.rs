use serde::{Deserialize, Serialize};

use super::enums::{DatasourceType, Status, StorageType};

/// The unit exchanged with every select and multi-select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub value: u64,
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
}

impl OptionItem {
    pub fn new(value: u64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationReq {
    pub page_num: u32,
    pub page_size: u32,
}

impl PaginationReq {
    /// Option lists are fetched in one oversized page.
    pub const ALL: PaginationReq = PaginationReq {
        page_num: 1,
        page_size: 999,
    };
}

impl Default for PaginationReq {
    fn default() -> Self {
        Self {
            page_num: 1,
            page_size: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationReply {
    #[serde(default)]
    pub page_num: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListReply<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub pagination: PaginationReply,
}

impl<T> Default for ListReply<T> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            pagination: PaginationReply::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailReply<T> {
    pub detail: T,
}

/// Dictionary entry as returned by the select-list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictItem {
    pub value: u64,
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
}

impl From<DictItem> for OptionItem {
    fn from(item: DictItem) -> Self {
        OptionItem::new(item.value, item.label).disabled(item.disabled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamItem {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceItem {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub storage_type: StorageType,
    #[serde(default)]
    pub datasource_type: DatasourceType,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub remark: String,
}

impl From<&DatasourceItem> for OptionItem {
    fn from(item: &DatasourceItem) -> Self {
        OptionItem::new(item.id, item.name.clone()).disabled(item.status != Status::Enable)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyGroupItem {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub categories: Vec<DictItem>,
}

impl From<&StrategyGroupItem> for OptionItem {
    fn from(item: &StrategyGroupItem) -> Self {
        OptionItem::new(item.id, item.name.clone()).disabled(item.status != Status::Enable)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyItem {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub expr: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub categories: Vec<DictItem>,
    #[serde(default)]
    pub group: Option<StrategyGroupItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmNoticeGroupItem {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: Status,
}

impl From<&AlarmNoticeGroupItem> for OptionItem {
    fn from(item: &AlarmNoticeGroupItem) -> Self {
        OptionItem::new(item.id, item.name.clone()).disabled(item.status != Status::Enable)
    }
}
