mod enums;
mod model;

pub use enums::{Condition, DatasourceType, DictType, Status, StorageType, SustainType};
pub use model::{
    AlarmNoticeGroupItem, DatasourceItem, DetailReply, DictItem, ListReply, OptionItem,
    PaginationReply, PaginationReq, StrategyGroupItem, StrategyItem, TeamItem,
};
