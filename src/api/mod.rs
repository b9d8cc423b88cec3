//! REST plumbing: the backend seam, its reqwest implementation and the typed
//! endpoint wrappers the screens call.

mod backend;
mod client;
mod endpoints;
mod error;
mod host;

pub use backend::{ApiRequest, Backend};
pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub use endpoints::{
    CaptchaReply, CaptchaRequest, DictListRequest, ListQuery, LoginReply, SubmitKind,
    captcha, create_path, datasource_detail, dict_options, list_datasources, list_strategies,
    list_strategy_groups, list_teams, login, notice_group_options, source_options, strategy_detail,
    strategy_group_detail, submit_record, update_path,
};
pub use error::{ApiError, ErrorDisposition, ErrorResponse};
pub use host::HostMap;
