#![deny(rust_2018_idioms)]

pub mod api;
pub mod config;
pub mod dialog;
pub mod domain;
pub mod form;
pub mod i18n;
pub mod logging;
pub mod lookup;
pub mod records;
pub mod routes;
pub mod session;
pub mod table;

#[cfg(feature = "tui")]
mod app;
#[cfg(feature = "tui")]
pub mod presentation;

#[cfg(feature = "tui")]
pub use app::{UiOptions, run};

pub mod prelude {
    pub use super::{
        api::{ApiClient, ApiError, Backend},
        config::{AppConfig, ConfigOverrides},
        i18n::{Locale, LocaleHandle},
        session::{Session, SessionStore},
    };
    #[cfg(feature = "tui")]
    pub use super::{UiOptions, run};
}
