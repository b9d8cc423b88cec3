//! The terminal console: input routing, screens and the event loop.

mod editor;
pub(crate) mod input;
pub(crate) mod keymap;
mod options;
mod popup;
mod runtime;
mod screens;
mod status;
mod tasks;
mod terminal;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
    api::ApiClient,
    config::AppConfig,
    i18n::LocaleHandle,
    lookup::SystemClock,
    session::{Session, SessionStore},
};

pub use options::UiOptions;

/// Runs the console against the backend `config` points at until the user
/// quits.
pub fn run(config: AppConfig) -> Result<()> {
    let locale = LocaleHandle::new(config.locale);
    let store = SessionStore::new(config.state_dir());
    let session = match Session::restore(store.clone()) {
        Ok(session) => session,
        Err(err) => {
            warn!(error = %err, "ignoring unreadable session state");
            Session::new(store)
        }
    };
    let base_url = config.base_url();
    info!(origin = %config.origin, %base_url, "resolved backend");
    let client = ApiClient::new(
        base_url,
        session.clone(),
        locale.clone(),
        config.request_timeout(),
    )
    .context("failed to build the HTTP client")?;
    let mut console = runtime::Console::new(
        UiOptions::from_config(&config),
        Arc::new(client),
        session,
        locale,
        Arc::new(SystemClock),
    )?;
    console.run()
}
