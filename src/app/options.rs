use std::time::Duration;

use crate::{config::AppConfig, dialog::DebounceWindows};

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub confirm_exit: bool,
    pub show_help: bool,
    pub search_debounce: Duration,
    pub captcha_debounce: Duration,
    pub dialog_windows: DebounceWindows,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            confirm_exit: true,
            show_help: true,
            search_debounce: Duration::from_millis(200),
            captcha_debounce: Duration::from_millis(200),
            dialog_windows: DebounceWindows::default(),
        }
    }
}

impl UiOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self::default()
            .with_tick_rate(config.tick_rate())
            .with_help(config.ui.show_help)
            .with_confirm_exit(config.ui.confirm_exit)
            .with_search_debounce(config.debounce.search())
            .with_dialog_windows(DebounceWindows {
                options: config.debounce.lookup(),
                detail: config.debounce.detail(),
            })
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_search_debounce(mut self, window: Duration) -> Self {
        self.search_debounce = window;
        self
    }

    pub fn with_captcha_debounce(mut self, window: Duration) -> Self {
        self.captcha_debounce = window;
        self
    }

    pub fn with_dialog_windows(mut self, windows: DebounceWindows) -> Self {
        self.dialog_windows = windows;
        self
    }
}
