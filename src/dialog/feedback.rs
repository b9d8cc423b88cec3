use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, info};

use crate::{
    api::{ApiError, ErrorDisposition},
    i18n::{LocaleHandle, Msg},
    lookup::Clock,
    session::Session,
};

pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
    pub code: Option<i32>,
}

impl Toast {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            title: title.into(),
            description: String::new(),
            code: None,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            title: title.into(),
            description: description.into(),
            code: None,
        }
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            title: title.into(),
            description: String::new(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    /// Dismissed with a single acknowledgement.
    Notice,
    /// Stays on top until confirmed or cancelled.
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub kind: ModalKind,
    pub title: String,
    pub message: String,
}

/// Sink for user-facing feedback.
pub trait Notifier {
    fn toast(&mut self, toast: Toast);
    fn modal(&mut self, modal: Modal);
}

/// Feedback shown by the terminal UI: a stack of expiring toasts and at most
/// one blocking modal.
#[derive(Debug)]
pub struct FeedbackQueue {
    clock: Arc<dyn Clock>,
    ttl: Duration,
    toasts: VecDeque<(Instant, Toast)>,
    modal: Option<Modal>,
}

impl FeedbackQueue {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            ttl: TOAST_TTL,
            toasts: VecDeque::new(),
            modal: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn tick(&mut self) {
        let now = self.clock.now();
        let ttl = self.ttl;
        self.toasts
            .retain(|(shown, _)| now.saturating_duration_since(*shown) < ttl);
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().map(|(_, toast)| toast)
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn dismiss_modal(&mut self) -> Option<Modal> {
        self.modal.take()
    }

    pub fn is_blocked(&self) -> bool {
        self.modal.is_some()
    }
}

impl Notifier for FeedbackQueue {
    fn toast(&mut self, toast: Toast) {
        debug!(title = %toast.title, "toast");
        self.toasts.push_back((self.clock.now(), toast));
        while self.toasts.len() > 5 {
            self.toasts.pop_front();
        }
    }

    fn modal(&mut self, modal: Modal) {
        debug!(title = %modal.title, "modal");
        self.modal = Some(modal);
    }
}

/// What a dispatched error did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Shown,
    Silent,
    /// The token was dropped; the caller should route to login.
    SignedOut,
}

/// Turns API failures into feedback following the backend's code table.
#[derive(Debug, Clone)]
pub struct ErrorDispatcher {
    locale: LocaleHandle,
    session: Session,
}

impl ErrorDispatcher {
    pub fn new(locale: LocaleHandle, session: Session) -> Self {
        Self { locale, session }
    }

    pub fn dispatch(&self, err: &ApiError, notifier: &mut dyn Notifier) -> Dispatched {
        let body = match err {
            ApiError::Application(body) => body,
            ApiError::Network(_) | ApiError::Decode(_) => {
                notifier.toast(Toast::error(
                    self.locale.text(Msg::NetError),
                    self.locale.text(Msg::NetworkAnomaly),
                ));
                return Dispatched::Shown;
            }
        };
        match body.disposition() {
            ErrorDisposition::BlockingNotice => {
                notifier.modal(Modal {
                    kind: ModalKind::Notice,
                    title: self.locale.text(Msg::ValidationFailedTitle).to_string(),
                    message: body.message.clone(),
                });
                Dispatched::Shown
            }
            ErrorDisposition::SignOut => {
                notifier.toast(Toast::error(body.reason.clone(), body.message.clone()));
                self.session.sign_out();
                info!(reason = %body.reason, "session rejected by backend");
                Dispatched::SignedOut
            }
            ErrorDisposition::Silent => {
                debug!(code = body.code, "error suppressed");
                Dispatched::Silent
            }
            ErrorDisposition::Confirm => {
                notifier.modal(Modal {
                    kind: ModalKind::Confirm,
                    title: self.locale.text(Msg::ConfirmRequiredTitle).to_string(),
                    message: body.message.clone(),
                });
                Dispatched::Shown
            }
            ErrorDisposition::Toast => {
                notifier.toast(
                    Toast::error(body.reason.clone(), body.message.clone()).with_code(body.code),
                );
                Dispatched::Shown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::ErrorResponse,
        i18n::Locale,
        lookup::ManualClock,
        session::SessionStore,
    };

    #[derive(Default)]
    struct Recorder {
        toasts: Vec<Toast>,
        modals: Vec<Modal>,
    }

    impl Notifier for Recorder {
        fn toast(&mut self, toast: Toast) {
            self.toasts.push(toast);
        }

        fn modal(&mut self, modal: Modal) {
            self.modals.push(modal);
        }
    }

    fn dispatcher(locale: Locale) -> (Session, ErrorDispatcher) {
        let session = Session::new(SessionStore::new(std::env::temp_dir()));
        session.sign_in("token");
        let dispatcher = ErrorDispatcher::new(LocaleHandle::new(locale), session.clone());
        (session, dispatcher)
    }

    fn app_error(code: i32) -> ApiError {
        ApiError::Application(ErrorResponse {
            code,
            message: "boom".into(),
            reason: "REASON".into(),
            ..ErrorResponse::default()
        })
    }

    #[test]
    fn code_table_drives_the_feedback() {
        let (session, dispatcher) = dispatcher(Locale::EnUs);
        let mut out = Recorder::default();

        assert_eq!(dispatcher.dispatch(&app_error(403), &mut out), Dispatched::Silent);
        assert_eq!(dispatcher.dispatch(&app_error(429), &mut out), Dispatched::Silent);
        assert!(out.toasts.is_empty() && out.modals.is_empty());

        dispatcher.dispatch(&app_error(400), &mut out);
        dispatcher.dispatch(&app_error(405), &mut out);
        assert_eq!(out.modals[0].kind, ModalKind::Notice);
        assert_eq!(out.modals[1].kind, ModalKind::Confirm);

        dispatcher.dispatch(&app_error(500), &mut out);
        assert_eq!(out.toasts[0].code, Some(500));
        assert_eq!(out.toasts[0].title, "REASON");

        assert!(session.is_logged_in());
        assert_eq!(dispatcher.dispatch(&app_error(401), &mut out), Dispatched::SignedOut);
        assert!(!session.is_logged_in());
    }

    #[test]
    fn network_failures_use_the_active_locale() {
        let (_, dispatcher) = dispatcher(Locale::ZhCn);
        let mut out = Recorder::default();
        dispatcher.dispatch(&ApiError::Network("refused".into()), &mut out);
        assert_eq!(out.toasts[0].description, "网络异常");
    }

    #[test]
    fn toasts_expire() {
        let clock = ManualClock::new();
        let mut queue = FeedbackQueue::new(Arc::new(clock.clone()));
        queue.toast(Toast::success("saved"));
        clock.advance(TOAST_TTL / 2);
        queue.tick();
        assert_eq!(queue.toasts().count(), 1);
        clock.advance(TOAST_TTL);
        queue.tick();
        assert_eq!(queue.toasts().count(), 0);
    }
}
