use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use indexmap::IndexMap;
use serde_json::{Value, json};
use tempfile::TempDir;

use super::*;
use crate::{
    api::{ApiRequest, ErrorResponse},
    i18n::Locale,
    lookup::ManualClock,
    presentation::BodyView,
    session::SessionStore,
};

/// Answers by path; unknown paths get an empty list page.
#[derive(Default)]
struct FakeBackend {
    replies: Mutex<IndexMap<String, Result<Value, ApiError>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl FakeBackend {
    fn reply(&self, path: &str, reply: Result<Value, ApiError>) {
        self.replies.lock().unwrap().insert(path.to_string(), reply);
    }

    fn sent(&self, path: &str) -> Vec<ApiRequest> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.path == path)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let reply = self.replies.lock().unwrap().get(&request.path).cloned();
        self.sent.lock().unwrap().push(request);
        reply.unwrap_or_else(|| Ok(json!({"list": [], "pagination": {"total": 0}})))
    }
}

struct Harness {
    console: Console,
    clock: ManualClock,
    backend: Arc<FakeBackend>,
    _dir: TempDir,
}

impl Harness {
    fn new(signed_in: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(SessionStore::new(dir.path()));
        if signed_in {
            session.sign_in("token");
        }
        let clock = ManualClock::new();
        let backend = Arc::new(FakeBackend::default());
        let console = Console::new(
            UiOptions::default(),
            backend.clone(),
            session,
            LocaleHandle::new(Locale::EnUs),
            Arc::new(clock.clone()),
        )
        .unwrap();
        Self {
            console,
            clock,
            backend,
            _dir: dir,
        }
    }

    fn press(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        self.console.handle_key(KeyEvent::new(code, modifiers));
    }

    fn ctrl(&mut self, ch: char) {
        self.press(KeyCode::Char(ch), KeyModifiers::CONTROL);
    }

    fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            let modifiers = if ch.is_uppercase() {
                KeyModifiers::SHIFT
            } else {
                KeyModifiers::NONE
            };
            self.press(KeyCode::Char(ch), modifiers);
        }
    }

    /// Waits for one backend call to finish and applies it.
    fn settle(&mut self) {
        let completion = self.console.tasks.wait().expect("no call finished");
        completion(&mut self.console);
    }

    fn advance(&mut self, by: Duration) {
        self.clock.advance(by);
        self.console.tick();
    }
}

fn app_error(code: i32, reason: &str) -> ApiError {
    ApiError::Application(ErrorResponse {
        code,
        message: format!("{reason} message"),
        metadata: IndexMap::new(),
        reason: reason.to_string(),
    })
}

#[test]
fn created_team_is_announced_and_the_list_refetched() {
    let mut h = Harness::new(true);
    h.backend.reply("/v1/team/create", Ok(json!({})));
    h.ctrl('t');
    h.ctrl('n');
    assert!(h.console.screens.teams.editor.is_open());
    h.type_text("Ops");
    h.ctrl('s');
    h.settle();

    let created = h.backend.sent("/v1/team/create");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].body.as_ref().unwrap()["name"], "Ops");
    assert!(!h.console.screens.teams.editor.is_open());
    assert!(h.console.feedback.toasts().any(|toast| toast.title == "Ops created"));

    h.console.tick();
    h.advance(Duration::from_millis(200));
    h.settle();
    assert!(!h.backend.sent("/v1/team/list").is_empty());
}

#[test]
fn rejected_token_signs_out_and_redirects() {
    let mut h = Harness::new(true);
    h.backend
        .reply("/v1/datasource/list", Err(app_error(401, "UNAUTHORIZED")));
    h.console.navigator.go_to(Route::DatasourceMetric, true);
    h.advance(Duration::from_millis(200));
    h.settle();

    assert!(!h.console.session.is_logged_in());
    assert_eq!(*h.console.navigator.route(), Route::DatasourceMetric);
    let BodyView::Message { text, .. } = h.console.frame_view().body else {
        panic!("expected the redirect notice");
    };
    assert_eq!(text, Locale::EnUs.text(Msg::RedirectingToLogin));

    h.advance(Duration::from_secs(1));
    assert_eq!(*h.console.navigator.route(), Route::Login);
    assert_eq!(h.console.focus(), Focus::Login);
}

#[test]
fn unsaved_dialog_needs_a_second_quit() {
    let mut h = Harness::new(true);
    h.ctrl('t');
    h.ctrl('n');
    h.type_text("x");
    h.ctrl('q');
    assert!(!h.console.should_quit);
    assert_eq!(
        h.console.frame_view().status,
        Locale::EnUs.text(Msg::PendingExit)
    );
    h.ctrl('q');
    assert!(h.console.should_quit);

    let mut clean = Harness::new(true);
    clean.ctrl('q');
    assert!(clean.console.should_quit);
}

#[test]
fn locale_toggle_rerenders_the_header() {
    let mut h = Harness::new(true);
    h.ctrl('l');
    assert_eq!(h.console.locale.get(), Locale::ZhCn);
    let header = h.console.frame_view().header;
    assert_eq!(header.locale, "zh-CN");
    assert_eq!(header.app, Locale::ZhCn.text(Msg::App));
}

#[test]
fn login_lands_on_the_alarm_screen() {
    let mut h = Harness::new(false);
    h.backend.reply(
        "/v1/auth/captcha",
        Ok(json!({"id": "c-1", "captcha": "ab12", "captchaType": 1})),
    );
    h.backend.reply("/v1/auth/login", Ok(json!({"token": "t-1"})));

    h.advance(Duration::from_secs(1));
    assert_eq!(*h.console.navigator.route(), Route::Login);
    h.advance(Duration::from_millis(200));
    h.settle();
    let BodyView::Login(view) = h.console.frame_view().body else {
        panic!("expected the login form");
    };
    assert!(view.captcha.contains("ab12"));

    h.type_text("admin");
    h.press(KeyCode::Tab, KeyModifiers::NONE);
    h.type_text("secret");
    h.press(KeyCode::Tab, KeyModifiers::NONE);
    h.type_text("ab12");
    h.ctrl('s');
    h.settle();

    let sent = h.backend.sent("/v1/auth/login");
    assert_eq!(sent.len(), 1);
    let body = sent[0].body.as_ref().unwrap();
    assert_eq!(body["username"], "admin");
    assert_ne!(body["password"], "secret");
    assert_eq!(body["captcha"]["id"], "c-1");
    assert_eq!(h.console.session.token().as_deref(), Some("t-1"));
    assert_eq!(*h.console.navigator.route(), Route::AFTER_LOGIN);
}

#[test]
fn wrong_captcha_is_shown_on_the_field() {
    let mut h = Harness::new(false);
    h.backend
        .reply("/v1/auth/captcha", Ok(json!({"id": "c-1", "captcha": "ab12"})));
    let mut metadata = IndexMap::new();
    metadata.insert("code".to_string(), "captcha mismatch".to_string());
    h.backend.reply(
        "/v1/auth/login",
        Err(ApiError::Application(ErrorResponse {
            code: 400,
            message: "bad captcha".into(),
            metadata,
            reason: "CAPTCHA_ERR".into(),
        })),
    );

    h.advance(Duration::from_secs(1));
    h.advance(Duration::from_millis(200));
    h.settle();
    h.type_text("admin");
    h.press(KeyCode::Tab, KeyModifiers::NONE);
    h.type_text("secret");
    h.press(KeyCode::Tab, KeyModifiers::NONE);
    h.type_text("zz");
    h.ctrl('s');
    h.settle();

    assert!(!h.console.session.is_logged_in());
    assert!(!h.console.feedback.is_blocked());
    let BodyView::Login(view) = h.console.frame_view().body else {
        panic!("expected the login form");
    };
    assert_eq!(view.form.rows[2].error.as_deref(), Some("captcha mismatch"));
    assert_eq!(view.captcha, Locale::EnUs.text(Msg::CaptchaPending));
}

#[test]
fn strategy_that_fails_to_load_closes_its_dialog() {
    let mut h = Harness::new(true);
    h.backend.reply(
        "/v1/strategy/list",
        Ok(json!({"list": [{"id": 5, "name": "cpu"}], "pagination": {"total": 1}})),
    );
    h.backend
        .reply("/v1/strategy/5", Err(ApiError::Network("reset".into())));
    h.console.navigator.go_to(Route::StrategyList, true);
    h.advance(Duration::from_millis(200));
    h.settle();

    h.press(KeyCode::Enter, KeyModifiers::NONE);
    assert!(h.console.screens.strategies.editor.is_open());
    h.advance(Duration::from_millis(500));
    for _ in 0..16 {
        if !h.console.screens.strategies.editor.is_open() {
            break;
        }
        h.settle();
    }

    assert_eq!(h.backend.sent("/v1/strategy/5").len(), 1);
    assert!(!h.console.screens.strategies.editor.is_open());
    assert_eq!(h.console.focus(), Focus::List(Some(ListKind::Strategies)));
    let network = Locale::EnUs.text(Msg::NetworkAnomaly);
    assert!(h.console.feedback.toasts().any(|toast| toast.description == network));

    h.ctrl('s');
    assert!(h.backend.sent("/v1/strategy/create").is_empty());
}
