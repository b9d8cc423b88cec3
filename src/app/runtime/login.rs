use chrono::Utc;
use tracing::{info, warn};

use crate::{
    api::{ApiError, CaptchaRequest, LoginReply, captcha, login},
    dialog::{Notifier, Toast},
    i18n::Msg,
    routes::Route,
};

use super::{
    super::{
        input::{KeyAction, KeyCommand},
        screens::LoginAttempt,
    },
    Console,
};

/// Credentials to keep when "remember me" was ticked.
type Remember = Option<(String, String)>;

impl Console {
    pub(super) fn poll_captcha(&mut self) {
        let Some(id) = self.login.poll_captcha() else {
            return;
        };
        self.tasks.spawn(
            |backend| async move { captcha(backend.as_ref(), &CaptchaRequest::default()).await },
            move |console, result| {
                if let Err(err) = console.login.apply_captcha(id, result) {
                    console.report(&err);
                }
            },
        );
    }

    pub(super) fn login_key(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::Action(KeyAction::FieldStep(delta)) => self.login.step(delta),
            KeyCommand::Action(KeyAction::Activate) => self.login.activate(),
            KeyCommand::Action(KeyAction::Submit) => self.submit_login(),
            KeyCommand::Action(KeyAction::Refresh) => self.login.refresh_captcha(),
            KeyCommand::Edit(edit) => {
                self.login.edit_text(edit);
            }
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        match self.login.begin() {
            LoginAttempt::Ready(request) => {
                let record = self.login.record();
                let remember = record
                    .remember
                    .then(|| (record.username.clone(), record.password.clone()));
                self.status.set(Msg::Submitting);
                self.tasks.spawn(
                    move |backend| async move { login(backend.as_ref(), &request).await },
                    move |console, result| console.finish_login(result, remember),
                );
            }
            LoginAttempt::Invalid(issues) => self.status.issues_remaining(issues),
            LoginAttempt::NoCaptcha => {
                self.status.set(Msg::ErrCaptchaMissing);
                self.login.refresh_captcha();
            }
            LoginAttempt::Busy => {}
        }
    }

    fn finish_login(&mut self, result: Result<LoginReply, ApiError>, remember: Remember) {
        match result {
            Ok(reply) => {
                self.login.accepted();
                self.session.sign_in(reply.token);
                let store = self.session.store();
                let kept = match &remember {
                    Some((username, password)) => {
                        store.remember(username, password, Utc::now()).map(|_| ())
                    }
                    None => store.forget(),
                };
                if let Err(err) = kept {
                    warn!(error = %err, "failed to update the remembered account");
                }
                info!(remember = remember.is_some(), "login accepted");
                self.status.ready();
                self.navigator.go_to(Route::AFTER_LOGIN, true);
                self.screens.teams.page.refresh();
                self.screens.datasources.page.refresh();
                self.screens.groups.page.refresh();
                self.screens.strategies.page.refresh();
            }
            Err(ApiError::Application(body)) if body.has_field_errors() => {
                let unmatched = self.login.reject(Some(&body.metadata));
                if !unmatched.is_empty() {
                    self.feedback
                        .toast(Toast::error(body.reason.clone(), unmatched.join("; ")));
                }
                self.status.ready();
            }
            Err(err) => {
                self.login.reject(None);
                self.status.ready();
                self.report(&err);
            }
        }
    }
}
