use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::{
    api::{ApiError, Backend},
    dialog::{DialogSpec, Dispatched, ErrorDispatcher, FeedbackQueue, Notifier, Toast},
    domain::{DatasourceItem, StrategyGroupItem, StrategyItem, TeamItem},
    form::FormRecord,
    i18n::{LocaleHandle, Msg},
    lookup::Clock,
    presentation,
    records::RolePermissionForm,
    routes::{Navigator, Route, menu_routes},
    session::Session,
};

use super::{
    editor::DialogEditor,
    input::{self, KeyAction, KeyCommand, KeyContext},
    options::UiOptions,
    screens::{LoginScreen, ScreenDeps, Screens},
    status::StatusLine,
    tasks::Tasks,
    terminal::TerminalGuard,
};

mod frame;
mod lists;
mod login;

const PERMISSIONS_DIALOG: DialogSpec = DialogSpec {
    resource: "local:role-permissions",
    create_title: Msg::EditPermissions,
    edit_title: Msg::EditPermissions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    Teams,
    Datasources,
    Groups,
    Strategies,
}

/// Runs `$method::<Row>` for the row type behind a [`ListKind`].
macro_rules! with_list {
    ($kind:expr, $console:expr, $method:ident ( $($arg:expr),* )) => {
        match $kind {
            ListKind::Teams => $console.$method::<TeamItem>($($arg),*),
            ListKind::Datasources => $console.$method::<DatasourceItem>($($arg),*),
            ListKind::Groups => $console.$method::<StrategyGroupItem>($($arg),*),
            ListKind::Strategies => $console.$method::<StrategyItem>($($arg),*),
        }
    };
}

/// What receives the next key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Modal,
    Permissions { popup: bool },
    Dialog { kind: ListKind, popup: bool },
    Login,
    List(Option<ListKind>),
}

impl Focus {
    fn context(self) -> KeyContext {
        match self {
            Focus::Modal => KeyContext::Modal,
            Focus::Permissions { popup: true } | Focus::Dialog { popup: true, .. } => {
                KeyContext::Popup
            }
            Focus::Permissions { .. } | Focus::Dialog { .. } => KeyContext::Dialog,
            Focus::Login => KeyContext::Login,
            Focus::List(_) => KeyContext::List,
        }
    }
}

/// How a dialog reacted to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogKey {
    Handled,
    Submit,
    Ignored,
}

fn drive_dialog<R: FormRecord>(editor: &mut DialogEditor<R>, command: KeyCommand) -> DialogKey {
    if editor.has_popup() {
        match command {
            KeyCommand::Action(KeyAction::Select(delta)) => editor.popup_select(delta),
            KeyCommand::Action(KeyAction::Toggle) => editor.popup_toggle(),
            KeyCommand::Action(KeyAction::Activate) => editor.popup_apply(),
            KeyCommand::Action(KeyAction::Cancel) => editor.popup_cancel(),
            _ => return DialogKey::Ignored,
        }
        return DialogKey::Handled;
    }
    match command {
        KeyCommand::Edit(edit) => {
            editor.edit_text(edit);
        }
        KeyCommand::Action(KeyAction::Submit) => return DialogKey::Submit,
        KeyCommand::Action(KeyAction::Cancel) => editor.close(),
        KeyCommand::Action(KeyAction::FieldStep(delta)) => editor.step(delta),
        KeyCommand::Action(KeyAction::MoveEntry(delta)) => {
            editor.move_entry(delta);
        }
        KeyCommand::Action(KeyAction::RemoveEntry) => {
            editor.remove_entry();
        }
        KeyCommand::Action(KeyAction::Activate) => editor.activate(),
        _ => return DialogKey::Ignored,
    }
    DialogKey::Handled
}

fn dialog_popup<R: FormRecord>(editor: &DialogEditor<R>) -> Option<bool> {
    editor.is_open().then(|| editor.has_popup())
}

/// The console: screens, dialogs and feedback behind one event loop.
pub(crate) struct Console {
    options: UiOptions,
    locale: LocaleHandle,
    session: Session,
    tasks: Tasks,
    navigator: Navigator,
    feedback: FeedbackQueue,
    dispatcher: ErrorDispatcher,
    status: StatusLine,
    screens: Screens,
    login: LoginScreen,
    permissions: DialogEditor<RolePermissionForm>,
    show_teams: bool,
    exit_armed: bool,
    should_quit: bool,
}

impl Console {
    pub(crate) fn new(
        options: UiOptions,
        backend: Arc<dyn Backend>,
        session: Session,
        locale: LocaleHandle,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let deps = ScreenDeps {
            locale: locale.clone(),
            clock: clock.clone(),
            search: options.search_debounce,
            windows: options.dialog_windows,
        };
        let screens = Screens::new(&deps)?;
        let login = LoginScreen::new(&deps, options.captcha_debounce)?;
        let permissions = deps.dialog(PERMISSIONS_DIALOG)?;
        let mut navigator = Navigator::new(clock.clone());
        navigator.guard(session.is_logged_in());
        Ok(Self {
            dispatcher: ErrorDispatcher::new(locale.clone(), session.clone()),
            feedback: FeedbackQueue::new(clock),
            tasks: Tasks::new(backend)?,
            options,
            locale,
            session,
            navigator,
            status: StatusLine::new(),
            screens,
            login,
            permissions,
            show_teams: false,
            exit_armed: false,
            should_quit: false,
        })
    }

    pub(crate) fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalGuard::new()?;
        info!(route = %self.navigator.route(), "console started");
        while !self.should_quit {
            self.tick();
            let view = self.frame_view();
            terminal.draw(|frame| presentation::draw(frame, &view))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Paste(text) => self.handle_paste(&text),
                Event::Resize(width, height) => {
                    terminal.resize(Rect::new(0, 0, width, height))?;
                }
                Event::Mouse(_) | Event::FocusGained | Event::FocusLost => {}
            }
        }
        info!("console stopped");
        Ok(())
    }

    /// One loop step without input: apply finished calls, expire feedback,
    /// follow redirects and start whatever fetch is due.
    pub(crate) fn tick(&mut self) {
        for completion in self.tasks.drain() {
            completion(self);
        }
        self.feedback.tick();
        if self.navigator.tick() {
            self.route_changed();
        }
        if *self.navigator.route() == Route::Login {
            self.poll_captcha();
        }
        if !self.session.is_logged_in() {
            return;
        }
        if let Some(kind) = self.active_list() {
            with_list!(kind, self, poll_list());
        }
        self.poll_dialog::<TeamItem>();
        self.poll_dialog::<DatasourceItem>();
        self.poll_dialog::<StrategyGroupItem>();
        self.poll_dialog::<StrategyItem>();
        self.screens.teams.take_refresh();
        self.screens.datasources.take_refresh();
        self.screens.groups.take_refresh();
        self.screens.strategies.take_refresh();
    }

    fn active_list(&self) -> Option<ListKind> {
        if self.show_teams {
            return Some(ListKind::Teams);
        }
        match self.navigator.route() {
            Route::DatasourceMetric => Some(ListKind::Datasources),
            Route::StrategyGroup => Some(ListKind::Groups),
            Route::StrategyList => Some(ListKind::Strategies),
            _ => None,
        }
    }

    fn list_popup(&self, kind: ListKind) -> Option<bool> {
        match kind {
            ListKind::Teams => dialog_popup(&self.screens.teams.editor),
            ListKind::Datasources => dialog_popup(&self.screens.datasources.editor),
            ListKind::Groups => dialog_popup(&self.screens.groups.editor),
            ListKind::Strategies => dialog_popup(&self.screens.strategies.editor),
        }
    }

    fn focus(&self) -> Focus {
        if self.feedback.is_blocked() {
            return Focus::Modal;
        }
        if let Some(popup) = dialog_popup(&self.permissions) {
            return Focus::Permissions { popup };
        }
        let active = self.active_list();
        if let Some(kind) = active
            && let Some(popup) = self.list_popup(kind)
        {
            return Focus::Dialog { kind, popup };
        }
        if *self.navigator.route() == Route::Login {
            return Focus::Login;
        }
        Focus::List(active.filter(|_| self.session.is_logged_in()))
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let focus = self.focus();
        let command = input::classify(&key, focus.context());
        if command != KeyCommand::Action(KeyAction::Quit) && self.exit_armed {
            self.exit_armed = false;
            self.status.ready();
        }
        match command {
            KeyCommand::Action(KeyAction::Quit) => self.request_exit(),
            KeyCommand::Action(KeyAction::ToggleLocale) => {
                let next = self.locale.get().toggled();
                self.locale.set(next);
                info!(locale = %next, "locale switched");
            }
            KeyCommand::Action(KeyAction::SignOut) => {
                if self.session.is_logged_in() {
                    self.session.sign_out();
                    self.signed_out();
                }
            }
            _ => match focus {
                Focus::Modal => {
                    if matches!(
                        command,
                        KeyCommand::Action(KeyAction::Activate | KeyAction::Cancel)
                    ) {
                        self.feedback.dismiss_modal();
                    }
                }
                Focus::Permissions { .. } => {
                    if drive_dialog(&mut self.permissions, command) == DialogKey::Submit {
                        self.save_permissions();
                    }
                }
                Focus::Dialog { kind, .. } => with_list!(kind, self, dialog_key(command)),
                Focus::Login => self.login_key(command),
                Focus::List(kind) => self.list_key(kind, command),
            },
        }
    }

    pub(crate) fn handle_paste(&mut self, text: &str) {
        match self.focus() {
            Focus::Permissions { popup: false } => self.permissions.paste(text),
            Focus::Dialog { kind, popup: false } => with_list!(kind, self, paste_into_dialog(text)),
            Focus::Login => self.login.paste(text),
            Focus::List(Some(kind)) => with_list!(kind, self, paste_into_search(text)),
            _ => {}
        }
    }

    fn request_exit(&mut self) {
        let dirty = self.screens.any_dirty() || self.permissions.is_dirty();
        if self.options.confirm_exit && dirty && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }

    fn step_screen(&mut self, delta: i32) {
        let routes = menu_routes();
        if routes.is_empty() {
            return;
        }
        let current = routes
            .iter()
            .position(|(_, route)| route == self.navigator.route());
        let next = match current {
            Some(index) => (index as i64 + delta as i64).rem_euclid(routes.len() as i64) as usize,
            None => 0,
        };
        self.show_teams = false;
        let (_, route) = routes[next].clone();
        self.navigator.go_to(route, self.session.is_logged_in());
    }

    fn route_changed(&mut self) {
        if *self.navigator.route() != Route::Login {
            return;
        }
        self.screens.close_dialogs();
        self.permissions.close();
        self.show_teams = false;
        self.login.enter(self.remembered_account());
    }

    fn remembered_account(&self) -> Option<crate::session::RememberedAccount> {
        self.session
            .store()
            .account(Utc::now())
            .inspect_err(|err| warn!(error = %err, "failed to read remembered account"))
            .ok()
            .flatten()
    }

    /// Shows `err` following the code table.
    fn report(&mut self, err: &ApiError) {
        if self.dispatcher.dispatch(err, &mut self.feedback) == Dispatched::SignedOut {
            self.signed_out();
        }
    }

    fn signed_out(&mut self) {
        self.screens.close_dialogs();
        self.permissions.close();
        self.show_teams = false;
        self.navigator.guard(false);
        self.status.set(Msg::RedirectingToLogin);
    }

    fn save_permissions(&mut self) {
        match self.permissions.begin_submit() {
            Ok(request) => {
                let record = self.permissions.session().form().record();
                info!(role = %record.role, permissions = record.permissions.len(), "permissions saved");
                self.permissions.session_mut().finish_submit(
                    &request,
                    Ok(serde_json::Value::Null),
                    &self.dispatcher,
                    &mut self.feedback,
                );
                self.status.ready();
            }
            Err(issues) => self.status.issues_remaining(issues),
        }
    }

    fn switch_team(&mut self) {
        let Some(team) = self.screens.teams.page.selected().cloned() else {
            return;
        };
        let name = team.name.clone();
        match self.session.switch_team(team) {
            Ok(()) => {
                let title = self.locale.text(Msg::TeamSwitched);
                self.feedback.toast(Toast::success(format!("{title}: {name}")));
                self.screens.datasources.page.refresh();
                self.screens.groups.page.refresh();
                self.screens.strategies.page.refresh();
            }
            Err(err) => {
                warn!(error = %err, "team switch failed");
                self.status.set_raw(err.to_string());
            }
        }
    }

    fn list_key(&mut self, kind: Option<ListKind>, command: KeyCommand) {
        match command {
            KeyCommand::Action(KeyAction::ScreenStep(delta)) => self.step_screen(delta),
            KeyCommand::Action(KeyAction::Teams) if self.session.is_logged_in() => {
                self.show_teams = !self.show_teams;
            }
            KeyCommand::Action(KeyAction::Permissions) if self.session.is_logged_in() => {
                self.permissions.open_create();
            }
            KeyCommand::Action(KeyAction::SwitchTeam) if kind == Some(ListKind::Teams) => {
                self.switch_team();
            }
            KeyCommand::Action(KeyAction::Cancel)
                if kind == Some(ListKind::Teams) && self.screens.teams.page.keyword().is_empty() =>
            {
                self.show_teams = false;
            }
            _ => {
                if let Some(kind) = kind {
                    with_list!(kind, self, list_command(command));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
