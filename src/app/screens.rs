use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::debug;

use crate::{
    api::{
        ApiError, Backend, CaptchaReply, ListQuery, datasource_detail, list_datasources,
        list_strategies, list_strategy_groups, list_teams, strategy_detail, strategy_group_detail,
    },
    dialog::{DebounceWindows, DialogSession, DialogSpec, RefreshSignal},
    domain::{DatasourceItem, ListReply, StrategyGroupItem, StrategyItem, TeamItem},
    form::{FormController, FormRecord, FormValidator, ValidatorBuildError},
    i18n::{Locale, LocaleHandle, Msg},
    lookup::{Clock, Debouncer, RequestId},
    presentation::{FormView, LoginView, PagerView, TableView},
    records::{
        DatasourceForm, LoginForm, LoginRequest, StrategyForm, StrategyGroupForm, TeamForm,
    },
    session::RememberedAccount,
    table::{
        ListPage, ListRow, TableSpec, datasource_columns, strategy_columns, strategy_group_columns,
        team_columns,
    },
};

use super::{
    editor::{DialogEditor, FieldFocus},
    input::TextEdit,
};

/// A backend collection shown as a table with a create/edit dialog.
#[async_trait]
pub(crate) trait Resource: ListRow + Sync + Sized {
    type Record: FormRecord;

    const DIALOG: DialogSpec;
    const TITLE: Msg;

    fn columns() -> TableSpec<Self>;

    async fn list(backend: Arc<dyn Backend>, query: ListQuery) -> Result<ListReply<Self>, ApiError>;

    /// `None` when the collection has no detail endpoint and the list row
    /// carries the whole record.
    async fn detail(_backend: Arc<dyn Backend>, _id: u64) -> Option<Result<Self::Record, ApiError>> {
        None
    }

    /// Opens the edit dialog for this row.
    fn open(&self, editor: &mut DialogEditor<Self::Record>);

    fn screen(screens: &mut Screens) -> &mut ListScreen<Self>;
}

#[async_trait]
impl Resource for TeamItem {
    type Record = TeamForm;

    const DIALOG: DialogSpec = DialogSpec {
        resource: "/v1/team",
        create_title: Msg::CreateTeam,
        edit_title: Msg::EditTeam,
    };
    const TITLE: Msg = Msg::MenuTeam;

    fn columns() -> TableSpec<Self> {
        team_columns()
    }

    async fn list(backend: Arc<dyn Backend>, query: ListQuery) -> Result<ListReply<Self>, ApiError> {
        list_teams(backend.as_ref(), &query).await
    }

    fn open(&self, editor: &mut DialogEditor<TeamForm>) {
        editor.open_with(self.id, TeamForm::from(self.clone()));
    }

    fn screen(screens: &mut Screens) -> &mut ListScreen<Self> {
        &mut screens.teams
    }
}

#[async_trait]
impl Resource for DatasourceItem {
    type Record = DatasourceForm;

    const DIALOG: DialogSpec = DialogSpec {
        resource: "/v1/datasource",
        create_title: Msg::CreateDatasource,
        edit_title: Msg::EditDatasource,
    };
    const TITLE: Msg = Msg::MenuDatasourceMetric;

    fn columns() -> TableSpec<Self> {
        datasource_columns()
    }

    async fn list(backend: Arc<dyn Backend>, query: ListQuery) -> Result<ListReply<Self>, ApiError> {
        list_datasources(backend.as_ref(), &query).await
    }

    async fn detail(backend: Arc<dyn Backend>, id: u64) -> Option<Result<DatasourceForm, ApiError>> {
        Some(datasource_detail(backend.as_ref(), id).await)
    }

    fn open(&self, editor: &mut DialogEditor<DatasourceForm>) {
        editor.open_edit(self.id, Some(DatasourceForm::from(self.clone())));
    }

    fn screen(screens: &mut Screens) -> &mut ListScreen<Self> {
        &mut screens.datasources
    }
}

#[async_trait]
impl Resource for StrategyGroupItem {
    type Record = StrategyGroupForm;

    const DIALOG: DialogSpec = DialogSpec {
        resource: "/v1/strategy/group",
        create_title: Msg::CreateStrategyGroup,
        edit_title: Msg::EditStrategyGroup,
    };
    const TITLE: Msg = Msg::MenuStrategyGroup;

    fn columns() -> TableSpec<Self> {
        strategy_group_columns()
    }

    async fn list(backend: Arc<dyn Backend>, query: ListQuery) -> Result<ListReply<Self>, ApiError> {
        list_strategy_groups(backend.as_ref(), &query).await
    }

    async fn detail(backend: Arc<dyn Backend>, id: u64) -> Option<Result<StrategyGroupForm, ApiError>> {
        Some(strategy_group_detail(backend.as_ref(), id).await)
    }

    fn open(&self, editor: &mut DialogEditor<StrategyGroupForm>) {
        editor.open_edit(self.id, Some(StrategyGroupForm::from(self.clone())));
    }

    fn screen(screens: &mut Screens) -> &mut ListScreen<Self> {
        &mut screens.groups
    }
}

#[async_trait]
impl Resource for StrategyItem {
    type Record = StrategyForm;

    const DIALOG: DialogSpec = DialogSpec {
        resource: "/v1/strategy",
        create_title: Msg::CreateStrategy,
        edit_title: Msg::EditStrategy,
    };
    const TITLE: Msg = Msg::MenuStrategyList;

    fn columns() -> TableSpec<Self> {
        strategy_columns()
    }

    async fn list(backend: Arc<dyn Backend>, query: ListQuery) -> Result<ListReply<Self>, ApiError> {
        list_strategies(backend.as_ref(), &query).await
    }

    async fn detail(backend: Arc<dyn Backend>, id: u64) -> Option<Result<StrategyForm, ApiError>> {
        Some(strategy_detail(backend.as_ref(), id).await)
    }

    // the list row lacks the levels, so nothing is shown until the detail lands
    fn open(&self, editor: &mut DialogEditor<StrategyForm>) {
        editor.open_edit(self.id, None);
    }

    fn screen(screens: &mut Screens) -> &mut ListScreen<Self> {
        &mut screens.strategies
    }
}

/// Shared construction inputs for every screen.
#[derive(Debug, Clone)]
pub(crate) struct ScreenDeps {
    pub(crate) locale: LocaleHandle,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) search: Duration,
    pub(crate) windows: DebounceWindows,
}

impl ScreenDeps {
    pub(crate) fn dialog<R: FormRecord>(
        &self,
        spec: DialogSpec,
    ) -> Result<DialogEditor<R>, ValidatorBuildError> {
        let session = DialogSession::new(
            spec,
            Arc::new(FormValidator::new()?),
            self.locale.clone(),
            self.clock.clone(),
            self.windows,
            RefreshSignal::new(),
        );
        Ok(DialogEditor::new(session))
    }
}

pub(crate) struct ListScreen<T: Resource> {
    pub(crate) page: ListPage<T>,
    pub(crate) editor: DialogEditor<T::Record>,
    table: TableSpec<T>,
}

impl<T: Resource> ListScreen<T> {
    pub(crate) fn new(deps: &ScreenDeps) -> Result<Self, ValidatorBuildError> {
        Ok(Self {
            page: ListPage::new(deps.search, deps.clock.clone()),
            editor: deps.dialog(T::DIALOG)?,
            table: T::columns(),
        })
    }

    pub(crate) fn edit_text(&mut self, edit: TextEdit) {
        let mut keyword = self.page.keyword().to_string();
        if edit.apply(&mut keyword) {
            self.page.set_keyword(keyword);
        }
    }

    pub(crate) fn open_selected(&mut self) -> bool {
        let Some(row) = self.page.selected().cloned() else {
            return false;
        };
        debug!(id = row.row_id(), "opening row");
        row.open(&mut self.editor);
        true
    }

    /// Raised by a successful save of this screen's dialog.
    pub(crate) fn take_refresh(&mut self) -> bool {
        if self.editor.session().refresh_signal().take() {
            self.page.refresh();
            return true;
        }
        false
    }

    pub(crate) fn view(&self, locale: Locale) -> TableView {
        let rows = self.page.rows();
        let pagination = self.page.pagination();
        TableView {
            title: locale.text(T::TITLE).to_string(),
            search_label: locale.text(Msg::SearchPlaceholder).to_string(),
            keyword: self.page.keyword().to_string(),
            headers: self
                .table
                .headers(locale)
                .into_iter()
                .map(str::to_string)
                .collect(),
            widths: self.table.widths(rows, locale),
            rows: rows.iter().map(|row| self.table.cells(row, locale)).collect(),
            selected: self.page.selected_index(),
            loading: (self.page.is_loading() && rows.is_empty())
                .then(|| locale.text(Msg::Loading).to_string()),
            empty: locale.text(Msg::Empty).to_string(),
            pager: PagerView {
                buttons: pagination.buttons(),
                current: pagination.page,
                has_prev: pagination.has_prev(),
                has_next: pagination.has_next(),
                summary: format!(
                    "{} · {}",
                    pagination.total,
                    locale.page_size(pagination.page_size as usize)
                ),
            },
        }
    }
}

pub(crate) struct Screens {
    pub(crate) teams: ListScreen<TeamItem>,
    pub(crate) datasources: ListScreen<DatasourceItem>,
    pub(crate) groups: ListScreen<StrategyGroupItem>,
    pub(crate) strategies: ListScreen<StrategyItem>,
}

impl Screens {
    pub(crate) fn new(deps: &ScreenDeps) -> Result<Self, ValidatorBuildError> {
        Ok(Self {
            teams: ListScreen::new(deps)?,
            datasources: ListScreen::new(deps)?,
            groups: ListScreen::new(deps)?,
            strategies: ListScreen::new(deps)?,
        })
    }

    pub(crate) fn any_dirty(&self) -> bool {
        self.teams.editor.is_dirty()
            || self.datasources.editor.is_dirty()
            || self.groups.editor.is_dirty()
            || self.strategies.editor.is_dirty()
    }

    pub(crate) fn close_dialogs(&mut self) {
        self.teams.editor.close();
        self.datasources.editor.close();
        self.groups.editor.close();
        self.strategies.editor.close();
    }
}

/// Why a sign-in attempt did not start.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LoginAttempt {
    Ready(LoginRequest),
    Invalid(usize),
    NoCaptcha,
    Busy,
}

pub(crate) struct LoginScreen {
    form: FormController<LoginForm>,
    focus: FieldFocus,
    captcha: Option<CaptchaReply>,
    fetch: Debouncer,
    submitting: bool,
}

impl LoginScreen {
    pub(crate) fn new(deps: &ScreenDeps, window: Duration) -> Result<Self, ValidatorBuildError> {
        Ok(Self {
            form: FormController::new(Arc::new(FormValidator::new()?), deps.locale.clone()),
            focus: FieldFocus::default(),
            captcha: None,
            fetch: Debouncer::new(window, deps.clock.clone()),
            submitting: false,
        })
    }

    /// Fresh form, prefilled from a remembered account, and a new captcha.
    pub(crate) fn enter(&mut self, remembered: Option<RememberedAccount>) {
        self.form.reset();
        self.focus.reset();
        self.submitting = false;
        if let Some(account) = remembered {
            self.form.seed(LoginForm {
                username: account.username,
                password: account.password,
                captcha: String::new(),
                remember: true,
            });
        }
        self.refresh_captcha();
    }

    pub(crate) fn record(&self) -> &LoginForm {
        self.form.record()
    }

    pub(crate) fn refresh_captcha(&mut self) {
        self.fetch.trigger();
    }

    pub(crate) fn poll_captcha(&mut self) -> Option<RequestId> {
        self.fetch.poll()
    }

    pub(crate) fn apply_captcha(
        &mut self,
        id: RequestId,
        result: Result<CaptchaReply, ApiError>,
    ) -> Result<bool, ApiError> {
        if !self.fetch.is_current(id) {
            debug!(%id, "discarding stale captcha");
            return Ok(false);
        }
        let reply = result?;
        debug!(captcha = %reply.id, "captcha received");
        self.captcha = Some(reply);
        Ok(true)
    }

    pub(crate) fn step(&mut self, delta: i32) {
        self.focus.step(&mut self.form, delta);
    }

    pub(crate) fn edit_text(&mut self, edit: TextEdit) -> bool {
        self.focus.edit(&mut self.form, edit)
    }

    pub(crate) fn paste(&mut self, text: &str) {
        self.focus.paste(&mut self.form, text);
    }

    pub(crate) fn activate(&mut self) {
        if !self.focus.toggle_flag(&mut self.form) {
            self.step(1);
        }
    }

    pub(crate) fn begin(&mut self) -> LoginAttempt {
        if self.submitting {
            return LoginAttempt::Busy;
        }
        self.focus.commit(&mut self.form);
        if let Err(issues) = self.form.validate() {
            return LoginAttempt::Invalid(issues);
        }
        let Some(captcha) = &self.captcha else {
            return LoginAttempt::NoCaptcha;
        };
        self.submitting = true;
        LoginAttempt::Ready(self.form.record().to_request(&captcha.id))
    }

    /// A rejected attempt: field errors go inline, the captcha is spent.
    /// Returns the metadata entries that matched no field.
    pub(crate) fn reject(&mut self, metadata: Option<&IndexMap<String, String>>) -> Vec<String> {
        self.submitting = false;
        self.captcha = None;
        self.refresh_captcha();
        metadata
            .map(|metadata| self.form.apply_remote_errors(metadata))
            .unwrap_or_default()
    }

    pub(crate) fn accepted(&mut self) {
        self.submitting = false;
        self.captcha = None;
    }

    pub(crate) fn view(&self) -> LoginView {
        let locale = self.form.locale();
        LoginView {
            form: FormView {
                title: locale.text(Msg::Login).to_string(),
                rows: self.focus.rows(&self.form, None),
                focus: self.focus.index(),
                global_errors: self.form.global_errors().to_vec(),
                note: self
                    .submitting
                    .then(|| locale.text(Msg::Submitting).to_string()),
            },
            captcha: self.captcha_line(locale),
        }
    }

    fn captcha_line(&self, locale: Locale) -> String {
        match &self.captcha {
            None => locale.text(Msg::CaptchaPending).to_string(),
            Some(reply) if is_printable(&reply.captcha) => {
                format!("{}: {}", locale.text(Msg::FieldCaptcha), reply.captcha)
            }
            Some(_) => locale.text(Msg::CaptchaImage).to_string(),
        }
    }
}

/// Image captchas arrive as data URLs; only short plain codes can be shown.
fn is_printable(captcha: &str) -> bool {
    !captcha.is_empty() && captcha.len() <= 10 && !captcha.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::{domain::Status, lookup::ManualClock};

    fn deps(clock: &ManualClock) -> ScreenDeps {
        ScreenDeps {
            locale: LocaleHandle::new(Locale::EnUs),
            clock: Arc::new(clock.clone()),
            search: Duration::from_millis(200),
            windows: DebounceWindows::default(),
        }
    }

    fn team(id: u64, name: &str) -> TeamItem {
        TeamItem {
            id,
            name: name.into(),
            logo: String::new(),
            remark: String::new(),
            status: Status::Enable,
        }
    }

    #[test]
    fn team_rows_open_without_a_detail_fetch() {
        let clock = ManualClock::new();
        let mut screen = ListScreen::<TeamItem>::new(&deps(&clock)).unwrap();
        clock.advance(Duration::from_millis(200));
        let (id, _) = screen.page.poll().unwrap();
        let reply = ListReply {
            list: vec![team(3, "Ops")],
            ..ListReply::default()
        };
        screen.page.apply(id, Ok(reply)).unwrap();

        assert!(screen.open_selected());
        assert!(screen.editor.is_open());
        assert_eq!(screen.editor.session().form().record().name, "Ops");
        clock.advance(Duration::from_secs(1));
        assert!(screen.editor.poll().is_empty());
    }

    #[test]
    fn search_typing_feeds_the_keyword() {
        let clock = ManualClock::new();
        let mut screen = ListScreen::<StrategyItem>::new(&deps(&clock)).unwrap();
        for ch in "cpu".chars() {
            screen.edit_text(TextEdit::Insert(ch));
        }
        screen.edit_text(TextEdit::Backspace);
        assert_eq!(screen.page.keyword(), "cp");
        assert_eq!(screen.view(Locale::EnUs).keyword, "cp");
    }

    #[test]
    fn empty_login_is_not_sent() {
        let clock = ManualClock::new();
        let mut login = LoginScreen::new(&deps(&clock), Duration::from_millis(200)).unwrap();
        login.enter(None);
        assert_eq!(login.begin(), LoginAttempt::Invalid(3));
    }

    #[test]
    fn remembered_account_is_prefilled_and_needs_a_captcha() {
        let clock = ManualClock::new();
        let mut login = LoginScreen::new(&deps(&clock), Duration::from_millis(200)).unwrap();
        login.enter(Some(RememberedAccount {
            username: "admin".into(),
            password: "secret".into(),
            expires_at: Utc::now() + chrono::Duration::days(7),
        }));
        assert!(login.record().remember);
        assert_eq!(login.view().form.rows[1].value, "••••••");

        login.step(2);
        for ch in "ab12".chars() {
            login.edit_text(TextEdit::Insert(ch));
        }
        assert_eq!(login.begin(), LoginAttempt::NoCaptcha);

        clock.advance(Duration::from_millis(200));
        let id = login.poll_captcha().unwrap();
        let reply = CaptchaReply {
            id: "c-1".into(),
            captcha: "data:image/png;base64,AAAA".into(),
            captcha_type: 1,
        };
        assert_eq!(login.apply_captcha(id, Ok(reply)), Ok(true));
        assert_eq!(login.view().captcha, Locale::EnUs.text(Msg::CaptchaImage));

        let LoginAttempt::Ready(request) = login.begin() else {
            panic!("login should be ready");
        };
        assert_eq!(request.captcha.id, "c-1");
        assert_eq!(login.begin(), LoginAttempt::Busy);
    }
}
