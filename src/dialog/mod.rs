//! Create/edit dialog lifecycle: detail loading, submit and the feedback
//! that follows.

mod feedback;

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use serde_json::Value;
use tracing::{debug, warn};

pub use feedback::{
    Dispatched, ErrorDispatcher, FeedbackQueue, Modal, ModalKind, Notifier, TOAST_TTL, Toast,
    ToastKind,
};

use crate::{
    api::{ApiError, SubmitKind},
    domain::OptionItem,
    form::{FormController, FormRecord, FormValidator, OptionSource, SlotKind},
    i18n::{LocaleHandle, Msg},
    lookup::{Clock, Debouncer, OptionLookup, RequestId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    Closed,
    Opening,
    Editing,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogTarget {
    Create,
    Edit(u64),
}

/// Identifies the dialog instance a network answer belongs to. An answer is
/// applied only while the same instance is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    target: DialogTarget,
    request: RequestId,
}

impl Ticket {
    pub fn target(&self) -> DialogTarget {
        self.target
    }

    pub fn request(&self) -> RequestId {
        self.request
    }
}

/// Caller-supplied hook raised after a successful save so the owning list
/// refetches.
#[derive(Debug, Clone, Default)]
pub struct RefreshSignal {
    raised: Arc<AtomicBool>,
}

impl RefreshSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Returns whether a refresh was requested, clearing the flag.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::SeqCst)
    }
}

/// Static description of a dialog kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogSpec {
    /// REST resource, e.g. `/v1/team`.
    pub resource: &'static str,
    pub create_title: Msg,
    pub edit_title: Msg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceWindows {
    pub options: Duration,
    pub detail: Duration,
}

impl Default for DebounceWindows {
    fn default() -> Self {
        Self {
            options: Duration::from_millis(100),
            detail: Duration::from_millis(500),
        }
    }
}

/// Work the owner has to start on the dialog's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEffect {
    FetchDetail { ticket: Ticket, id: u64 },
    FetchOptions { ticket: Ticket, sources: Vec<OptionSource> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub ticket: Ticket,
    pub resource: &'static str,
    pub kind: SubmitKind,
    pub payload: Value,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Saved; the dialog closed and the refresh signal was raised.
    Saved,
    /// Backend field errors are now shown inline.
    Rejected { mapped: usize },
    Failed(Dispatched),
    /// The answer belonged to a dialog instance that is gone.
    Discarded,
}

/// One create/edit dialog over a record type.
#[derive(Debug)]
pub struct DialogSession<R: FormRecord> {
    spec: DialogSpec,
    phase: DialogPhase,
    target: DialogTarget,
    generation: u64,
    form: FormController<R>,
    seeded: bool,
    options: OptionLookup,
    detail: Debouncer,
    submit_seq: u64,
    submitting: Option<Ticket>,
    refresh: RefreshSignal,
    locale: LocaleHandle,
}

impl<R: FormRecord> DialogSession<R> {
    pub fn new(
        spec: DialogSpec,
        validator: Arc<FormValidator<R>>,
        locale: LocaleHandle,
        clock: Arc<dyn Clock>,
        windows: DebounceWindows,
        refresh: RefreshSignal,
    ) -> Self {
        Self {
            spec,
            phase: DialogPhase::Closed,
            target: DialogTarget::Create,
            generation: 0,
            form: FormController::new(validator, locale.clone()),
            seeded: false,
            options: OptionLookup::new(windows.options, clock.clone()),
            detail: Debouncer::new(windows.detail, clock),
            submit_seq: 0,
            submitting: None,
            refresh,
            locale,
        }
    }

    pub fn spec(&self) -> DialogSpec {
        self.spec
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn target(&self) -> DialogTarget {
        self.target
    }

    pub fn is_open(&self) -> bool {
        self.phase != DialogPhase::Closed
    }

    pub fn title(&self) -> &'static str {
        match self.target {
            DialogTarget::Create => self.locale.text(self.spec.create_title),
            DialogTarget::Edit(_) => self.locale.text(self.spec.edit_title),
        }
    }

    pub fn form(&self) -> &FormController<R> {
        &self.form
    }

    /// Editing is only possible while the dialog shows a loaded record.
    pub fn form_mut(&mut self) -> Option<&mut FormController<R>> {
        (self.phase == DialogPhase::Editing).then_some(&mut self.form)
    }

    pub fn options(&self) -> &OptionLookup {
        &self.options
    }

    pub fn refresh_signal(&self) -> &RefreshSignal {
        &self.refresh
    }

    fn transition(&mut self, next: DialogPhase) {
        if self.phase != next {
            debug!(from = ?self.phase, to = ?next, target = ?self.target, "dialog transition");
            self.phase = next;
        }
    }

    fn ticket(&self, request: RequestId) -> Ticket {
        Ticket {
            generation: self.generation,
            target: self.target,
            request,
        }
    }

    fn begin(&mut self, target: DialogTarget) {
        self.generation += 1;
        self.target = target;
        self.submitting = None;
        self.options.clear();
        self.detail.reset();
        self.form.reset();
        self.seeded = false;
        self.transition(DialogPhase::Opening);
    }

    fn request_options(&mut self) {
        let mut sources = Vec::new();
        for slot in self.form.slots() {
            if let SlotKind::Select(source) | SlotKind::MultiSelect(source) = slot.kind {
                if !sources.contains(&source) {
                    sources.push(source);
                }
            }
        }
        self.options.request(sources);
    }

    pub fn open_create(&mut self) {
        self.begin(DialogTarget::Create);
        self.request_options();
        self.transition(DialogPhase::Editing);
    }

    /// Opens for `id`. `preview` (e.g. the list row) is shown until the
    /// detail arrives, and stays editable if the detail cannot be loaded.
    /// Without a preview a failed detail closes the dialog.
    pub fn open_edit(&mut self, id: u64, preview: Option<R>) {
        self.begin(DialogTarget::Edit(id));
        if let Some(mut record) = preview {
            record.set_id(Some(id));
            self.form.seed(record);
            self.seeded = true;
        }
        self.detail.trigger();
        self.request_options();
    }

    /// Opens for `id` with a record that needs no detail fetch.
    pub fn open_with(&mut self, id: u64, mut record: R) {
        self.begin(DialogTarget::Edit(id));
        record.set_id(Some(id));
        self.form.seed(record);
        self.request_options();
        self.transition(DialogPhase::Editing);
    }

    pub fn close(&mut self) {
        self.generation += 1;
        self.submitting = None;
        self.detail.reset();
        self.options.clear();
        self.form.reset();
        self.seeded = false;
        self.transition(DialogPhase::Closed);
    }

    /// Collects the fetches whose quiet period is over.
    pub fn poll(&mut self) -> Vec<DialogEffect> {
        let mut effects = Vec::new();
        if !self.is_open() {
            return effects;
        }
        if let (Some(request), DialogTarget::Edit(id)) = (self.detail.poll(), self.target) {
            effects.push(DialogEffect::FetchDetail {
                ticket: self.ticket(request),
                id,
            });
        }
        if let Some((request, sources)) = self.options.poll() {
            effects.push(DialogEffect::FetchOptions {
                ticket: self.ticket(request),
                sources,
            });
        }
        effects
    }

    fn accepts(&self, ticket: &Ticket) -> bool {
        self.is_open() && ticket.generation == self.generation && ticket.target == self.target
    }

    /// Applies a fetched detail. Returns false when the answer is stale.
    pub fn apply_detail(
        &mut self,
        ticket: Ticket,
        result: Result<R, ApiError>,
    ) -> Result<bool, ApiError> {
        if !self.accepts(&ticket) || !self.detail.is_current(ticket.request) {
            debug!(target = ?ticket.target, "discarding stale detail");
            return Ok(false);
        }
        if self.phase != DialogPhase::Opening {
            return Ok(false);
        }
        match result {
            Ok(mut record) => {
                if let DialogTarget::Edit(id) = self.target {
                    record.set_id(Some(id));
                }
                self.form.seed(record);
                self.seeded = true;
                self.transition(DialogPhase::Editing);
                Ok(true)
            }
            Err(err) => {
                warn!(target = ?self.target, error = %err, "detail fetch failed");
                self.settle_on_preview();
                Err(err)
            }
        }
    }

    /// Ends the detail wait when there is nothing to fetch. Returns whether
    /// the dialog is now editable.
    pub fn skip_detail(&mut self, ticket: Ticket) -> bool {
        if !self.accepts(&ticket)
            || !self.detail.is_current(ticket.request)
            || self.phase != DialogPhase::Opening
        {
            return false;
        }
        self.settle_on_preview()
    }

    // Editing needs a seeded record; an edit target without one closes.
    fn settle_on_preview(&mut self) -> bool {
        if !self.seeded {
            self.close();
            return false;
        }
        self.transition(DialogPhase::Editing);
        true
    }

    pub fn apply_options(
        &mut self,
        ticket: Ticket,
        source: OptionSource,
        result: Result<Vec<OptionItem>, ApiError>,
    ) -> bool {
        if !self.accepts(&ticket) {
            return false;
        }
        self.options.complete(source, ticket.request, result)
    }

    /// Validates the whole record and, when clean, hands out the request to
    /// send. Returns the number of open issues otherwise.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, usize> {
        if self.phase != DialogPhase::Editing {
            return Err(0);
        }
        self.transition(DialogPhase::Validating);
        match self.form.validate() {
            Ok(payload) => {
                self.submit_seq += 1;
                let ticket = Ticket {
                    generation: self.generation,
                    target: self.target,
                    request: RequestId::from_seq(self.submit_seq),
                };
                self.submitting = Some(ticket);
                self.transition(DialogPhase::Submitting);
                Ok(SubmitRequest {
                    ticket,
                    resource: self.spec.resource,
                    kind: match self.target {
                        DialogTarget::Edit(id) => SubmitKind::Update(id),
                        DialogTarget::Create => SubmitKind::Create,
                    },
                    payload,
                    name: self.form.record().display_name().to_string(),
                })
            }
            Err(issues) => {
                self.transition(DialogPhase::Editing);
                Err(issues)
            }
        }
    }

    pub fn finish_submit(
        &mut self,
        request: &SubmitRequest,
        result: Result<Value, ApiError>,
        dispatcher: &ErrorDispatcher,
        notifier: &mut dyn Notifier,
    ) -> SubmitOutcome {
        if self.submitting != Some(request.ticket) || !self.accepts(&request.ticket) {
            debug!("discarding stale submit answer");
            return SubmitOutcome::Discarded;
        }
        self.submitting = None;
        match result {
            Ok(_) => {
                let created = request.kind.is_create();
                notifier.toast(Toast::success(self.locale.get().saved(&request.name, created)));
                self.close();
                self.refresh.raise();
                SubmitOutcome::Saved
            }
            Err(ApiError::Application(body)) if body.has_field_errors() => {
                let unmatched = self.form.apply_remote_errors(&body.metadata);
                let mapped = body.metadata.len() - unmatched.len();
                if !unmatched.is_empty() {
                    notifier.toast(Toast::error(body.reason.clone(), unmatched.join("; ")));
                }
                self.transition(DialogPhase::Editing);
                SubmitOutcome::Rejected { mapped }
            }
            Err(err) => {
                let dispatched = dispatcher.dispatch(&err, notifier);
                self.transition(DialogPhase::Editing);
                SubmitOutcome::Failed(dispatched)
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
        records::{DatasourceForm, StrategyForm, TeamForm},
        session::{Session, SessionStore},
    };
    use indexmap::IndexMap;

    const TEAM: DialogSpec = DialogSpec {
        resource: "/v1/team",
        create_title: Msg::CreateTeam,
        edit_title: Msg::EditTeam,
    };

    const DATASOURCE: DialogSpec = DialogSpec {
        resource: "/v1/datasource",
        create_title: Msg::CreateDatasource,
        edit_title: Msg::EditDatasource,
    };

    const STRATEGY: DialogSpec = DialogSpec {
        resource: "/v1/strategy",
        create_title: Msg::CreateStrategy,
        edit_title: Msg::EditStrategy,
    };

    struct Harness {
        clock: ManualClock,
        notifier: FeedbackQueue,
        dispatcher: ErrorDispatcher,
    }

    fn harness() -> Harness {
        let clock = ManualClock::new();
        let session = Session::new(SessionStore::new(std::env::temp_dir()));
        Harness {
            notifier: FeedbackQueue::new(Arc::new(clock.clone())),
            dispatcher: ErrorDispatcher::new(LocaleHandle::new(Locale::EnUs), session),
            clock,
        }
    }

    fn dialog<R: FormRecord>(spec: DialogSpec, clock: &ManualClock) -> DialogSession<R> {
        DialogSession::new(
            spec,
            Arc::new(FormValidator::new().unwrap()),
            LocaleHandle::new(Locale::EnUs),
            Arc::new(clock.clone()),
            DebounceWindows::default(),
            RefreshSignal::new(),
        )
    }

    fn detail_ticket<R: FormRecord>(dialog: &mut DialogSession<R>, clock: &ManualClock) -> Ticket {
        clock.advance(Duration::from_millis(500));
        dialog
            .poll()
            .into_iter()
            .find_map(|effect| match effect {
                DialogEffect::FetchDetail { ticket, .. } => Some(ticket),
                _ => None,
            })
            .expect("detail fetch")
    }

    fn datasource(name: &str) -> DatasourceForm {
        DatasourceForm {
            name: name.into(),
            endpoint: "http://prom:9090".into(),
            ..DatasourceForm::default()
        }
    }

    #[test]
    fn late_detail_for_a_previous_target_is_ignored() {
        let h = harness();
        let mut dialog = dialog::<DatasourceForm>(DATASOURCE, &h.clock);

        dialog.open_edit(5, None);
        let slow = detail_ticket(&mut dialog, &h.clock);
        dialog.close();

        dialog.open_edit(7, None);
        let fast = detail_ticket(&mut dialog, &h.clock);
        assert_eq!(dialog.apply_detail(fast, Ok(datasource("seven"))), Ok(true));
        assert_eq!(dialog.apply_detail(slow, Ok(datasource("five"))), Ok(false));

        assert_eq!(dialog.form().record().name, "seven");
        assert_eq!(dialog.form().record().id, Some(7));
        assert_eq!(dialog.phase(), DialogPhase::Editing);
    }

    #[test]
    fn failed_detail_keeps_the_preview_editable() {
        let h = harness();
        let mut dialog = dialog::<DatasourceForm>(DATASOURCE, &h.clock);
        dialog.open_edit(5, Some(datasource("prom")));
        let ticket = detail_ticket(&mut dialog, &h.clock);

        let outcome = dialog.apply_detail(ticket, Err(ApiError::Network("reset".into())));
        assert!(matches!(outcome, Err(ApiError::Network(_))));
        assert_eq!(dialog.phase(), DialogPhase::Editing);
        assert_eq!(dialog.form().record().name, "prom");

        let request = dialog.begin_submit().unwrap();
        assert_eq!(request.kind, SubmitKind::Update(5));
    }

    #[test]
    fn failed_detail_without_preview_closes() {
        let h = harness();
        let mut dialog = dialog::<StrategyForm>(STRATEGY, &h.clock);
        dialog.open_edit(5, None);
        let ticket = detail_ticket(&mut dialog, &h.clock);

        let outcome = dialog.apply_detail(ticket, Err(ApiError::Network("reset".into())));
        assert!(outcome.is_err());
        assert_eq!(dialog.phase(), DialogPhase::Closed);
        assert!(dialog.form_mut().is_none());
        assert_eq!(dialog.begin_submit(), Err(0));
    }

    #[test]
    fn skipped_detail_needs_a_preview() {
        let h = harness();
        let mut dialog = dialog::<DatasourceForm>(DATASOURCE, &h.clock);
        dialog.open_edit(3, Some(datasource("loki")));
        let ticket = detail_ticket(&mut dialog, &h.clock);
        assert!(dialog.skip_detail(ticket));
        assert_eq!(dialog.phase(), DialogPhase::Editing);

        dialog.open_edit(4, None);
        let ticket = detail_ticket(&mut dialog, &h.clock);
        assert!(!dialog.skip_detail(ticket));
        assert!(!dialog.is_open());
    }

    #[test]
    fn edit_submits_an_update_for_the_target() {
        let h = harness();
        let mut dialog = dialog::<StrategyForm>(STRATEGY, &h.clock);
        dialog.open_edit(5, None);
        let ticket = detail_ticket(&mut dialog, &h.clock);
        let detail = StrategyForm {
            name: "cpu".into(),
            ..StrategyForm::default()
        };
        assert_eq!(dialog.apply_detail(ticket, Ok(detail)), Ok(true));

        dialog.form_mut().unwrap().edit(|strategy| strategy.id = None);
        let request = dialog.begin_submit().unwrap();
        assert_eq!(request.kind, SubmitKind::Update(5));
    }

    #[test]
    fn successful_create_closes_and_signals_refresh() {
        let mut h = harness();
        let mut dialog = dialog::<TeamForm>(TEAM, &h.clock);
        dialog.open_create();
        let form = dialog.form_mut().unwrap();
        form.edit(|team| {
            team.name = "Ops".into();
            team.logo = "http://x/y.png".into();
        });
        let request = dialog.begin_submit().unwrap();
        assert_eq!(request.kind, SubmitKind::Create);
        assert_eq!(dialog.phase(), DialogPhase::Submitting);

        let outcome = dialog.finish_submit(&request, Ok(Value::Null), &h.dispatcher, &mut h.notifier);
        assert_eq!(outcome, SubmitOutcome::Saved);
        assert!(!dialog.is_open());
        assert!(dialog.refresh_signal().take());
        assert!(h.notifier.toasts().any(|toast| toast.title.contains("Ops")));
    }

    #[test]
    fn backend_field_errors_keep_the_dialog_open() {
        let mut h = harness();
        let mut dialog = dialog::<TeamForm>(TEAM, &h.clock);
        dialog.open_create();
        dialog.form_mut().unwrap().edit(|team| team.name = "dup".into());
        let request = dialog.begin_submit().unwrap();
        let mut metadata = IndexMap::new();
        metadata.insert("name".to_string(), "required".to_string());
        let err = ApiError::Application(ErrorResponse {
            code: 400,
            metadata,
            ..ErrorResponse::default()
        });

        let outcome = dialog.finish_submit(&request, Err(err), &h.dispatcher, &mut h.notifier);
        assert_eq!(outcome, SubmitOutcome::Rejected { mapped: 1 });
        assert_eq!(dialog.phase(), DialogPhase::Editing);
        assert_eq!(
            dialog.form().error(&crate::form::FieldPath::field("name")),
            Some("required")
        );
        assert!(h.notifier.modal().is_none());
    }

    #[test]
    fn invalid_record_never_leaves_the_dialog() {
        let h = harness();
        let mut dialog = dialog::<TeamForm>(TEAM, &h.clock);
        dialog.open_create();
        assert_eq!(dialog.begin_submit(), Err(1));
        assert_eq!(dialog.phase(), DialogPhase::Editing);
    }

    #[test]
    fn answer_after_close_is_discarded() {
        let mut h = harness();
        let mut dialog = dialog::<TeamForm>(TEAM, &h.clock);
        dialog.open_create();
        dialog.form_mut().unwrap().edit(|team| team.name = "Ops".into());
        let request = dialog.begin_submit().unwrap();
        dialog.close();
        let outcome = dialog.finish_submit(&request, Ok(Value::Null), &h.dispatcher, &mut h.notifier);
        assert_eq!(outcome, SubmitOutcome::Discarded);
        assert!(!dialog.refresh_signal().take());
    }
}
