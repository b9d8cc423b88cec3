use serde_json::Value;
use tracing::debug;

use crate::{
    api::{ApiError, source_options, submit_record},
    dialog::{DialogEffect, Dispatched, SubmitOutcome, SubmitRequest},
    i18n::Msg,
};

use super::{
    super::{
        input::{KeyAction, KeyCommand},
        screens::Resource,
    },
    Console, DialogKey, drive_dialog,
};

impl Console {
    /// Starts the list fetch of `T` once its debounce window has passed.
    pub(super) fn poll_list<T: Resource>(&mut self) {
        let Some((id, query)) = T::screen(&mut self.screens).page.poll() else {
            return;
        };
        debug!(%id, keyword = %query.keyword, "fetching list");
        self.tasks.spawn(
            move |backend| T::list(backend, query),
            move |console, result| {
                let outcome = T::screen(&mut console.screens).page.apply(id, result);
                if let Err(err) = outcome {
                    console.report(&err);
                }
            },
        );
    }

    /// Starts the detail and option fetches the dialog of `T` asks for.
    pub(super) fn poll_dialog<T: Resource>(&mut self) {
        let effects = T::screen(&mut self.screens).editor.poll();
        for effect in effects {
            match effect {
                DialogEffect::FetchDetail { ticket, id } => self.tasks.spawn(
                    move |backend| T::detail(backend, id),
                    move |console, result| {
                        let session = T::screen(&mut console.screens).editor.session_mut();
                        let Some(result) = result else {
                            session.skip_detail(ticket);
                            return;
                        };
                        if let Err(err) = session.apply_detail(ticket, result) {
                            console.report(&err);
                        }
                    },
                ),
                DialogEffect::FetchOptions { ticket, sources } => {
                    for source in sources {
                        self.tasks.spawn(
                            move |backend| async move {
                                source_options(backend.as_ref(), source).await
                            },
                            move |console, result| {
                                T::screen(&mut console.screens)
                                    .editor
                                    .session_mut()
                                    .apply_options(ticket, source, result);
                            },
                        );
                    }
                }
            }
        }
    }

    pub(super) fn dialog_key<T: Resource>(&mut self, command: KeyCommand) {
        let editor = &mut T::screen(&mut self.screens).editor;
        if drive_dialog(editor, command) == DialogKey::Submit {
            self.submit_dialog::<T>();
        }
    }

    pub(super) fn paste_into_dialog<T: Resource>(&mut self, text: &str) {
        T::screen(&mut self.screens).editor.paste(text);
    }

    pub(super) fn paste_into_search<T: Resource>(&mut self, text: &str) {
        let page = &mut T::screen(&mut self.screens).page;
        let line = text.lines().next().unwrap_or_default();
        if line.is_empty() {
            return;
        }
        let keyword = format!("{}{line}", page.keyword());
        page.set_keyword(keyword);
    }

    fn submit_dialog<T: Resource>(&mut self) {
        match T::screen(&mut self.screens).editor.begin_submit() {
            Ok(request) => {
                self.status.set(Msg::Submitting);
                let sent = request.clone();
                self.tasks.spawn(
                    move |backend| async move {
                        submit_record(backend.as_ref(), sent.resource, sent.kind, sent.payload)
                            .await
                    },
                    move |console, result| console.finish_dialog::<T>(&request, result),
                );
            }
            // Not editable yet, e.g. the detail is still loading.
            Err(0) => {}
            Err(issues) => self.status.issues_remaining(issues),
        }
    }

    fn finish_dialog<T: Resource>(&mut self, request: &SubmitRequest, result: Result<Value, ApiError>) {
        let editor = &mut T::screen(&mut self.screens).editor;
        let outcome =
            editor
                .session_mut()
                .finish_submit(request, result, &self.dispatcher, &mut self.feedback);
        debug!(resource = request.resource, ?outcome, "submit finished");
        match outcome {
            SubmitOutcome::Saved => {
                editor.close();
                self.status.ready();
            }
            SubmitOutcome::Rejected { .. } => {
                let issues = editor.session().form().issue_count();
                self.status.issues_remaining(issues);
            }
            SubmitOutcome::Failed(Dispatched::SignedOut) => self.signed_out(),
            SubmitOutcome::Failed(_) => self.status.ready(),
            SubmitOutcome::Discarded => {}
        }
    }

    /// Keys on a list screen that are not screen navigation.
    pub(super) fn list_command<T: Resource>(&mut self, command: KeyCommand) {
        let screen = T::screen(&mut self.screens);
        match command {
            KeyCommand::Action(KeyAction::Create) => screen.editor.open_create(),
            KeyCommand::Action(KeyAction::Edit) => {
                screen.open_selected();
            }
            KeyCommand::Action(KeyAction::Select(delta)) => screen.page.select(delta),
            KeyCommand::Action(KeyAction::Page(delta)) if delta < 0 => screen.page.prev_page(),
            KeyCommand::Action(KeyAction::Page(_)) => screen.page.next_page(),
            KeyCommand::Action(KeyAction::PageSize) => screen.page.cycle_page_size(),
            KeyCommand::Action(KeyAction::Refresh) => screen.page.refresh(),
            KeyCommand::Action(KeyAction::Cancel) if !screen.page.keyword().is_empty() => {
                screen.page.set_keyword(String::new());
            }
            KeyCommand::Edit(edit) => screen.edit_text(edit),
            _ => {}
        }
    }
}
