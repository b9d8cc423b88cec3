use crate::{
    dialog::ModalKind,
    i18n::Msg,
    presentation::{BodyView, FormView, FrameView, HeaderView, ModalView, PopupView},
    routes::{Route, menu_routes},
};

use super::{super::keymap, Console, ListKind};

impl Console {
    /// Resolves the whole screen to display strings for one draw.
    pub(crate) fn frame_view(&self) -> FrameView {
        let locale = self.locale.get();
        let (dialog, popup) = self.dialog_views();
        FrameView {
            header: self.header_view(),
            body: self.body_view(),
            dialog,
            popup,
            toasts: self.feedback.toasts().cloned().collect(),
            modal: self.feedback.modal().map(|modal| ModalView {
                kind: modal.kind,
                title: modal.title.clone(),
                message: modal.message.clone(),
                confirm: locale.text(Msg::Confirm).to_string(),
                cancel: match modal.kind {
                    ModalKind::Confirm => locale.text(Msg::Cancel).to_string(),
                    ModalKind::Notice => String::new(),
                },
            }),
            status: self.status.message(locale),
            help: self
                .options
                .show_help
                .then(|| keymap::help_text(self.focus().context()))
                .flatten(),
        }
    }

    fn header_view(&self) -> HeaderView {
        let locale = self.locale.get();
        let routes = menu_routes();
        HeaderView {
            app: locale.text(Msg::App).to_string(),
            active: routes
                .iter()
                .position(|(_, route)| route == self.navigator.route()),
            tabs: routes
                .iter()
                .map(|(label, _)| locale.text(*label).to_string())
                .collect(),
            team: self
                .session
                .team()
                .map(|team| team.name)
                .unwrap_or_else(|| locale.text(Msg::NoTeam).to_string()),
            locale: locale.as_str().to_string(),
        }
    }

    fn body_view(&self) -> BodyView {
        let locale = self.locale.get();
        let route = self.navigator.route();
        let message = |title: Msg, text: String| BodyView::Message {
            title: locale.text(title).to_string(),
            text,
        };
        if *route == Route::Login {
            return BodyView::Login(self.login.view());
        }
        if !self.session.is_logged_in() {
            return message(route.title(), locale.text(Msg::RedirectingToLogin).to_string());
        }
        if let Some(kind) = self.active_list() {
            let table = match kind {
                ListKind::Teams => self.screens.teams.view(locale),
                ListKind::Datasources => self.screens.datasources.view(locale),
                ListKind::Groups => self.screens.groups.view(locale),
                ListKind::Strategies => self.screens.strategies.view(locale),
            };
            return BodyView::Table(table);
        }
        match route {
            Route::Dashboard => message(
                Msg::MenuDashboard,
                locale.text(Msg::DashboardPlaceholder).to_string(),
            ),
            Route::NotFound(path) => message(Msg::PageNotFound, path.clone()),
            other => message(other.title(), locale.text(Msg::Empty).to_string()),
        }
    }

    fn dialog_views(&self) -> (Option<FormView>, Option<PopupView>) {
        if self.permissions.is_open() {
            return (Some(self.permissions.view()), self.permissions.popup_view());
        }
        let Some(kind) = self.active_list() else {
            return (None, None);
        };
        macro_rules! open {
            ($editor:expr) => {
                if $editor.is_open() {
                    (Some($editor.view()), $editor.popup_view())
                } else {
                    (None, None)
                }
            };
        }
        match kind {
            ListKind::Teams => open!(self.screens.teams.editor),
            ListKind::Datasources => open!(self.screens.datasources.editor),
            ListKind::Groups => open!(self.screens.groups.editor),
            ListKind::Strategies => open!(self.screens.strategies.editor),
        }
    }
}
