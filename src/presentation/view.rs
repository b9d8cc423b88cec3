use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{
    dialog::{ModalKind, Toast},
    table::PageButton,
};

use super::components::{
    render_body, render_dialog, render_footer, render_header, render_modal, render_popup,
    render_toasts,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Input,
    Toggle,
    Choice,
    Header,
    Action,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    pub label: String,
    pub value: String,
    pub error: Option<String>,
    pub required: bool,
    pub depth: u16,
    pub kind: RowKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub title: String,
    pub rows: Vec<FieldRow>,
    pub focus: usize,
    pub global_errors: Vec<String>,
    /// Shown instead of accepting input, e.g. while the detail loads.
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupLine {
    pub marker: Option<&'static str>,
    pub text: String,
    pub depth: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub title: String,
    pub lines: Vec<PopupLine>,
    pub selected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerView {
    pub buttons: Vec<PageButton>,
    pub current: u32,
    pub has_prev: bool,
    pub has_next: bool,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub title: String,
    pub search_label: String,
    pub keyword: String,
    pub headers: Vec<String>,
    pub widths: Vec<u16>,
    pub rows: Vec<Vec<String>>,
    pub selected: usize,
    pub loading: Option<String>,
    pub empty: String,
    pub pager: PagerView,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginView {
    pub form: FormView,
    pub captcha: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyView {
    Message { title: String, text: String },
    Table(TableView),
    Login(LoginView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub kind: ModalKind,
    pub title: String,
    pub message: String,
    pub confirm: String,
    pub cancel: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub app: String,
    pub tabs: Vec<String>,
    pub active: Option<usize>,
    pub team: String,
    pub locale: String,
}

/// Everything one frame shows, resolved to display strings.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub header: HeaderView,
    pub body: BodyView,
    pub dialog: Option<FormView>,
    pub popup: Option<PopupView>,
    pub toasts: Vec<Toast>,
    pub modal: Option<ModalView>,
    pub status: String,
    pub help: Option<String>,
}

pub fn draw(frame: &mut Frame<'_>, view: &FrameView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], &view.header);
    let body_has_cursor = view.dialog.is_none() && view.modal.is_none();
    render_body(frame, chunks[1], &view.body, body_has_cursor);
    render_footer(frame, chunks[2], view);

    if let Some(dialog) = &view.dialog {
        render_dialog(frame, dialog, view.popup.is_none() && view.modal.is_none());
    }
    if let Some(popup) = &view.popup {
        render_popup(frame, popup);
    }
    render_toasts(frame, &view.toasts);
    if let Some(modal) = &view.modal {
        render_modal(frame, modal);
    }
}
