use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{
    super::view::{BodyView, LoginView},
    fields::render_form,
    layout::popup_rect,
    table::render_table,
};

pub fn render_body(frame: &mut Frame<'_>, area: Rect, body: &BodyView, enable_cursor: bool) {
    match body {
        BodyView::Message { title, text } => {
            let placeholder = Paragraph::new(text.clone())
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::Gray))
                .block(Block::default().title(title.clone()).borders(Borders::ALL));
            frame.render_widget(placeholder, area);
        }
        BodyView::Table(table) => render_table(frame, area, table, enable_cursor),
        BodyView::Login(login) => render_login(frame, area, login, enable_cursor),
    }
}

fn render_login(frame: &mut Frame<'_>, area: Rect, login: &LoginView, enable_cursor: bool) {
    let height = (login.form.rows.len() as u16 + login.form.global_errors.len() as u16 + 6)
        .max(10);
    let card = popup_rect(area, area.width.min(64), height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(2)])
        .split(card);
    render_form(frame, chunks[0], &login.form, enable_cursor);
    let captcha = Paragraph::new(login.captcha.clone())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Green));
    frame.render_widget(captcha, chunks[1]);
}
