use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::super::view::FrameView;

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, view: &FrameView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let issues = view
        .dialog
        .as_ref()
        .map(|dialog| {
            dialog.rows.iter().filter(|row| row.error.is_some()).count()
                + dialog.global_errors.len()
        })
        .unwrap_or(0);
    let badge = if issues > 0 {
        Span::styled(format!(" [! {issues}]"), Style::default().fg(Color::Red))
    } else {
        Span::styled(" [ok]", Style::default().fg(Color::Green))
    };
    let status = Paragraph::new(Line::from(vec![Span::raw(view.status.clone()), badge]));
    frame.render_widget(status, rows[0]);

    if let Some(help) = &view.help {
        let help = Paragraph::new(help.clone())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(help, rows[1]);
    }
}
