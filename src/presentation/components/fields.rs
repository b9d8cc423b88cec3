use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use super::{
    super::view::{FieldRow, FormView, RowKind},
    layout::{percent_rect, scroll_offset},
};

pub fn render_dialog(frame: &mut Frame<'_>, form: &FormView, enable_cursor: bool) {
    let area = percent_rect(frame.area(), 70, 80);
    frame.render_widget(Clear, area);
    render_form(frame, area, form, enable_cursor);
}

/// Draws a form inside `area`: field rows, then any form-level errors.
pub fn render_form(frame: &mut Frame<'_>, area: Rect, form: &FormView, enable_cursor: bool) {
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", form.title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(note) = &form.note {
        let note = Paragraph::new(note.clone())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(note, inner);
        return;
    }

    let error_height = if form.global_errors.is_empty() {
        0
    } else {
        (form.global_errors.len() as u16 + 1).min(inner.height / 3)
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(error_height)])
        .split(inner);

    render_rows(frame, chunks[0], form, enable_cursor);
    if error_height > 0 {
        let lines: Vec<Line<'static>> = form
            .global_errors
            .iter()
            .map(|error| {
                Line::from(Span::styled(
                    format!("! {error}"),
                    Style::default().fg(Color::Red),
                ))
            })
            .collect();
        let errors = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(errors, chunks[1]);
    }
}

fn render_rows(frame: &mut Frame<'_>, area: Rect, form: &FormView, enable_cursor: bool) {
    if form.rows.is_empty() {
        return;
    }
    let content_width = area.width.saturating_sub(4).max(4);
    let focus = form.focus.min(form.rows.len() - 1);
    let mut cursor: Option<(u16, u16)> = None;
    let mut heights = Vec::with_capacity(form.rows.len());
    let items: Vec<ListItem<'static>> = form
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let selected = index == focus;
            let (lines, value_width) = row_lines(row, selected, content_width);
            if selected {
                cursor = Some((row.depth * 2 + label_width(row), value_width));
            }
            heights.push(lines.len());
            ListItem::new(lines)
        })
        .collect();

    // rows can wrap, so the window is estimated from the average height
    let average = (heights.iter().sum::<usize>() / heights.len()).max(1);
    let visible = area.height as usize / average;
    let offset = scroll_offset(focus, visible, 0);

    let mut state = ListState::default();
    state.select(Some(focus));
    *state.offset_mut() = offset;
    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut state);

    let Some((label, value)) = cursor else {
        return;
    };
    if !enable_cursor || form.rows[focus].kind != RowKind::Input {
        return;
    }
    let line = heights[offset..focus].iter().sum::<usize>() as u16;
    if line >= area.height {
        return;
    }
    let x = area
        .x
        .saturating_add(2)
        .saturating_add(label)
        .saturating_add(value)
        .min(area.right().saturating_sub(1));
    frame.set_cursor_position((x, area.y + line));
}

fn label_width(row: &FieldRow) -> u16 {
    let marker = if row.required { 2 } else { 0 };
    (UnicodeWidthStr::width(row.label.as_str()) + marker + 2) as u16
}

fn row_lines(row: &FieldRow, selected: bool, max_width: u16) -> (Vec<Line<'static>>, u16) {
    let indent = "  ".repeat(row.depth as usize);
    let label_style = match (row.kind, selected) {
        (RowKind::Header, _) => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        (_, true) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    };
    let mut label = row.label.clone();
    if row.required {
        label.push_str(" *");
    }

    let value = match row.kind {
        RowKind::Toggle => row.value.clone(),
        RowKind::Choice => format!("{} ▾", row.value),
        RowKind::Action => format!("[ {} ]", row.value),
        RowKind::Header | RowKind::Input => row.value.clone(),
    };
    let value_style = if selected {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut lines = vec![Line::from(vec![
        Span::raw(indent.clone()),
        Span::styled(label, label_style),
        Span::raw(": "),
        Span::styled(value.clone(), value_style),
    ])];
    if let Some(error) = &row.error {
        let width = (max_width as usize).saturating_sub(indent.len() + 4).max(8);
        for line in wrap(error, width) {
            lines.push(Line::from(Span::styled(
                format!("{indent}    {line}"),
                Style::default().fg(Color::Red),
            )));
        }
    }
    (lines, UnicodeWidthStr::width(value.as_str()) as u16)
}
