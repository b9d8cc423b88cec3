use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use unicode_width::UnicodeWidthStr;

use super::super::view::{PagerView, TableView};
use crate::table::{PageButton, truncate};

pub fn render_table(frame: &mut Frame<'_>, area: Rect, table: &TableView, enable_cursor: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let search = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{}: ", table.search_label),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(table.keyword.clone()),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(search, chunks[0]);
    if enable_cursor {
        let typed = UnicodeWidthStr::width(table.search_label.as_str())
            + UnicodeWidthStr::width(table.keyword.as_str())
            + 2;
        let x = chunks[0].x.saturating_add(1).saturating_add(typed as u16);
        frame.set_cursor_position((
            x.min(chunks[0].right().saturating_sub(2)),
            chunks[0].y + 1,
        ));
    }

    let block = Block::default()
        .title(table.title.clone())
        .borders(Borders::ALL);
    if table.rows.is_empty() || table.loading.is_some() {
        let text = table.loading.clone().unwrap_or_else(|| table.empty.clone());
        let placeholder = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, chunks[1]);
    } else {
        let header = Row::new(
            table
                .headers
                .iter()
                .map(|title| Cell::from(title.clone()))
                .collect::<Vec<_>>(),
        )
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let rows: Vec<Row<'static>> = table
            .rows
            .iter()
            .map(|cells| {
                Row::new(
                    cells
                        .iter()
                        .zip(&table.widths)
                        .map(|(cell, width)| Cell::from(truncate(cell, *width as usize)))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        let widths: Vec<Constraint> = table
            .widths
            .iter()
            .map(|width| Constraint::Length(*width))
            .collect();
        let mut state = TableState::default();
        state.select(Some(table.selected.min(table.rows.len() - 1)));
        let widget = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(2)
            .row_highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("» ");
        frame.render_stateful_widget(widget, chunks[1], &mut state);
    }

    frame.render_widget(Paragraph::new(pager_line(&table.pager)), chunks[2]);
}

fn pager_line(pager: &PagerView) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let live = Style::default().fg(Color::White);
    let mut spans = vec![Span::styled(
        "‹ ",
        if pager.has_prev { live } else { dim },
    )];
    for button in &pager.buttons {
        match button {
            PageButton::Page(page) if *page == pager.current => spans.push(Span::styled(
                format!("[{page}] "),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            PageButton::Page(page) => spans.push(Span::styled(format!("{page} "), live)),
            PageButton::Ellipsis => spans.push(Span::styled("… ", dim)),
        }
    }
    spans.push(Span::styled("›", if pager.has_next { live } else { dim }));
    spans.push(Span::styled(format!("   {}", pager.summary), dim));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pager_marks_the_current_page() {
        let pager = PagerView {
            buttons: vec![PageButton::Page(1), PageButton::Ellipsis, PageButton::Page(9)],
            current: 9,
            has_prev: true,
            has_next: false,
            summary: "90".into(),
        };
        let text: String = pager_line(&pager)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert_eq!(text, "‹ 1 … [9] ›   90");
    }
}
