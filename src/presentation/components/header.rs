use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};
use unicode_width::UnicodeWidthStr;

use super::super::view::HeaderView;

const TAB_PADDING: usize = 3;
const LEFT_MORE: &str = "≪";
const RIGHT_MORE: &str = "≫";

pub fn render_header(frame: &mut Frame<'_>, area: Rect, header: &HeaderView) {
    let aside = format!(" {} · {} ", header.team, header.locale);
    let aside_width = (UnicodeWidthStr::width(aside.as_str()) as u16 + 2).min(area.width / 2);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(aside_width)])
        .split(area);

    let title = Span::styled(
        format!(" {} ", header.app),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let block = Block::default().title(title).borders(Borders::ALL);
    let widths: Vec<usize> = header
        .tabs
        .iter()
        .map(|tab| UnicodeWidthStr::width(tab.as_str()) + TAB_PADDING)
        .collect();
    let available = chunks[0].width.saturating_sub(2) as usize;
    let (start, end) = visible_tabs(&widths, header.active.unwrap_or(0), available);

    let lines: Vec<Line<'static>> = header.tabs[start..end]
        .iter()
        .enumerate()
        .map(|(offset, tab)| {
            let index = start + offset;
            let lead = if index == start && start > 0 { LEFT_MORE } else { " " };
            let tail = if index + 1 == end && end < header.tabs.len() {
                RIGHT_MORE
            } else {
                " "
            };
            Line::from(format!("{lead}{tab}{tail}"))
        })
        .collect();
    let mut tabs = Tabs::new(lines)
        .block(block)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    tabs = match header.active {
        Some(active) if (start..end).contains(&active) => tabs.select(active - start),
        _ => tabs.select(None),
    };
    frame.render_widget(tabs, chunks[0]);

    let aside = Paragraph::new(aside)
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(aside, chunks[1]);
}

/// Tab range `[start, end)` that fits `available` columns and contains
/// `selected`, growing to the right first.
fn visible_tabs(widths: &[usize], selected: usize, available: usize) -> (usize, usize) {
    if widths.is_empty() {
        return (0, 0);
    }
    let selected = selected.min(widths.len() - 1);
    let mut start = selected;
    let mut end = selected + 1;
    let mut used = widths[selected];
    loop {
        let mut grew = false;
        if end < widths.len() && used + widths[end] <= available {
            used += widths[end];
            end += 1;
            grew = true;
        }
        if start > 0 && used + widths[start - 1] <= available {
            start -= 1;
            used += widths[start];
            grew = true;
        }
        if !grew {
            break;
        }
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_fits_when_wide() {
        assert_eq!(visible_tabs(&[5, 5, 5], 1, 40), (0, 3));
    }

    #[test]
    fn narrow_strip_keeps_the_selection() {
        let (start, end) = visible_tabs(&[6, 6, 6, 6, 6], 3, 13);
        assert!(start <= 3 && 3 < end);
        assert_eq!(end - start, 2);
    }

    #[test]
    fn no_tabs_no_window() {
        assert_eq!(visible_tabs(&[], 0, 10), (0, 0));
    }
}
