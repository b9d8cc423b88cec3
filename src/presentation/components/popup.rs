use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};
use unicode_width::UnicodeWidthStr;

use super::{super::view::PopupView, layout::popup_rect};
use crate::table::truncate;

pub fn render_popup(frame: &mut Frame<'_>, popup: &PopupView) {
    let screen = frame.area();
    let labels: Vec<String> = popup
        .lines
        .iter()
        .map(|line| {
            let indent = "  ".repeat(line.depth as usize);
            match line.marker {
                Some(marker) => format!("{indent}{marker} {}", line.text),
                None => format!("{indent}{}", line.text),
            }
        })
        .collect();
    let widest = labels
        .iter()
        .map(|label| UnicodeWidthStr::width(label.as_str()))
        .chain(std::iter::once(UnicodeWidthStr::width(popup.title.as_str())))
        .max()
        .unwrap_or(10) as u16;
    let width = widest.saturating_add(6).min(screen.width.saturating_sub(2).max(1));
    let height = (labels.len().max(1) as u16).saturating_add(2);
    let area = popup_rect(screen, width, height.max(3));
    frame.render_widget(Clear, area);

    let inner = width.saturating_sub(5) as usize;
    let items: Vec<ListItem<'static>> = if labels.is_empty() {
        vec![ListItem::new("—").style(Style::default().fg(Color::DarkGray))]
    } else {
        labels
            .into_iter()
            .map(|label| ListItem::new(truncate(&label, inner)))
            .collect()
    };
    let mut state = ListState::default();
    if !popup.lines.is_empty() {
        state.select(Some(popup.selected.min(popup.lines.len() - 1)));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title(popup.title.clone())
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut state);
}
