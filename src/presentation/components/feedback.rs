use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use textwrap::wrap;

use super::{super::view::ModalView, layout::popup_rect};
use crate::dialog::{ModalKind, Toast, ToastKind};

const TOAST_WIDTH: u16 = 42;

pub fn render_toasts(frame: &mut Frame<'_>, toasts: &[Toast]) {
    let screen = frame.area();
    let width = TOAST_WIDTH.min(screen.width);
    let mut y = screen.y + 1;
    for toast in toasts {
        let lines = toast_lines(toast, width.saturating_sub(2) as usize);
        let height = lines.len() as u16 + 2;
        if y + height > screen.bottom() {
            break;
        }
        let area = Rect::new(screen.right().saturating_sub(width + 1), y, width, height);
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(kind_color(toast.kind)));
        frame.render_widget(Paragraph::new(lines).block(block), area);
        y += height;
    }
}

fn toast_lines(toast: &Toast, width: usize) -> Vec<Line<'static>> {
    let title = match toast.code {
        Some(code) => format!("{} ({code})", toast.title),
        None => toast.title.clone(),
    };
    let mut lines = vec![Line::from(Span::styled(
        title,
        Style::default()
            .fg(kind_color(toast.kind))
            .add_modifier(Modifier::BOLD),
    ))];
    if !toast.description.is_empty() {
        lines.extend(
            wrap(&toast.description, width.max(8))
                .into_iter()
                .map(|line| Line::from(line.into_owned())),
        );
    }
    lines
}

fn kind_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
        ToastKind::Info => Color::Cyan,
    }
}

pub fn render_modal(frame: &mut Frame<'_>, modal: &ModalView) {
    let screen = frame.area();
    let width = screen.width.saturating_sub(screen.width / 3).clamp(20, 64);
    let body: Vec<String> = wrap(&modal.message, width.saturating_sub(4) as usize)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();
    let height = body.len() as u16 + 4;
    let area = popup_rect(screen, width, height);
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line<'static>> = body.into_iter().map(Line::from).collect();
    lines.push(Line::default());
    let confirm = Span::styled(
        format!("[Enter] {}", modal.confirm),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    lines.push(match modal.kind {
        ModalKind::Notice => Line::from(confirm),
        ModalKind::Confirm => Line::from(vec![
            confirm,
            Span::raw("   "),
            Span::styled(
                format!("[Esc] {}", modal.cancel),
                Style::default().fg(Color::Gray),
            ),
        ]),
    });

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", modal.title),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_title_carries_the_code() {
        let toast = Toast::error("失败", "名称重复").with_code(400);
        let lines = toast_lines(&toast, 30);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "失败 (400)");
    }
}
