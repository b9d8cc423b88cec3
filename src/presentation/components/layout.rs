use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A `width` x `height` rectangle centred in `area`, clipped to it.
pub fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    horizontal[1]
}

pub fn percent_rect(area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    let width = (area.width as u32 * width_pct.min(100) as u32 / 100) as u16;
    let height = (area.height as u32 * height_pct.min(100) as u32 / 100) as u16;
    popup_rect(area, width, height)
}

/// First row index to draw so that `selected` stays inside a window of
/// `visible` rows.
pub fn scroll_offset(selected: usize, visible: usize, previous: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    if selected < previous {
        selected
    } else if selected >= previous + visible {
        selected + 1 - visible
    } else {
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_is_centred_and_clipped() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(popup_rect(area, 20, 4), Rect::new(10, 3, 20, 4));
        assert_eq!(popup_rect(area, 80, 40), area);
    }

    #[test]
    fn scroll_follows_the_selection() {
        assert_eq!(scroll_offset(0, 5, 0), 0);
        assert_eq!(scroll_offset(7, 5, 0), 3);
        assert_eq!(scroll_offset(2, 5, 3), 2);
        assert_eq!(scroll_offset(4, 0, 2), 0);
    }
}
