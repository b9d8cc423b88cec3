//! Generic tables: column definitions, cell rendering and list-page state.

mod columns;
mod list;
mod pagination;

use std::fmt;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::i18n::{Locale, Msg};

pub use columns::{datasource_columns, strategy_columns, strategy_group_columns, team_columns};
pub use list::{ListPage, ListRow};
pub use pagination::{PAGE_SIZES, PageButton, Pagination};

/// One table column. Raw columns print a field as-is; rendered columns
/// format the whole row and may depend on the locale.
pub enum Column<T> {
    Raw {
        header: Msg,
        min_width: u16,
        accessor: fn(&T) -> String,
    },
    Rendered {
        header: Msg,
        min_width: u16,
        render: fn(&T, Locale) -> String,
    },
}

impl<T> Column<T> {
    pub fn raw(header: Msg, min_width: u16, accessor: fn(&T) -> String) -> Self {
        Column::Raw {
            header,
            min_width,
            accessor,
        }
    }

    pub fn rendered(header: Msg, min_width: u16, render: fn(&T, Locale) -> String) -> Self {
        Column::Rendered {
            header,
            min_width,
            render,
        }
    }

    pub fn header(&self, locale: Locale) -> &'static str {
        match self {
            Column::Raw { header, .. } | Column::Rendered { header, .. } => locale.text(*header),
        }
    }

    pub fn min_width(&self) -> u16 {
        match self {
            Column::Raw { min_width, .. } | Column::Rendered { min_width, .. } => *min_width,
        }
    }

    pub fn cell(&self, row: &T, locale: Locale) -> String {
        match self {
            Column::Raw { accessor, .. } => accessor(row),
            Column::Rendered { render, .. } => render(row, locale),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Column::Raw { .. } => "Raw",
            Column::Rendered { .. } => "Rendered",
        };
        f.debug_struct("Column")
            .field("kind", &kind)
            .field("header", &self.header(Locale::EnUs))
            .finish()
    }
}

/// Column set plus the optional trailing action column.
#[derive(Debug)]
pub struct TableSpec<T> {
    pub columns: Vec<Column<T>>,
    pub row_action: Option<Msg>,
}

impl<T> TableSpec<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            row_action: None,
        }
    }

    pub fn with_row_action(mut self, label: Msg) -> Self {
        self.row_action = Some(label);
        self
    }

    pub fn headers(&self, locale: Locale) -> Vec<&'static str> {
        let mut headers: Vec<_> = self.columns.iter().map(|column| column.header(locale)).collect();
        if self.row_action.is_some() {
            headers.push(locale.text(Msg::Operation));
        }
        headers
    }

    pub fn cells(&self, row: &T, locale: Locale) -> Vec<String> {
        let mut cells: Vec<_> = self
            .columns
            .iter()
            .map(|column| column.cell(row, locale))
            .collect();
        if let Some(action) = self.row_action {
            cells.push(locale.text(action).to_string());
        }
        cells
    }

    /// Display widths per column: the widest of header, cells and the
    /// column minimum.
    pub fn widths(&self, rows: &[T], locale: Locale) -> Vec<u16> {
        let mut widths: Vec<u16> = self
            .columns
            .iter()
            .map(|column| column.min_width().max(display_width(column.header(locale))))
            .collect();
        if self.row_action.is_some() {
            widths.push(display_width(locale.text(Msg::Operation)));
        }
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(self.cells(row, locale)) {
                *width = (*width).max(display_width(&cell));
            }
        }
        widths
    }
}

fn display_width(text: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(text)).unwrap_or(u16::MAX)
}

/// Cuts `text` to at most `width` terminal columns, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Status, TeamItem};

    fn team(name: &str) -> TeamItem {
        TeamItem {
            id: 1,
            name: name.into(),
            logo: String::new(),
            remark: String::new(),
            status: Status::Disable,
        }
    }

    #[test]
    fn rendered_columns_follow_the_locale() {
        let spec = TableSpec::new(vec![
            Column::raw(Msg::FieldName, 4, |row: &TeamItem| row.name.clone()),
            Column::rendered(Msg::FieldStatus, 4, |row: &TeamItem, locale| {
                row.status.label(locale).to_string()
            }),
        ])
        .with_row_action(Msg::Confirm);
        let row = team("ops");
        assert_eq!(spec.cells(&row, Locale::EnUs), vec!["ops", "Disabled", "Confirm"]);
        assert_eq!(spec.cells(&row, Locale::ZhCn)[1], "禁用");
        assert_eq!(spec.headers(Locale::EnUs).last(), Some(&"Operation"));
    }

    #[test]
    fn widths_account_for_wide_characters() {
        let spec = TableSpec::new(vec![Column::raw(Msg::FieldName, 2, |row: &TeamItem| {
            row.name.clone()
        })]);
        assert_eq!(spec.widths(&[team("运维团队")], Locale::EnUs), vec![8]);
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("运维团队", 5), "运维…");
    }
}
