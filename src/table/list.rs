use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use crate::{
    api::{ApiError, ListQuery},
    domain::{DatasourceItem, ListReply, StrategyGroupItem, StrategyItem, TeamItem},
    lookup::{Clock, Debouncer, RequestId},
};

use super::pagination::Pagination;

/// Rows that can be opened in an edit dialog.
pub trait ListRow: Clone + Send + 'static {
    fn row_id(&self) -> u64;
}

macro_rules! list_row {
    ($($ty:ty),*) => {
        $(impl ListRow for $ty {
            fn row_id(&self) -> u64 {
                self.id
            }
        })*
    };
}

list_row!(TeamItem, DatasourceItem, StrategyGroupItem, StrategyItem);

/// Query, rows and selection of one list page. Every query change goes
/// through the debouncer so typing in the search box issues one fetch.
#[derive(Debug)]
pub struct ListPage<T> {
    keyword: String,
    pagination: Pagination,
    rows: Vec<T>,
    selected: usize,
    fetch: Debouncer,
    in_flight: Option<RequestId>,
}

impl<T: ListRow> ListPage<T> {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut page = Self {
            keyword: String::new(),
            pagination: Pagination::default(),
            rows: Vec::new(),
            selected: 0,
            fetch: Debouncer::new(window, clock),
            in_flight: None,
        };
        page.fetch.trigger();
        page
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&T> {
        self.rows.get(self.selected)
    }

    pub fn select(&mut self, delta: i32) {
        if self.rows.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.rows.len() - 1;
        self.selected = if delta.is_negative() {
            self.selected.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (self.selected + delta as usize).min(last)
        };
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some() || self.fetch.is_pending()
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            keyword: self.keyword.trim().to_string(),
            pagination: self.pagination.request(),
        }
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        if keyword == self.keyword {
            return;
        }
        self.keyword = keyword;
        self.pagination.page = 1;
        self.fetch.trigger();
    }

    pub fn go_to(&mut self, page: u32) {
        if self.pagination.go_to(page) {
            self.fetch.trigger();
        }
    }

    pub fn prev_page(&mut self) {
        if self.pagination.prev() {
            self.fetch.trigger();
        }
    }

    pub fn next_page(&mut self) {
        if self.pagination.next() {
            self.fetch.trigger();
        }
    }

    pub fn cycle_page_size(&mut self) {
        if self.pagination.cycle_page_size() {
            self.fetch.trigger();
        }
    }

    /// Refetches with the current query, e.g. after a dialog saved.
    pub fn refresh(&mut self) {
        self.fetch.trigger();
    }

    /// The fetch to issue once the query has been quiet long enough.
    pub fn poll(&mut self) -> Option<(RequestId, ListQuery)> {
        let id = self.fetch.poll()?;
        self.in_flight = Some(id);
        Some((id, self.query()))
    }

    /// Applies a list answer. Returns `Ok(false)` for superseded answers.
    pub fn apply(
        &mut self,
        id: RequestId,
        result: Result<ListReply<T>, ApiError>,
    ) -> Result<bool, ApiError> {
        if !self.fetch.is_current(id) {
            debug!(%id, "discarding stale list page");
            return Ok(false);
        }
        self.in_flight = None;
        let reply = result.inspect_err(|err| warn!(error = %err, "list fetch failed"))?;
        self.pagination.absorb(&reply.pagination);
        self.rows = reply.list;
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{PaginationReply, Status},
        lookup::ManualClock,
    };

    fn team(id: u64) -> TeamItem {
        TeamItem {
            id,
            name: format!("team-{id}"),
            logo: String::new(),
            remark: String::new(),
            status: Status::Enable,
        }
    }

    fn page() -> (ManualClock, ListPage<TeamItem>) {
        let clock = ManualClock::new();
        let page = ListPage::new(Duration::from_millis(200), Arc::new(clock.clone()));
        (clock, page)
    }

    #[test]
    fn typing_issues_a_single_fetch() {
        let (clock, mut page) = page();
        for (at, keyword) in [(0, "o"), (50, "op"), (100, "ops")] {
            clock.set(Duration::from_millis(at));
            page.set_keyword(keyword);
            assert!(page.poll().is_none());
        }
        clock.set(Duration::from_millis(300));
        let (_, query) = page.poll().unwrap();
        assert_eq!(query.keyword, "ops");
        assert!(page.poll().is_none());
    }

    #[test]
    fn only_the_latest_answer_updates_the_rows() {
        let (clock, mut page) = page();
        clock.advance(Duration::from_millis(200));
        let (first, _) = page.poll().unwrap();
        page.refresh();
        clock.advance(Duration::from_millis(200));
        let (second, _) = page.poll().unwrap();

        let reply = ListReply {
            list: vec![team(1), team(2)],
            pagination: PaginationReply {
                page_num: 1,
                page_size: 10,
                total: 2,
            },
        };
        assert_eq!(page.apply(second, Ok(reply)), Ok(true));
        assert_eq!(page.apply(first, Ok(ListReply::default())), Ok(false));
        assert_eq!(page.rows().len(), 2);
        assert_eq!(page.pagination().total, 2);
        assert!(!page.is_loading());
    }

    #[test]
    fn keyword_change_returns_to_the_first_page() {
        let (_, mut page) = page();
        page.pagination.total = 100;
        page.go_to(3);
        page.set_keyword("db");
        assert_eq!(page.query().pagination.page_num, 1);
    }
}
