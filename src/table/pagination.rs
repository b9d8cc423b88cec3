use crate::domain::{PaginationReply, PaginationReq};

pub const PAGE_SIZES: [u32; 3] = [10, 20, 50];

const VISIBLE_BUTTONS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page(u32),
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            total: 0,
            page: 1,
            page_size: PAGE_SIZES[0],
        }
    }
}

impl Pagination {
    pub fn new(total: u64, page: u32, page_size: u32) -> Self {
        Self {
            total,
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn page_count(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.page_size.max(1)));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Buttons shown between prev and next, at most seven.
    pub fn buttons(&self) -> Vec<PageButton> {
        let count = self.page_count();
        let page = self.page;
        if count <= VISIBLE_BUTTONS {
            return (1..=count).map(PageButton::Page).collect();
        }
        let pages = |range: std::ops::RangeInclusive<u32>| range.map(PageButton::Page);
        let mut buttons = Vec::with_capacity(VISIBLE_BUTTONS as usize);
        if page <= 4 {
            buttons.extend(pages(1..=5));
            buttons.push(PageButton::Ellipsis);
            buttons.push(PageButton::Page(count));
        } else if page >= count - 3 {
            buttons.push(PageButton::Page(1));
            buttons.push(PageButton::Ellipsis);
            buttons.extend(pages(count - 4..=count));
        } else {
            buttons.push(PageButton::Page(1));
            buttons.push(PageButton::Ellipsis);
            buttons.extend(pages(page - 1..=page + 1));
            buttons.push(PageButton::Ellipsis);
            buttons.push(PageButton::Page(count));
        }
        buttons
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    /// Moves to `page` when it exists. Returns whether the page changed.
    pub fn go_to(&mut self, page: u32) -> bool {
        let last = self.page_count().max(1);
        let page = page.clamp(1, last);
        if page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn prev(&mut self) -> bool {
        self.has_prev() && self.go_to(self.page - 1)
    }

    pub fn next(&mut self) -> bool {
        self.has_next() && self.go_to(self.page + 1)
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, size: u32) -> bool {
        if size == 0 || size == self.page_size {
            return false;
        }
        self.page_size = size;
        self.page = 1;
        true
    }

    /// Next entry of [`PAGE_SIZES`], wrapping around.
    pub fn cycle_page_size(&mut self) -> bool {
        let position = PAGE_SIZES.iter().position(|size| *size == self.page_size);
        let next = match position {
            Some(index) => PAGE_SIZES[(index + 1) % PAGE_SIZES.len()],
            None => PAGE_SIZES[0],
        };
        self.set_page_size(next)
    }

    pub fn request(&self) -> PaginationReq {
        PaginationReq {
            page_num: self.page,
            page_size: self.page_size,
        }
    }

    /// Takes the total from a list reply; the requested page stays.
    pub fn absorb(&mut self, reply: &PaginationReply) {
        self.total = reply.total;
    }
}
