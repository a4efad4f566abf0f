use serde::Serialize;

use crate::services::paging::PageWindow;

#[derive(Debug, Serialize)]
pub(crate) struct PaginatedResponse<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total_count: i64,
    pub(crate) page: i64,
    pub(crate) page_size: i64,
    pub(crate) total_pages: i64,
    pub(crate) has_next: bool,
    pub(crate) has_previous: bool,
}

impl<T> PaginatedResponse<T> {
    pub(crate) fn new(items: Vec<T>, window: &PageWindow) -> Self {
        Self {
            items,
            total_count: window.total_count,
            page: window.page,
            page_size: window.page_size,
            total_pages: window.total_pages,
            has_next: window.has_next(),
            has_previous: window.has_previous(),
        }
    }
}
