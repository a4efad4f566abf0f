/// Resolved position of a requested page within a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub(crate) page: i64,
    pub(crate) page_size: i64,
    pub(crate) total_count: i64,
    pub(crate) total_pages: i64,
}

impl PageWindow {
    /// A missing or non-numeric page is page 1. Numbers outside the range
    /// (including zero and negatives) land on the last page. An empty set
    /// still has one page.
    pub(crate) fn resolve(requested: Option<&str>, page_size: i64, total_count: i64) -> Self {
        let page_size = page_size.max(1);
        let total_count = total_count.max(0);
        let total_pages = ((total_count + page_size - 1) / page_size).max(1);

        let page = match requested.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(number)) if number < 1 || number > total_pages => total_pages,
            Some(Ok(number)) => number,
        };

        Self { page, page_size, total_count, total_pages }
    }

    pub(crate) fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    pub(crate) fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub(crate) fn has_previous(&self) -> bool {
        self.page > 1
    }
}
