use serde::Serialize;

/// 1-based page cursor over a list whose length may change between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pager {
    page: usize,
    per_page: usize,
}

impl Pager {
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of pages for `total` items; an empty list still has one page.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.per_page).max(1)
    }

    pub fn go_to(&mut self, page: usize, total: usize) {
        self.page = page.clamp(1, self.page_count(total));
    }

    pub fn next(&mut self, total: usize) {
        self.go_to(self.page + 1, total);
    }

    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.page < self.page_count(total)
    }

    /// The stored page, pulled back to the last page if the list shrank.
    fn effective_page(&self, total: usize) -> usize {
        self.page.min(self.page_count(total))
    }

    /// Items on the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let page = self.effective_page(items.len());
        let start = ((page - 1) * self.per_page).min(items.len());
        let end = (start + self.per_page).min(items.len());
        &items[start..end]
    }

    /// e.g. `Showing 11 to 20 of 37 files`
    pub fn summary(&self, total: usize) -> String {
        if total == 0 {
            return "Showing 0 to 0 of 0 files".to_string();
        }
        let page = self.effective_page(total);
        let first = (page - 1) * self.per_page + 1;
        let last = (page * self.per_page).min(total);
        format!("Showing {first} to {last} of {total} files")
    }

    /// e.g. `Page 2 of 4`
    pub fn label(&self, total: usize) -> String {
        format!(
            "Page {} of {}",
            self.effective_page(total),
            self.page_count(total)
        )
    }
}
