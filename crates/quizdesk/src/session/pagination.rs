//! Table paging over the already-paginated session API.
//!
//! The API has no total count, so each page asks for one row more than it
//! shows; the extra row only signals that another page exists.

use serde::Deserialize;

use quizdesk_protocol::Session;

/// Page sizes offered by the table.
pub const PAGE_SIZE_OPTIONS: [u32; 5] = [10, 25, 50, 100, 200];

/// Page size used when none (or an unsupported one) is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Raw `page` / `per_page` query parameters. Kept as text so a malformed
/// link falls back to defaults instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableParams {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub per_page: Option<String>,
}

/// A normalized page request. `page` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Build a request, replacing an unsupported page size with the default.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page: normalize_page_size(per_page, DEFAULT_PAGE_SIZE),
        }
    }

    /// Parse query parameters. `default_per_page` must itself be one of
    /// [`PAGE_SIZE_OPTIONS`]; otherwise [`DEFAULT_PAGE_SIZE`] is used.
    pub fn from_params(params: &TableParams, default_per_page: u32) -> Self {
        let fallback = normalize_page_size(default_per_page, DEFAULT_PAGE_SIZE);
        let page = params
            .page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(0);
        let per_page = params
            .per_page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .map(|p| normalize_page_size(p, fallback))
            .unwrap_or(fallback);
        Self { page, per_page }
    }

    /// Rows to skip upstream.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.per_page)
    }

    /// Rows to fetch upstream, including the look-ahead row.
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page) + 1
    }

    /// One-based serial number of the row at `index` on this page.
    pub fn serial_number(&self, index: usize) -> u64 {
        self.offset() + index as u64 + 1
    }

    /// Query string selecting `page` with this request's page size.
    pub fn query_for(&self, page: u32) -> String {
        format!("?page={}&per_page={}", page, self.per_page)
    }
}

fn normalize_page_size(size: u32, fallback: u32) -> u32 {
    if PAGE_SIZE_OPTIONS.contains(&size) {
        size
    } else {
        fallback
    }
}

/// One page of sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub request: PageRequest,
    pub items: Vec<Session>,
    pub has_more: bool,
}

impl TablePage {
    /// Build a page from rows fetched with [`PageRequest::limit`]. A surplus
    /// row means another page exists; it is dropped from the items.
    pub fn from_fetched(mut rows: Vec<Session>, request: PageRequest) -> Self {
        let per_page = request.per_page as usize;
        let has_more = rows.len() > per_page;
        rows.truncate(per_page);
        Self {
            request,
            items: rows,
            has_more,
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self {
            request,
            items: Vec::new(),
            has_more: false,
        }
    }

    /// Pages known to exist: everything up to the current one, plus one more
    /// when the look-ahead row was present.
    pub fn page_count(&self) -> u32 {
        if self.has_more {
            self.request.page + 2
        } else {
            self.request.page + 1
        }
    }

    pub fn previous_page(&self) -> Option<u32> {
        self.request.page.checked_sub(1)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_more.then_some(self.request.page + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Session> {
        (0..n)
            .map(|i| Session {
                id: Some(i as i64),
                ..Default::default()
            })
            .collect()
    }

    fn params(page: Option<&str>, per_page: Option<&str>) -> TableParams {
        TableParams {
            page: page.map(str::to_string),
            per_page: per_page.map(str::to_string),
        }
    }

    #[test]
    fn test_offset_and_limit() {
        let request = PageRequest::new(3, 25);
        assert_eq!(request.offset(), 75);
        assert_eq!(request.limit(), 26);
    }

    #[test]
    fn test_unsupported_page_size_falls_back() {
        assert_eq!(PageRequest::new(0, 7).per_page, DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::new(0, 200).per_page, 200);
    }

    #[test]
    fn test_from_params_defaults_and_garbage() {
        let request = PageRequest::from_params(&params(None, None), 50);
        assert_eq!(request, PageRequest { page: 0, per_page: 50 });

        let request = PageRequest::from_params(&params(Some("abc"), Some("-1")), 25);
        assert_eq!(request, PageRequest { page: 0, per_page: 25 });

        let request = PageRequest::from_params(&params(Some("4"), Some("100")), 25);
        assert_eq!(request, PageRequest { page: 4, per_page: 100 });
    }

    #[test]
    fn test_from_params_rejects_unsupported_default() {
        let request = PageRequest::from_params(&params(None, Some("33")), 33);
        assert_eq!(request.per_page, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_look_ahead_row_sets_has_more_and_is_dropped() {
        let request = PageRequest::new(0, 10);
        let page = TablePage::from_fetched(rows(11), request);
        assert!(page.has_more);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.items.last().and_then(|s| s.id), Some(9));
    }

    #[test]
    fn test_short_page_has_no_more() {
        let page = TablePage::from_fetched(rows(10), PageRequest::new(2, 10));
        assert!(!page.has_more);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.next_page(), None);
    }

    #[test]
    fn test_page_count() {
        let more = TablePage::from_fetched(rows(11), PageRequest::new(0, 10));
        assert_eq!(more.page_count(), 2);

        let last = TablePage::from_fetched(rows(3), PageRequest::new(4, 10));
        assert_eq!(last.page_count(), 5);

        assert_eq!(TablePage::empty(PageRequest::new(0, 10)).page_count(), 1);
    }

    #[test]
    fn test_neighbour_pages() {
        let first = TablePage::from_fetched(rows(11), PageRequest::new(0, 10));
        assert_eq!(first.previous_page(), None);
        assert_eq!(first.next_page(), Some(1));

        let middle = TablePage::from_fetched(rows(11), PageRequest::new(3, 10));
        assert_eq!(middle.previous_page(), Some(2));
        assert_eq!(middle.next_page(), Some(4));
    }

    #[test]
    fn test_serial_numbers_continue_across_pages() {
        let request = PageRequest::new(2, 25);
        assert_eq!(request.serial_number(0), 51);
        assert_eq!(request.serial_number(24), 75);
    }

    #[test]
    fn test_query_for_keeps_page_size() {
        assert_eq!(PageRequest::new(1, 25).query_for(2), "?page=2&per_page=25");
    }
}
