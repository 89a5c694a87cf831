//! # Pagination
//!
//! [`PageRequest`] is a validated offset/limit window plus sort orders, and
//! [`Page`] is one window of results.
//!
//! [`execute_page`] builds a `Page` from already-fetched content and only
//! runs the total-count query when the content cannot prove the total:
//!
//! | situation                                   | total              |
//! |---------------------------------------------|--------------------|
//! | first page, fewer rows than the limit       | `len`              |
//! | later page, between 1 and `limit - 1` rows  | `offset + len`     |
//! | full page, or an empty page past the first  | count query        |

use axum::http::header::HeaderMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::filtering::SortOrder;
use crate::validation::{ValidationError, ValidationErrors, validators::validate_range};

/// Page size used when a request does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Upper bound for requested page sizes.
pub const MAX_PAGE_SIZE: u64 = 2000;

/// Largest offset or limit a window may carry; stores bind both as `i64`.
const MAX_WINDOW_BOUND: u64 = i64::MAX.unsigned_abs();

/// Offset/limit window with sort orders.
///
/// Only constructible through validating constructors, so a held value
/// always has `limit >= 1` and both bounds fit in an `i64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    offset: u64,
    limit: u64,
    sort: Vec<SortOrder>,
}

impl PageRequest {
    /// Window starting at row `offset` with at most `limit` rows.
    ///
    /// # Errors
    ///
    /// Fails for a negative `offset` or a `limit` below 1.
    pub fn new(offset: i64, limit: i64) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validate_range("offset", offset, Some(0), None));
        errors.check(validate_range("limit", limit, Some(1), None));
        errors.result()?;

        Ok(Self {
            offset: offset.unsigned_abs(),
            limit: limit.unsigned_abs(),
            sort: Vec::new(),
        })
    }

    /// Zero-based page `page` of `size` rows.
    ///
    /// # Errors
    ///
    /// Fails for a negative `page`, a `size` below 1, or an offset that
    /// does not fit in an `i64`.
    pub fn of(page: i64, size: i64) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validate_range("page", page, Some(0), None));
        errors.check(validate_range("size", size, Some(1), None));
        errors.result()?;

        let offset = page.checked_mul(size).ok_or_else(|| {
            ValidationErrors::from(ValidationError::new("page", "Page offset is too large"))
        })?;
        Self::new(offset, size)
    }

    #[must_use]
    pub fn with_sort(mut self, sort: impl IntoIterator<Item = SortOrder>) -> Self {
        self.sort.extend(sort);
        self
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    #[must_use]
    pub fn sort(&self) -> &[SortOrder] {
        &self.sort
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page_number(&self) -> u64 {
        self.offset / self.limit
    }

    /// The window right after this one, same size and sort. The offset
    /// stops at `i64::MAX`.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit).min(MAX_WINDOW_BOUND),
            limit: self.limit,
            sort: self.sort.clone(),
        }
    }

    /// Same window with one extra row, used to detect a following page
    /// without counting.
    #[must_use]
    pub(crate) fn lookahead(&self) -> Self {
        Self {
            offset: self.offset,
            limit: self.limit.saturating_add(1).min(MAX_WINDOW_BOUND),
            sort: self.sort.clone(),
        }
    }
}

/// One window of results.
///
/// `total_count` is `Some` only when the total was computed; a slice
/// leaves it out and only knows whether a following page exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub offset: u64,
    pub limit: u64,
    pub total_count: Option<u64>,
    pub has_next: bool,
}

fn len_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

impl<T> Page<T> {
    /// Page with a known total.
    #[must_use]
    pub fn new(content: Vec<T>, request: &PageRequest, total_count: u64) -> Self {
        let end = request.offset().saturating_add(len_u64(content.len()));
        Self {
            content,
            offset: request.offset(),
            limit: request.limit(),
            total_count: Some(total_count),
            has_next: end < total_count,
        }
    }

    /// Page without a total.
    #[must_use]
    pub fn slice(content: Vec<T>, request: &PageRequest, has_next: bool) -> Self {
        Self {
            content,
            offset: request.offset(),
            limit: request.limit(),
            total_count: None,
            has_next,
        }
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.offset > 0
    }

    #[must_use]
    pub const fn is_first(&self) -> bool {
        !self.has_previous()
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        !self.has_next
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.offset / self.limit
    }

    #[must_use]
    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    /// `None` when the total is unknown.
    #[must_use]
    pub fn total_pages(&self) -> Option<u64> {
        self.total_count.map(|total| total.div_ceil(self.limit))
    }

    /// Convert the content, keeping the window and totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            offset: self.offset,
            limit: self.limit,
            total_count: self.total_count,
            has_next: self.has_next,
        }
    }
}

/// Total derivable from the fetched content alone, if any.
#[must_use]
pub const fn total_from_content(offset: u64, limit: u64, len: u64) -> Option<u64> {
    if offset == 0 && len < limit {
        return Some(len);
    }
    if len != 0 && len < limit {
        return Some(offset.saturating_add(len));
    }
    None
}

/// Build a [`Page`], running `count` only when the content cannot prove the
/// total. A failing count fails the whole page.
///
/// # Errors
///
/// Propagates the error of `count`.
pub async fn execute_page<T, E, F, Fut>(
    content: Vec<T>,
    request: &PageRequest,
    count: F,
) -> Result<Page<T>, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<u64, E>>,
{
    let len = len_u64(content.len());
    let total = if let Some(total) = total_from_content(request.offset(), request.limit(), len) {
        tracing::debug!(
            offset = request.offset(),
            limit = request.limit(),
            total,
            "count query skipped"
        );
        total
    } else {
        let total = count().await?;
        tracing::debug!(
            offset = request.offset(),
            limit = request.limit(),
            total,
            "count query executed"
        );
        total
    };
    Ok(Page::new(content, request, total))
}

/// Resource name with non-ASCII and control characters removed, safe for a
/// header value.
fn sanitize_resource_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

/// `Content-Range` header for a page with a known total, e.g.
/// `members 0-2/4`. An empty page yields `members */4`.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    len: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let safe_name = sanitize_resource_name(resource_name);
    let content_range = if len == 0 {
        format!("{safe_name} */{total_count}")
    } else {
        let last = offset.saturating_add(len - 1);
        format!("{safe_name} {offset}-{last}/{total_count}")
    };

    let mut headers = HeaderMap::new();
    if let Ok(value) = content_range.parse() {
        headers.insert("Content-Range", value);
    }
    headers
}
