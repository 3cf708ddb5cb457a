// Listing state and load bookkeeping types.

use std::sync::Arc;

use holocron_api::{PageQuery, Record};
use serde::Serialize;

use crate::error::CoreError;
use crate::sort::{SortDescriptor, SortDirection, SortField};

/// Page size used when neither the caller nor configuration names one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// ── LoadParams ───────────────────────────────────────────────────────

/// Arguments to [`DataSource::load`](super::DataSource::load).
///
/// Every field is optional. Omitted values mean page 1, the last used page
/// size, no sort and no search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<SortDescriptor>,
    pub search: String,
}

impl LoadParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based page number. `0` is treated as `1`.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Records per page. `0` keeps the last used size.
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: Option<SortDescriptor>) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn sorted_by(self, field: impl Into<SortField>, direction: SortDirection) -> Self {
        self.sort(Some(SortDescriptor::new(field.into(), direction)))
    }

    /// Name filter. Empty means no filter.
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }
}

// ── Phase & outcome ──────────────────────────────────────────────────

/// Where the Data Source is in its load cycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// How a single `load` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Rows and count were published.
    Loaded { rows: Arc<Vec<Record>>, total: u64 },
    /// The request failed; the listing was cleared and the error's
    /// user message published.
    Errored(CoreError),
    /// A newer `load` or a `reset` made this response stale. Nothing published.
    Superseded,
    /// The source was torn down while the request was in flight.
    Cancelled,
    /// `load` was called after teardown.
    Ignored,
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

// ── ListingState ─────────────────────────────────────────────────────

/// Everything the Data Source publishes, as one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingState {
    pub page: u32,
    pub page_size: u32,
    pub sort: Option<SortDescriptor>,
    pub search: String,
    pub loading: bool,
    pub count: u64,
    pub rows: Arc<Vec<Record>>,
    pub phase: LoadPhase,
    /// UI-facing message from the last failed load.
    pub error: Option<String>,
}

impl ListingState {
    pub(crate) fn initial(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            sort: None,
            search: String::new(),
            loading: false,
            count: 0,
            rows: Arc::new(Vec::new()),
            phase: LoadPhase::Idle,
            error: None,
        }
    }

    /// Number of pages at the current page size.
    pub fn total_pages(&self) -> u64 {
        self.count.div_ceil(u64::from(self.page_size.max(1)))
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    /// Remote query for the recorded page, size and sort.
    pub(crate) fn query(&self) -> PageQuery {
        let query = PageQuery::new(self.page, self.page_size);
        match &self.sort {
            Some(sort) => query.sorted(sort.field.as_str(), sort.direction),
            None => query,
        }
    }
}
