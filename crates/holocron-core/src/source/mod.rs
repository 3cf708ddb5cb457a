// ── Paginated Data Source ──
//
// Owns the listing state, drives remote loads on spawned tasks, and
// publishes every piece of state on its own replay-latest channel.
//
// Each load is tagged with a sequence number. Only the response to the
// newest load (or the newest reset) may touch published state; anything
// older is discarded on arrival.

mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use holocron_api::{Listing, PageQuery, Record};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use state::{DEFAULT_PAGE_SIZE, ListingState, LoadOutcome, LoadParams, LoadPhase};

use crate::config::ArchiveConfig;
use crate::error::CoreError;
use crate::remote::ListSource;
use crate::sort::{SortDescriptor, sort_records};
use crate::stream::Observed;

/// Paged, sortable, searchable view over a remote list.
///
/// Must be used from within a Tokio runtime: [`load`](Self::load) spawns
/// the request. Dropping the source tears it down.
pub struct DataSource<C: ListSource> {
    shared: Arc<Shared<C>>,
}

struct Shared<C> {
    client: C,
    default_page_size: u32,
    inner: Mutex<Inner>,
    /// Id of the newest load or reset. Responses tagged otherwise are stale.
    sequence: AtomicU64,
    cancel: CancellationToken,
}

struct Inner {
    state: ListingState,
    /// `None` once torn down.
    publishers: Option<Publishers>,
}

struct LoadRequest {
    sequence: u64,
    query: PageQuery,
    search: String,
    sort: Option<SortDescriptor>,
}

impl DataSource<holocron_api::ArchiveClient> {
    /// Build a source backed by a real archive client.
    pub fn from_config(config: &ArchiveConfig) -> Result<Self, CoreError> {
        Ok(Self::with_page_size(config.build_client()?, config.page_size))
    }
}

impl<C: ListSource> DataSource<C> {
    pub fn new(client: C) -> Self {
        Self::with_page_size(client, DEFAULT_PAGE_SIZE)
    }

    /// Use `page_size` whenever a load does not name one. `0` means the
    /// built-in default.
    pub fn with_page_size(client: C, page_size: u32) -> Self {
        let default_page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        let state = ListingState::initial(default_page_size);
        let publishers = Publishers::new(&state);

        Self {
            shared: Arc::new(Shared {
                client,
                default_page_size,
                inner: Mutex::new(Inner {
                    state,
                    publishers: Some(publishers),
                }),
                sequence: AtomicU64::new(0),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn client(&self) -> &C {
        &self.shared.client
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Start loading a page.
    ///
    /// Loading state and the requested page/size/sort/search are published
    /// before this returns. The remote call runs on a spawned task whose
    /// handle reports how the load ended; awaiting it is optional.
    pub fn load(&self, params: LoadParams) -> JoinHandle<LoadOutcome> {
        let Some(request) = self.shared.begin(params) else {
            return tokio::spawn(async { LoadOutcome::Ignored });
        };
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move { shared.run(request).await })
    }

    /// Return to the initial empty state. Loads still in flight are
    /// discarded when they complete.
    pub fn reset(&self) {
        let mut inner = self.shared.lock();
        if inner.publishers.is_none() {
            return;
        }
        self.shared.sequence.fetch_add(1, Ordering::SeqCst);
        inner.state = ListingState::initial(self.shared.default_page_size);
        inner.publish();
        debug!("listing reset");
    }

    /// Cancel in-flight loads and close every channel. Idempotent.
    pub fn teardown(&self) {
        let mut inner = self.shared.lock();
        if inner.publishers.take().is_some() {
            self.shared.cancel.cancel();
            debug!("data source torn down");
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.shared.lock().publishers.is_none()
    }

    // ── Synchronous accessors ────────────────────────────────────────

    pub fn current_rows(&self) -> Arc<Vec<Record>> {
        Arc::clone(&self.shared.lock().state.rows)
    }

    pub fn current_page(&self) -> u32 {
        self.shared.lock().state.page
    }

    pub fn current_page_size(&self) -> u32 {
        self.shared.lock().state.page_size
    }

    pub fn current_sort(&self) -> Option<SortDescriptor> {
        self.shared.lock().state.sort.clone()
    }

    pub fn current_search(&self) -> String {
        self.shared.lock().state.search.clone()
    }

    pub fn current_count(&self) -> u64 {
        self.shared.lock().state.count
    }

    pub fn is_loading(&self) -> bool {
        self.shared.lock().state.loading
    }

    pub fn current_phase(&self) -> LoadPhase {
        self.shared.lock().state.phase
    }

    /// All current state in one consistent copy.
    pub fn snapshot(&self) -> ListingState {
        self.shared.lock().state.clone()
    }

    // ── Channels ─────────────────────────────────────────────────────

    pub fn rows(&self) -> Observed<Arc<Vec<Record>>> {
        self.observe(|p| &p.rows, |s| Arc::clone(&s.rows))
    }

    pub fn loading(&self) -> Observed<bool> {
        self.observe(|p| &p.loading, |s| s.loading)
    }

    pub fn count(&self) -> Observed<u64> {
        self.observe(|p| &p.count, |s| s.count)
    }

    pub fn page(&self) -> Observed<u32> {
        self.observe(|p| &p.page, |s| s.page)
    }

    pub fn page_size(&self) -> Observed<u32> {
        self.observe(|p| &p.page_size, |s| s.page_size)
    }

    pub fn sort(&self) -> Observed<Option<SortDescriptor>> {
        self.observe(|p| &p.sort, |s| s.sort.clone())
    }

    pub fn search(&self) -> Observed<String> {
        self.observe(|p| &p.search, |s| s.search.clone())
    }

    pub fn phase(&self) -> Observed<LoadPhase> {
        self.observe(|p| &p.phase, |s| s.phase)
    }

    /// UI-facing message of the last failed load, cleared by the next load.
    pub fn error(&self) -> Observed<Option<String>> {
        self.observe(|p| &p.error, |s| s.error.clone())
    }

    fn observe<T: Clone + Send + Sync + 'static>(
        &self,
        sender: impl FnOnce(&Publishers) -> &watch::Sender<T>,
        fallback: impl FnOnce(&ListingState) -> T,
    ) -> Observed<T> {
        let inner = self.shared.lock();
        match &inner.publishers {
            Some(publishers) => Observed::new(sender(publishers).subscribe()),
            None => Observed::closed(fallback(&inner.state)),
        }
    }
}

impl<C: ListSource> Drop for DataSource<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ── Load cycle ───────────────────────────────────────────────────────

impl<C: ListSource> Shared<C> {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the request and publish the loading state.
    fn begin(&self, params: LoadParams) -> Option<LoadRequest> {
        let mut inner = self.lock();
        if inner.publishers.is_none() {
            debug!("load ignored after teardown");
            return None;
        }

        let page = params.page.unwrap_or(1).max(1);
        let page_size = match params.page_size {
            Some(size) if size > 0 => size,
            _ => inner.state.page_size,
        };
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let state = &mut inner.state;
        state.page = page;
        state.page_size = page_size;
        state.sort = params.sort;
        state.search = params.search;
        state.loading = true;
        state.phase = LoadPhase::Loading;
        state.error = None;

        let request = LoadRequest {
            sequence,
            query: state.query(),
            search: state.search.clone(),
            sort: state.sort.clone(),
        };
        inner.publish();
        debug!(sequence, page, page_size, search = %request.search, "load started");
        Some(request)
    }

    async fn run(&self, request: LoadRequest) -> LoadOutcome {
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            result = self.fetch(&request) => Some(result),
        };
        match result {
            Some(result) => self.finish(&request, result),
            None => {
                debug!(sequence = request.sequence, "load cancelled");
                LoadOutcome::Cancelled
            }
        }
    }

    async fn fetch(&self, request: &LoadRequest) -> Result<Listing, CoreError> {
        if request.search.is_empty() {
            self.client.fetch_page(&request.query).await
        } else {
            self.client.search(&request.search, &request.query).await
        }
    }

    fn finish(&self, request: &LoadRequest, result: Result<Listing, CoreError>) -> LoadOutcome {
        let mut inner = self.lock();
        if inner.publishers.is_none() {
            return LoadOutcome::Cancelled;
        }
        if self.sequence.load(Ordering::SeqCst) != request.sequence {
            debug!(sequence = request.sequence, "discarding superseded response");
            return LoadOutcome::Superseded;
        }

        let state = &mut inner.state;
        state.loading = false;
        let outcome = match result {
            Ok(listing) => {
                let (mut rows, total) = listing.into_parts();
                sort_records(&mut rows, request.sort.as_ref());
                let rows = Arc::new(rows);

                state.rows = Arc::clone(&rows);
                state.count = total;
                state.phase = LoadPhase::Loaded;
                debug!(sequence = request.sequence, rows = rows.len(), total, "load finished");
                LoadOutcome::Loaded { rows, total }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    page = request.query.page,
                    search = %request.search,
                    "load failed"
                );
                state.rows = Arc::new(Vec::new());
                state.count = 0;
                state.phase = LoadPhase::Errored;
                state.error = Some(e.user_message());
                LoadOutcome::Errored(e)
            }
        };
        inner.publish();
        outcome
    }
}

impl Inner {
    fn publish(&self) {
        if let Some(publishers) = &self.publishers {
            publishers.publish(&self.state);
        }
    }
}

// ── Publishers ───────────────────────────────────────────────────────

struct Publishers {
    rows: watch::Sender<Arc<Vec<Record>>>,
    loading: watch::Sender<bool>,
    count: watch::Sender<u64>,
    page: watch::Sender<u32>,
    page_size: watch::Sender<u32>,
    sort: watch::Sender<Option<SortDescriptor>>,
    search: watch::Sender<String>,
    phase: watch::Sender<LoadPhase>,
    error: watch::Sender<Option<String>>,
}

impl Publishers {
    fn new(state: &ListingState) -> Self {
        Self {
            rows: watch::Sender::new(Arc::clone(&state.rows)),
            loading: watch::Sender::new(state.loading),
            count: watch::Sender::new(state.count),
            page: watch::Sender::new(state.page),
            page_size: watch::Sender::new(state.page_size),
            sort: watch::Sender::new(state.sort.clone()),
            search: watch::Sender::new(state.search.clone()),
            phase: watch::Sender::new(state.phase),
            error: watch::Sender::new(state.error.clone()),
        }
    }

    /// Push changed values. Every new row set is published, even when its
    /// contents equal the previous one.
    fn publish(&self, state: &ListingState) {
        self.rows.send_if_modified(|rows| {
            if Arc::ptr_eq(rows, &state.rows) {
                false
            } else {
                *rows = Arc::clone(&state.rows);
                true
            }
        });
        set(&self.count, state.count);
        set(&self.page, state.page);
        set(&self.page_size, state.page_size);
        set(&self.sort, state.sort.clone());
        set(&self.search, state.search.clone());
        set(&self.error, state.error.clone());
        set(&self.phase, state.phase);
        // Last, so a subscriber woken by loading=false sees the rest settled.
        set(&self.loading, state.loading);
    }
}

fn set<T: PartialEq>(sender: &watch::Sender<T>, value: T) {
    sender.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    });
}
