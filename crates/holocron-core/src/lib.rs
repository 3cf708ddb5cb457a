//! Listing state between `holocron-api` and terminal consumers.
//!
//! - **[`DataSource`]** — Owns page, page size, sort, search, loading and
//!   count state for one listing. [`load()`](DataSource::load) publishes the
//!   loading state synchronously, then fetches on a spawned task; stale
//!   responses from overlapping loads are discarded.
//!
//! - **[`Observed<T>`]** — Subscription handle vended for every piece of
//!   listing state. Replays the latest value and exposes `current()` /
//!   `latest()` / `changed()`, or a `Stream` via `into_stream()`.
//!
//! - **[`sort`]** — Client-side sort correction applied to every loaded page
//!   while a sort is active.
//!
//! - **[`ListSource`]** — The remote seam. Implemented for
//!   [`holocron_api::ArchiveClient`]; tests substitute their own.

pub mod config;
pub mod error;
pub mod remote;
pub mod sort;
pub mod source;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ArchiveConfig;
pub use error::CoreError;
pub use remote::ListSource;
pub use sort::{SortDescriptor, SortDirection, SortField, sort_records};
pub use source::{
    DEFAULT_PAGE_SIZE, DataSource, ListingState, LoadOutcome, LoadParams, LoadPhase,
};
pub use stream::{Observed, ObservedStream};

pub use holocron_api::{ArchiveClient, Record};
