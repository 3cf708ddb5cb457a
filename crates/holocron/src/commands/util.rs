//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;

use holocron_core::{
    DataSource, ListSource, ListingState, LoadOutcome, LoadParams, SortDescriptor, SortDirection,
};

use crate::cli::{PagingArgs, SortOrder};
use crate::error::CliError;

impl From<SortOrder> for SortDirection {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => SortDirection::Asc,
            SortOrder::Desc => SortDirection::Desc,
        }
    }
}

/// Turn paging flags plus an optional name filter into load parameters.
///
/// `--limit` wins over the configured page size; without it the data
/// source's default applies.
pub fn load_params(paging: &PagingArgs, search: Option<&str>) -> LoadParams {
    let sort = paging
        .sort
        .as_deref()
        .filter(|field| !field.trim().is_empty())
        .map(|field| SortDescriptor::new(field.trim().into(), paging.order.into()));

    let mut params = LoadParams::new()
        .page(paging.page)
        .sort(sort)
        .search(search.unwrap_or_default().trim());
    if let Some(limit) = paging.limit {
        params = params.page_size(limit);
    }
    params
}

/// A stderr spinner, or `None` when quiet or stderr is not a terminal.
pub fn spinner(message: &str, quiet: bool) -> Option<ProgressBar> {
    if quiet || !io::stderr().is_terminal() {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.yellow} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(80));
    Some(bar)
}

/// Show a spinner until the source's `loading` channel drops back to false.
pub fn track_loading<C: ListSource>(
    source: &DataSource<C>,
    quiet: bool,
) -> Option<JoinHandle<()>> {
    let bar = spinner("Contacting the archive...", quiet)?;
    let mut loading = source.loading();
    Some(tokio::spawn(async move {
        loading.wait_for(|busy| !*busy).await;
        bar.finish_and_clear();
    }))
}

/// Start a load, wait for it, and return the published state.
pub async fn run_load<C: ListSource>(
    source: &DataSource<C>,
    params: LoadParams,
    quiet: bool,
) -> Result<ListingState, CliError> {
    let handle = source.load(params);
    let tracker = track_loading(source, quiet);
    let outcome = handle.await?;
    if let Some(tracker) = tracker {
        let _ = tracker.await;
    }

    match outcome {
        LoadOutcome::Loaded { .. } => Ok(source.snapshot()),
        LoadOutcome::Errored(err) => Err(err.into()),
        LoadOutcome::Superseded | LoadOutcome::Cancelled | LoadOutcome::Ignored => Err(
            CliError::Internal(format!("load did not complete: {outcome:?}")),
        ),
    }
}
