#![allow(clippy::unwrap_used)]
// End-to-end tests: `DataSource` over a real `ArchiveClient` talking to the
// mock archive.

use std::time::Duration;

use futures_util::StreamExt;
use pretty_assertions::assert_eq;

use holocron_api::fixture::{MockArchive, SearchShape};
use holocron_core::{
    ArchiveClient, ArchiveConfig, CoreError, DataSource, ListSource, LoadOutcome, LoadParams,
    LoadPhase, Record, SortDirection, SortField,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn client(archive: &MockArchive) -> ArchiveClient {
    ArchiveConfig {
        base_url: archive.base_url().to_owned(),
        max_retries: 0,
        ..ArchiveConfig::default()
    }
    .build_client()
    .unwrap()
}

fn source(archive: &MockArchive) -> DataSource<ArchiveClient> {
    DataSource::new(client(archive))
}

fn names(rows: &[Record]) -> Vec<&str> {
    rows.iter().map(|r| r.name.as_str()).collect()
}

// ── Listing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_first_page_of_canonical_characters() {
    let archive = MockArchive::start().await;
    let source = source(&archive);

    let outcome = source.load(LoadParams::new()).await.unwrap();

    assert!(outcome.is_loaded());
    let state = source.snapshot();
    assert_eq!(names(&state.rows), ["Luke Skywalker", "C-3PO", "R2-D2"]);
    assert_eq!(state.count, 3);
    assert_eq!(state.page, 1);
    assert_eq!(state.page_size, 10);
    assert!(!state.loading);
    assert!(!state.has_next_page());
    assert_eq!(state.phase, LoadPhase::Loaded);
}

#[tokio::test]
async fn test_second_page_with_small_page_size() {
    let archive = MockArchive::start().await;
    let source = source(&archive);

    source
        .load(LoadParams::new().page(2).page_size(2))
        .await
        .unwrap();

    let state = source.snapshot();
    assert_eq!(names(&state.rows), ["R2-D2"]);
    assert_eq!(state.count, 3);
    assert!(state.has_previous_page());
    assert!(!state.has_next_page());
}

#[tokio::test]
async fn test_every_request_asks_for_expanded_records() {
    let archive = MockArchive::start().await;
    let source = source(&archive);

    source.load(LoadParams::new()).await.unwrap();

    let requests = archive.received_requests().await;
    assert_eq!(requests.len(), 1);
    let query = requests[0].url.query().unwrap_or_default();
    assert!(query.contains("expanded=true"), "query was {query}");
    assert!(query.contains("limit=10"), "query was {query}");
}

#[tokio::test]
async fn test_repeated_loads_are_idempotent() {
    let archive = MockArchive::start().await;
    let source = source(&archive);

    source.load(LoadParams::new()).await.unwrap();
    let first = source.snapshot();
    source.load(LoadParams::new()).await.unwrap();
    let second = source.snapshot();

    assert_eq!(first, second);
    assert_eq!(archive.received_requests().await.len(), 2);
}

#[tokio::test]
async fn test_client_side_sort_by_height() {
    let archive = MockArchive::start().await;
    let source = source(&archive);

    source
        .load(LoadParams::new().sorted_by(SortField::Height, SortDirection::Asc))
        .await
        .unwrap();

    assert_eq!(
        names(&source.current_rows()),
        ["R2-D2", "C-3PO", "Luke Skywalker"]
    );

    source
        .load(LoadParams::new().sorted_by(SortField::BirthYear, SortDirection::Desc))
        .await
        .unwrap();

    assert_eq!(
        names(&source.current_rows()),
        ["C-3PO", "R2-D2", "Luke Skywalker"]
    );
}

// ── Search ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_uses_name_filter() {
    let archive = MockArchive::start().await;
    let source = source(&archive);

    source
        .load(LoadParams::new().search("luke"))
        .await
        .unwrap();

    assert_eq!(names(&source.current_rows()), ["Luke Skywalker"]);
    assert_eq!(source.current_count(), 1);
    assert_eq!(archive.search_requests().await, 1);
}

#[tokio::test]
async fn test_search_accepts_bare_shape() {
    let archive = MockArchive::builder()
        .search_shape(SearchShape::Bare)
        .start()
        .await;
    let source = source(&archive);

    source.load(LoadParams::new().search("-")).await.unwrap();

    assert_eq!(names(&source.current_rows()), ["C-3PO", "R2-D2"]);
    assert_eq!(source.current_count(), 2);
}

#[tokio::test]
async fn test_search_without_matches_is_empty_not_error() {
    let archive = MockArchive::start().await;
    let source = source(&archive);

    source
        .load(LoadParams::new().search("yoda"))
        .await
        .unwrap();

    assert!(source.current_rows().is_empty());
    assert_eq!(source.current_count(), 0);
    assert_eq!(source.current_phase(), LoadPhase::Loaded);
    assert_eq!(source.error().latest(), None);
}

// ── Failure ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_failed_listing_clears_state() {
    let archive = MockArchive::builder().fail_listing().start().await;
    let source = source(&archive);

    let outcome = source.load(LoadParams::new()).await.unwrap();

    match outcome {
        LoadOutcome::Errored(error) => assert!(error.user_message().starts_with("Error Code: 500")),
        other => panic!("expected Errored, got: {other:?}"),
    }
    assert!(source.current_rows().is_empty());
    assert_eq!(source.current_count(), 0);
    assert!(!source.is_loading());
}

#[tokio::test]
async fn test_lookup_by_id() {
    let archive = MockArchive::start().await;
    let client = client(&archive);

    let artoo = ListSource::fetch_by_id(&client, "3").await.unwrap();
    assert_eq!(artoo.name, "R2-D2");

    let missing = ListSource::fetch_by_id(&client, "999").await;
    match missing {
        Err(CoreError::NotFound { identifier }) => assert_eq!(identifier, "999"),
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

// ── Channels & lifecycle ────────────────────────────────────────────

#[tokio::test]
async fn test_rows_stream_replays_then_updates() {
    let archive = MockArchive::start().await;
    let source = source(&archive);
    let mut rows = source.rows().into_stream();

    assert!(rows.next().await.unwrap().is_empty());

    source.load(LoadParams::new()).await.unwrap();
    assert_eq!(rows.next().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_teardown_mid_request() {
    let archive = MockArchive::builder()
        .with_delay(Duration::from_millis(200))
        .start()
        .await;
    let source = source(&archive);
    let mut rows = source.rows();
    let mut loading = source.loading();

    let handle = source.load(LoadParams::new());
    assert_eq!(loading.changed().await, Some(true));

    source.teardown();

    assert_eq!(handle.await.unwrap(), LoadOutcome::Cancelled);
    assert_eq!(rows.changed().await, None);
    assert!(rows.latest().is_empty());
}

#[tokio::test]
async fn test_reset_after_load() {
    let archive = MockArchive::start().await;
    let source = source(&archive);

    source
        .load(LoadParams::new().page(2).page_size(1).search("r"))
        .await
        .unwrap();
    source.reset();

    let state = source.snapshot();
    assert!(state.rows.is_empty());
    assert_eq!(state.count, 0);
    assert_eq!(state.page, 1);
    assert_eq!(state.page_size, 10);
    assert_eq!(state.search, "");
    assert_eq!(state.sort, None);
    assert_eq!(state.phase, LoadPhase::Idle);
}
