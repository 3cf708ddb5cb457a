// ── Remote list seam ──
//
// The Data Source talks to the archive through `ListSource` so tests can
// swap in a scripted fake without a server.

use std::future::Future;
use std::sync::Arc;

use holocron_api::{ArchiveClient, Listing, PageQuery, Record};

use crate::error::CoreError;

/// Read operations the Data Source needs from a remote list.
pub trait ListSource: Send + Sync + 'static {
    /// One page of records, sort parameters forwarded.
    fn fetch_page(
        &self,
        query: &PageQuery,
    ) -> impl Future<Output = Result<Listing, CoreError>> + Send;

    /// Records whose name matches `term`.
    fn search(
        &self,
        term: &str,
        query: &PageQuery,
    ) -> impl Future<Output = Result<Listing, CoreError>> + Send;

    fn fetch_by_id(&self, id: &str) -> impl Future<Output = Result<Record, CoreError>> + Send;
}

impl ListSource for ArchiveClient {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Listing, CoreError> {
        let envelope = ArchiveClient::fetch_page(self, query).await?;
        Ok(Listing::Paged(envelope))
    }

    async fn search(&self, term: &str, query: &PageQuery) -> Result<Listing, CoreError> {
        Ok(ArchiveClient::search(self, term, query).await?)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Record, CoreError> {
        Ok(ArchiveClient::fetch_by_id(self, id).await?)
    }
}

impl<T: ListSource> ListSource for Arc<T> {
    fn fetch_page(
        &self,
        query: &PageQuery,
    ) -> impl Future<Output = Result<Listing, CoreError>> + Send {
        T::fetch_page(self, query)
    }

    fn search(
        &self,
        term: &str,
        query: &PageQuery,
    ) -> impl Future<Output = Result<Listing, CoreError>> + Send {
        T::search(self, term, query)
    }

    fn fetch_by_id(&self, id: &str) -> impl Future<Output = Result<Record, CoreError>> + Send {
        T::fetch_by_id(self, id)
    }
}
