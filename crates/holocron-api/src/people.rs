// People endpoints
//
// The three read operations the listing needs: a paged fetch, a lookup by
// id, and a name search. All live under `{base}/people`.

use tracing::debug;

use crate::client::ArchiveClient;
use crate::error::Error;
use crate::models::{DetailEnvelope, Listing, PageQuery, Record, ResultEnvelope};

impl ArchiveClient {
    /// Fetch one page of expanded records.
    ///
    /// `GET /people?page={page}&limit={limit}&expanded=true[&sort_by=..&order=..]`
    pub async fn fetch_page(&self, query: &PageQuery) -> Result<ResultEnvelope, Error> {
        let url = self.url("people")?;
        debug!(page = query.page, limit = query.limit, "fetching page");
        self.get(url, &query.params()).await
    }

    /// Fetch a single record by its archive id.
    ///
    /// `GET /people/{id}`. A 404 becomes [`Error::NotFound`].
    pub async fn fetch_by_id(&self, id: &str) -> Result<Record, Error> {
        let url = self.url(&format!("people/{id}"))?;
        debug!(id, "fetching record");

        let envelope: DetailEnvelope = self.get(url, &[]).await.map_err(|e| match e {
            Error::Status { status: 404, .. } => Error::NotFound { id: id.to_owned() },
            other => other,
        })?;

        envelope
            .result
            .properties
            .ok_or_else(|| Error::Deserialization {
                message: format!("record '{id}' returned without properties"),
                body: String::new(),
            })
    }

    /// Search records by name (case-insensitive substring on the server).
    ///
    /// `GET /people?name={term}&page=..&limit=..&expanded=true[&sort_by=..&order=..]`
    ///
    /// The response may use either list shape; see [`Listing`].
    pub async fn search(&self, term: &str, query: &PageQuery) -> Result<Listing, Error> {
        let url = self.url("people")?;
        debug!(term, page = query.page, limit = query.limit, "searching");

        let mut params = vec![("name", term.to_owned())];
        params.extend(query.params());
        self.get(url, &params).await
    }
}
