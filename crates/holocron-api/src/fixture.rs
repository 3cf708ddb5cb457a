// Mock archive for tests
//
// A `wiremock` server that answers the `people` endpoints the way the real
// archive does. Each test builds its own instance, so no state leaks between
// tests and every fixture can carry its own record set, latency, and failure
// mode.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use crate::models::{ListItem, Record, ResultEnvelope, SearchEnvelope};

const PUBLIC_ROOT: &str = "https://www.swapi.tech/api";

/// Which body the search path answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchShape {
    /// Full paged envelope with `total_records` and `results`.
    #[default]
    Paged,
    /// Bare `{ "message": "ok", "result": [...] }`.
    Bare,
}

// ── Canonical data ───────────────────────────────────────────────────

/// Build an expanded list item with the fields sorting cares about.
///
/// The remaining descriptive fields get fixed placeholder values.
pub fn character(uid: &str, name: &str, height: &str, mass: &str, birth_year: &str) -> ListItem {
    let url = format!("{PUBLIC_ROOT}/people/{uid}");
    let stamp: DateTime<Utc> = DateTime::from_timestamp(1_702_129_851, 0).unwrap_or_default();
    ListItem {
        uid: Some(uid.to_owned()),
        name: Some(name.to_owned()),
        url: Some(url.clone()),
        properties: Some(Record {
            name: name.to_owned(),
            height: height.to_owned(),
            mass: mass.to_owned(),
            hair_color: "n/a".into(),
            skin_color: "n/a".into(),
            eye_color: "n/a".into(),
            birth_year: birth_year.to_owned(),
            gender: "n/a".into(),
            homeworld: format!("{PUBLIC_ROOT}/planets/1"),
            created: stamp,
            edited: stamp,
            url,
        }),
        description: Some("A person within the Star Wars universe".into()),
        object_id: None,
        revision: Some(0),
    }
}

/// Luke Skywalker, C-3PO and R2-D2, in archive order.
pub fn canonical_characters() -> Vec<ListItem> {
    let mut luke = character("1", "Luke Skywalker", "172", "77", "19BBY");
    if let Some(record) = luke.properties.as_mut() {
        record.hair_color = "blond".into();
        record.skin_color = "fair".into();
        record.eye_color = "blue".into();
        record.gender = "male".into();
    }

    let mut threepio = character("2", "C-3PO", "167", "75", "112BBY");
    if let Some(record) = threepio.properties.as_mut() {
        record.skin_color = "gold".into();
        record.eye_color = "yellow".into();
    }

    let mut artoo = character("3", "R2-D2", "96", "32", "33BBY");
    if let Some(record) = artoo.properties.as_mut() {
        record.skin_color = "white, blue".into();
        record.eye_color = "red".into();
        record.homeworld = format!("{PUBLIC_ROOT}/planets/8");
    }

    vec![luke, threepio, artoo]
}

// ── Builder ──────────────────────────────────────────────────────────

/// Configures a [`MockArchive`] before it starts.
#[derive(Debug, Default)]
pub struct MockArchiveBuilder {
    items: Option<Vec<ListItem>>,
    delay: Option<Duration>,
    search_shape: SearchShape,
    fail_listing: bool,
}

impl MockArchiveBuilder {
    /// Replace the canonical characters with a custom set.
    pub fn with_items(mut self, items: Vec<ListItem>) -> Self {
        self.items = Some(items);
        self
    }

    /// Delay every response by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn search_shape(mut self, shape: SearchShape) -> Self {
        self.search_shape = shape;
        self
    }

    /// Answer every list and search request with HTTP 500.
    pub fn fail_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub async fn start(self) -> MockArchive {
        let server = MockServer::start().await;
        let base_url = format!("{}/api/", server.uri());
        let items = Arc::new(self.items.unwrap_or_else(canonical_characters));

        let people = PeopleResponder {
            items: Arc::clone(&items),
            base_url: base_url.clone(),
            delay: self.delay,
            search_shape: self.search_shape,
            fail: self.fail_listing,
        };
        Mock::given(method("GET"))
            .and(path("/api/people"))
            .respond_with(people)
            .mount(&server)
            .await;

        let detail = DetailResponder {
            items: Arc::clone(&items),
            delay: self.delay,
        };
        Mock::given(method("GET"))
            .and(path_regex(r"^/api/people/[^/]+/?$"))
            .respond_with(detail)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/error-test"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        MockArchive { server, base_url }
    }
}

// ── Fixture ──────────────────────────────────────────────────────────

/// A running mock archive, owned by a single test.
pub struct MockArchive {
    server: MockServer,
    base_url: String,
}

impl MockArchive {
    /// Start with the canonical characters and no latency.
    pub async fn start() -> Self {
        Self::builder().start().await
    }

    pub fn builder() -> MockArchiveBuilder {
        MockArchiveBuilder::default()
    }

    /// API root to hand to `ArchiveClient::new`, ending in `/api/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying server, for mounting extra mocks.
    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Every request the server has seen so far.
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Number of received requests that carried a `name` query parameter.
    pub async fn search_requests(&self) -> usize {
        self.received_requests()
            .await
            .iter()
            .filter(|r| query_value(r, "name").is_some())
            .count()
    }
}

// ── Responders ───────────────────────────────────────────────────────

fn query_value(request: &Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn with_delay(template: ResponseTemplate, delay: Option<Duration>) -> ResponseTemplate {
    match delay {
        Some(d) => template.set_delay(d),
        None => template,
    }
}

struct PeopleResponder {
    items: Arc<Vec<ListItem>>,
    base_url: String,
    delay: Option<Duration>,
    search_shape: SearchShape,
    fail: bool,
}

impl PeopleResponder {
    fn shape(items: &[ListItem], expanded: bool) -> Vec<ListItem> {
        items
            .iter()
            .map(|item| if expanded { item.clone() } else { item.summary() })
            .collect()
    }

    fn search(&self, term: &str, expanded: bool) -> ResponseTemplate {
        let needle = term.to_lowercase();
        let matches: Vec<ListItem> = self
            .items
            .iter()
            .filter(|item| {
                item.display_name()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        let results = Self::shape(&matches, expanded);

        match self.search_shape {
            SearchShape::Paged => ResponseTemplate::new(200).set_body_json(ResultEnvelope {
                message: "ok".into(),
                total_records: u64::try_from(results.len()).unwrap_or(u64::MAX),
                total_pages: 1,
                previous: None,
                next: None,
                results,
            }),
            SearchShape::Bare => ResponseTemplate::new(200).set_body_json(SearchEnvelope {
                message: "ok".into(),
                result: results,
            }),
        }
    }

    fn page(&self, page: usize, limit: usize, expanded: bool) -> ResponseTemplate {
        let total = self.items.len();
        let start = (page - 1).saturating_mul(limit).min(total);
        let end = start.saturating_add(limit).min(total);
        let link = |p: usize| format!("{}people?page={p}&limit={limit}&expanded=true", self.base_url);

        let envelope = ResultEnvelope {
            message: "ok".into(),
            total_records: u64::try_from(total).unwrap_or(u64::MAX),
            total_pages: u64::try_from(total.div_ceil(limit)).unwrap_or(u64::MAX),
            previous: (page > 1).then(|| link(page - 1)),
            next: (end < total).then(|| link(page + 1)),
            results: Self::shape(&self.items[start..end], expanded),
        };
        ResponseTemplate::new(200).set_body_json(envelope)
    }
}

impl Respond for PeopleResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if self.fail {
            return with_delay(ResponseTemplate::new(500), self.delay);
        }

        let expanded = query_value(request, "expanded").as_deref() == Some("true");
        let template = match query_value(request, "name").filter(|t| !t.is_empty()) {
            Some(term) => self.search(&term, expanded),
            None => {
                let page = query_value(request, "page")
                    .and_then(|p| p.parse::<usize>().ok())
                    .unwrap_or(1)
                    .max(1);
                let limit = query_value(request, "limit")
                    .and_then(|l| l.parse::<usize>().ok())
                    .unwrap_or(10)
                    .max(1);
                self.page(page, limit, expanded)
            }
        };
        with_delay(template, self.delay)
    }
}

struct DetailResponder {
    items: Arc<Vec<ListItem>>,
    delay: Option<Duration>,
}

impl Respond for DetailResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id = request
            .url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .unwrap_or_default();

        let template = match self
            .items
            .iter()
            .find(|item| item.uid.as_deref() == Some(id))
        {
            Some(item) => ResponseTemplate::new(200).set_body_json(json!({
                "message": "ok",
                "result": item,
            })),
            None => ResponseTemplate::new(404),
        };
        with_delay(template, self.delay)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::client::ArchiveClient;
    use crate::error::Error;
    use crate::transport::RetryPolicy;

    fn client_for(archive: &MockArchive) -> ArchiveClient {
        ArchiveClient::with_client(
            reqwest::Client::new(),
            &format!("{}/api/", archive.server().uri()),
            RetryPolicy::none(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn error_endpoint_answers_500() {
        let archive = MockArchive::start().await;
        let client = client_for(&archive);

        let err = client
            .get::<serde_json::Value>(client.url("error-test").unwrap(), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Status { status: 500, .. }), "{err:?}");
        assert_eq!(client.retry_policy().max_retries, 0);
    }

    #[tokio::test]
    async fn unexpanded_listing_is_summary_only() {
        let archive = MockArchive::start().await;
        let client = client_for(&archive);

        let envelope: ResultEnvelope = client
            .get(
                client.url("people").unwrap(),
                &[("page", "1".to_owned()), ("limit", "10".to_owned())],
            )
            .await
            .unwrap();

        assert_eq!(envelope.total_records, 3);
        assert_eq!(envelope.results.len(), 3);
        assert!(envelope.results.iter().all(|item| item.properties.is_none()));
        assert_eq!(envelope.results[0].name.as_deref(), Some("Luke Skywalker"));
        assert!(envelope.into_records().is_empty());
    }

    #[tokio::test]
    async fn summary_items_carry_only_identity_fields() {
        let archive = MockArchive::start().await;

        let body: serde_json::Value = reqwest::get(format!(
            "{}people?page=1&limit=1&expanded=false",
            archive.base_url()
        ))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

        assert_eq!(
            body["results"][0],
            json!({
                "uid": "1",
                "name": "Luke Skywalker",
                "url": format!("{PUBLIC_ROOT}/people/1")
            })
        );
    }
}
