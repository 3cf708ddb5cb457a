// Archive response types
//
// Models for the swapi.tech `people` collection. The list endpoint answers
// with either summary items (`uid`/`name`/`url`) or expanded items that embed
// the full record under `properties`; the search endpoint may use a bare
// `{ result: [...] }` shape instead of the paged envelope.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Record ───────────────────────────────────────────────────────────

/// A single character as served by the archive.
///
/// Measurements stay textual because the archive mixes numbers with
/// `"unknown"`, `"n/a"` and thousands separators. Missing fields decode as
/// empty text (timestamps as the Unix epoch) so one sparse record does not
/// sink the whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub name: String,
    pub height: String,
    pub mass: String,
    pub hair_color: String,
    pub skin_color: String,
    pub eye_color: String,
    pub birth_year: String,
    pub gender: String,
    pub homeworld: String,
    pub created: DateTime<Utc>,
    pub edited: DateTime<Utc>,
    pub url: String,
}

impl Record {
    /// Look up a field by its wire name.
    ///
    /// Returns `None` for names that are not record fields.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "name" => &self.name,
            "height" => &self.height,
            "mass" => &self.mass,
            "hair_color" => &self.hair_color,
            "skin_color" => &self.skin_color,
            "eye_color" => &self.eye_color,
            "birth_year" => &self.birth_year,
            "gender" => &self.gender,
            "homeworld" => &self.homeworld,
            "url" => &self.url,
            "created" => return Some(Cow::Owned(self.created.to_rfc3339())),
            "edited" => return Some(Cow::Owned(self.edited.to_rfc3339())),
            _ => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }

    /// Trailing path segment of the canonical URL (`.../people/1` -> `1`).
    pub fn uid(&self) -> Option<&str> {
        self.url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
    }
}

// ── List items ───────────────────────────────────────────────────────

/// One entry of a list response, summary or expanded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Present only on expanded responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, rename = "__v", skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
}

impl ListItem {
    /// Summary view of an item: drops everything but `uid`, `name`, `url`.
    pub fn summary(&self) -> Self {
        Self {
            uid: self.uid.clone(),
            name: self.name.clone(),
            url: self.url.clone(),
            ..Self::default()
        }
    }

    /// Display name, falling back to the embedded record.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.properties.as_ref().map(|r| r.name.as_str()))
    }
}

// ── Envelopes ────────────────────────────────────────────────────────

/// Paged list envelope.
///
/// ```json
/// { "message": "ok", "total_records": 82, "total_pages": 9,
///   "previous": null, "next": "https://...", "results": [...] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    #[serde(default)]
    pub message: String,
    pub total_records: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<ListItem>,
}

impl ResultEnvelope {
    pub fn has_next_page(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous_page(&self) -> bool {
        self.previous.is_some()
    }

    /// Expanded records in response order. Summary-only items are skipped.
    pub fn into_records(self) -> Vec<Record> {
        self.results
            .into_iter()
            .filter_map(|item| item.properties)
            .collect()
    }
}

/// Bare search envelope: `{ "message": "ok", "result": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default)]
    pub message: String,
    pub result: Vec<ListItem>,
}

impl SearchEnvelope {
    pub fn into_records(self) -> Vec<Record> {
        self.result
            .into_iter()
            .filter_map(|item| item.properties)
            .collect()
    }
}

/// Single-record envelope from `people/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailEnvelope {
    #[serde(default)]
    pub message: String,
    pub result: ListItem,
}

/// Either list shape the archive can produce.
///
/// The search endpoint is not consistent about which one it returns, so
/// both are accepted and each knows how to flatten itself into records.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing {
    Paged(ResultEnvelope),
    Matched(SearchEnvelope),
}

impl Listing {
    /// Authoritative record count for display.
    pub fn total_records(&self) -> u64 {
        match self {
            Self::Paged(env) => env.total_records,
            Self::Matched(env) => u64::try_from(env.result.len()).unwrap_or(u64::MAX),
        }
    }

    /// Flatten into `(records, total_records)`.
    pub fn into_parts(self) -> (Vec<Record>, u64) {
        let total = self.total_records();
        let records = match self {
            Self::Paged(env) => env.into_records(),
            Self::Matched(env) => env.into_records(),
        };
        (records, total)
    }
}

impl From<ResultEnvelope> for Listing {
    fn from(env: ResultEnvelope) -> Self {
        Self::Paged(env)
    }
}

// ── Query parameters ─────────────────────────────────────────────────

/// Sort direction as understood by the archive's query string.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Paging and sort parameters shared by page fetches and searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    pub sort_by: Option<String>,
    pub order: Option<SortDirection>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            sort_by: None,
            order: None,
        }
    }
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }

    pub fn sorted(mut self, field: impl Into<String>, order: SortDirection) -> Self {
        self.sort_by = Some(field.into());
        self.order = Some(order);
        self
    }

    /// Query-string pairs. Sort keys are sent only when both halves are set.
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("expanded", "true".to_owned()),
        ];
        if let (Some(field), Some(order)) = (&self.sort_by, self.order) {
            params.push(("sort_by", field.clone()));
            params.push(("order", order.to_string()));
        }
        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn luke() -> serde_json::Value {
        json!({
            "name": "Luke Skywalker",
            "height": "172",
            "mass": "77",
            "hair_color": "blond",
            "skin_color": "fair",
            "eye_color": "blue",
            "birth_year": "19BBY",
            "gender": "male",
            "homeworld": "https://www.swapi.tech/api/planets/1",
            "created": "2023-12-09T13:50:51.644000Z",
            "edited": "2023-12-20T21:17:56.891000Z",
            "url": "https://www.swapi.tech/api/people/1"
        })
    }

    #[test]
    fn paged_shape_keeps_expanded_items_only() {
        let listing: Listing = serde_json::from_value(json!({
            "message": "ok",
            "total_records": 82,
            "total_pages": 9,
            "previous": null,
            "next": "https://www.swapi.tech/api/people?page=2&limit=10",
            "results": [
                { "uid": "1", "name": "Luke Skywalker", "properties": luke() },
                { "uid": "2", "name": "C-3PO", "url": "https://www.swapi.tech/api/people/2" }
            ]
        }))
        .unwrap();

        assert!(matches!(listing, Listing::Paged(_)));
        let (records, total) = listing.into_parts();
        assert_eq!(total, 82);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Luke Skywalker");
    }

    #[test]
    fn search_shape_counts_matches() {
        let listing: Listing = serde_json::from_value(json!({
            "message": "ok",
            "result": [
                { "uid": "1", "_id": "5f63a36eee9fd7000499be42", "__v": 0,
                  "description": "A person within the Star Wars universe",
                  "properties": luke() }
            ]
        }))
        .unwrap();

        assert!(matches!(listing, Listing::Matched(_)));
        let (records, total) = listing.into_parts();
        assert_eq!(total, 1);
        assert_eq!(records[0].birth_year, "19BBY");
    }

    #[test]
    fn sparse_record_keeps_the_page() {
        let mut sparse = luke();
        if let Some(fields) = sparse.as_object_mut() {
            fields.remove("edited");
            fields.remove("mass");
        }
        let listing: Listing = serde_json::from_value(json!({
            "message": "ok",
            "total_records": 2,
            "total_pages": 1,
            "previous": null,
            "next": null,
            "results": [
                { "uid": "1", "properties": luke() },
                { "uid": "2", "properties": sparse }
            ]
        }))
        .unwrap();

        let (records, total) = listing.into_parts();
        assert_eq!(total, 2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].mass, "");
        assert_eq!(records[1].edited, DateTime::<Utc>::default());
        assert_eq!(records[1].created, records[0].created);
    }

    #[test]
    fn summary_items_serialize_without_empty_fields() {
        let item: ListItem = serde_json::from_value(json!({
            "uid": "1",
            "name": "Luke Skywalker",
            "url": "https://www.swapi.tech/api/people/1",
            "properties": luke()
        }))
        .unwrap();

        let wire = serde_json::to_value(item.summary()).unwrap();
        assert_eq!(
            wire,
            json!({
                "uid": "1",
                "name": "Luke Skywalker",
                "url": "https://www.swapi.tech/api/people/1"
            })
        );
    }

    #[test]
    fn record_field_lookup() {
        let record: Record = serde_json::from_value(luke()).unwrap();
        assert_eq!(record.field("eye_color").as_deref(), Some("blue"));
        assert_eq!(record.field("starship"), None);
        assert_eq!(record.uid(), Some("1"));
    }

    #[test]
    fn sort_params_need_both_halves() {
        let mut query = PageQuery::new(2, 5);
        query.sort_by = Some("height".into());
        assert!(!query.params().iter().any(|(k, _)| *k == "sort_by"));

        let query = PageQuery::new(2, 5).sorted("height", SortDirection::Desc);
        let params = query.params();
        assert!(params.contains(&("sort_by", "height".to_owned())));
        assert!(params.contains(&("order", "desc".to_owned())));
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }
}
