//! Elasticsearch implementation of [`QueryPort`] over the `_search` HTTP API.

use super::{QueryPort, RawHit, TimeRange};
use crate::entry::LogEntry;
use crate::error::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Longest slice of an error body echoed back to the user.
const ERROR_BODY_PREVIEW: usize = 200;

/// Connection and mapping settings for the client.
#[derive(Debug, Clone)]
pub struct ElasticsearchSettings {
    pub url: String,
    pub index: String,
    pub timestamp_field: String,
    pub context_fields: Vec<String>,
    /// Appended to context field names in term queries (e.g. `.raw`, `.keyword`).
    pub term_suffix: String,
    pub search_size: usize,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

pub struct ElasticsearchClient {
    http: Client,
    settings: ElasticsearchSettings,
}

impl ElasticsearchClient {
    pub fn new(settings: ElasticsearchSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::FetchFailed(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { http, settings })
    }

    fn search_url(&self) -> String {
        format!(
            "{}/{}/_search",
            self.settings.url.trim_end_matches('/'),
            self.settings.index
        )
    }

    fn post_search(&self, body: &Value) -> Result<Vec<RawHit>> {
        let url = self.search_url();
        debug!(%url, %body, "search request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| Error::FetchFailed(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            let preview: String = text.chars().take(ERROR_BODY_PREVIEW).collect();
            warn!(%url, %status, "search rejected");
            return Err(Error::FetchFailed(format!(
                "{url} returned {status}: {preview}"
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .map_err(|e| Error::FetchFailed(format!("invalid response from {url}: {e}")))?;
        debug!(hits = parsed.hits.hits.len(), "search response");
        Ok(parsed.hits.hits)
    }
}

impl QueryPort for ElasticsearchClient {
    fn search(&self, query: &str, range: &TimeRange) -> Result<Vec<RawHit>> {
        let body = search_body(
            query,
            range,
            &self.settings.timestamp_field,
            self.settings.search_size,
        );
        self.post_search(&body)
    }

    fn fetch_by_id(&self, id: &str) -> Result<RawHit> {
        let body = json!({ "query": { "ids": { "values": [id] } } });
        self.post_search(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn fetch_context_from(&self, pivot: &LogEntry, count: i64, skip: usize) -> Result<Vec<RawHit>> {
        let body = context_body(pivot, count, skip, &self.settings);
        self.post_search(&body)
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn search_body(query: &str, range: &TimeRange, timestamp_field: &str, size: usize) -> Value {
    let mut must = vec![json!({
        "query_string": { "query": query, "analyze_wildcard": true }
    })];

    if !range.is_unbounded() {
        let mut bounds = serde_json::Map::new();
        if let Some(from) = &range.from {
            bounds.insert("gte".into(), json!(format_timestamp(from)));
        }
        if let Some(to) = &range.to {
            bounds.insert("lte".into(), json!(format_timestamp(to)));
        }
        must.push(json!({ "range": { timestamp_field: bounds } }));
    }

    json!({
        "query": { "bool": { "must": must } },
        "from": 0,
        "size": size,
        "sort": [{ timestamp_field: { "order": "desc" } }],
    })
}

fn context_body(pivot: &LogEntry, count: i64, skip: usize, settings: &ElasticsearchSettings) -> Value {
    let ts_field = settings.timestamp_field.as_str();
    let mut must: Vec<Value> = settings
        .context_fields
        .iter()
        .filter_map(|field| {
            let value = pivot.context.get(field).filter(|v| !v.is_null())?;
            let term_field = format!("{}{}", field, settings.term_suffix);
            Some(json!({ "term": { term_field: value } }))
        })
        .collect();

    let pivot_ts = format_timestamp(&pivot.timestamp);
    let (bound, order) = if count > 0 {
        ("gte", "asc")
    } else {
        ("lte", "desc")
    };
    must.push(json!({ "range": { ts_field: { bound: pivot_ts } } }));

    json!({
        "query": { "bool": { "must": must } },
        "from": skip,
        "size": count.unsigned_abs(),
        "sort": [{ ts_field: { "order": order } }],
    })
}
