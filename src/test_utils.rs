use crate::entry::LogEntry;
use crate::error::{Error, Result};
use crate::navigator::NavState;
use crate::normalize::Normalizer;
use crate::present::{ListView, Presenter, ViewKind};
use crate::query::{QueryPort, RawHit, TimeRange};
use crate::store::LogStore;
use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::ops::Range;
use std::rc::Rc;

const HOST: &str = "web-1";

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn at(secs: i64) -> DateTime<Utc> {
    base_time() + Duration::seconds(secs)
}

/// Entry `id` at `secs` past the test epoch, on host `web-1`.
pub fn entry(id: &str, secs: i64) -> LogEntry {
    LogEntry {
        id: id.to_string(),
        timestamp: at(secs),
        message: format!("message {id}"),
        context: BTreeMap::from([("host".to_string(), json!(HOST))]),
    }
}

/// Raw hit matching [`entry`].
pub fn hit_at(id: &str, secs: i64) -> RawHit {
    RawHit::new(
        id,
        json!({
            "@timestamp": at(secs).to_rfc3339_opts(SecondsFormat::Micros, true),
            "message": format!("message {id}"),
            "host": HOST,
        }),
    )
}

/// Raw hit with an empty message at `secs`, on host `web-1`.
pub fn blank_at(id: &str, secs: i64) -> RawHit {
    RawHit::new(
        id,
        json!({
            "@timestamp": at(secs).to_rfc3339_opts(SecondsFormat::Micros, true),
            "message": "",
            "host": HOST,
        }),
    )
}

/// In-memory store holding one ascending stream of hits.
///
/// Context fetches behave like a range query on the timestamp plus a term
/// match on every context field of the pivot. Responses can be scripted and
/// failures injected for the next call.
#[derive(Default)]
pub struct MockStore {
    hits: Vec<RawHit>,
    scripted: RefCell<VecDeque<std::result::Result<Vec<RawHit>, String>>>,
    failure: RefCell<Option<String>>,
    context_calls: RefCell<Vec<(String, i64, usize)>>,
}

impl MockStore {
    pub fn new(hits: Vec<RawHit>) -> Self {
        Self {
            hits,
            ..Self::default()
        }
    }

    /// Hits `e{n}` at second `n` for every `n` in the range.
    pub fn stream(range: Range<i64>) -> Self {
        Self::new(range.map(|n| hit_at(&format!("e{n}"), n)).collect())
    }

    /// Queue raw responses for the next context fetches, in order.
    pub fn script(&self, responses: Vec<Vec<RawHit>>) {
        self.scripted
            .borrow_mut()
            .extend(responses.into_iter().map(Ok));
    }

    /// Queue a failing context fetch after any responses already scripted.
    pub fn script_failure(&self, message: &str) {
        self.scripted.borrow_mut().push_back(Err(message.to_string()));
    }

    /// Make the next call of any kind fail with `FetchFailed`.
    pub fn fail_next(&self, message: &str) {
        *self.failure.borrow_mut() = Some(message.to_string());
    }

    /// Signed counts of every context fetch, in call order.
    pub fn context_calls(&self) -> Vec<i64> {
        self.context_calls.borrow().iter().map(|(_, c, _)| *c).collect()
    }

    /// Skip offsets of every context fetch, in call order.
    pub fn context_skips(&self) -> Vec<usize> {
        self.context_calls.borrow().iter().map(|(_, _, s)| *s).collect()
    }

    /// Pivot ids of every context fetch, in call order.
    pub fn context_pivots(&self) -> Vec<String> {
        self.context_calls
            .borrow()
            .iter()
            .map(|(id, _, _)| id.clone())
            .collect()
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure.borrow_mut().take() {
            Some(message) => Err(Error::FetchFailed(message)),
            None => Ok(()),
        }
    }

    fn timestamp_of(hit: &RawHit) -> DateTime<Utc> {
        hit.source
            .get("@timestamp")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(base_time)
    }

    fn same_context(hit: &RawHit, pivot: &LogEntry) -> bool {
        pivot
            .context
            .iter()
            .all(|(field, value)| hit.source.get(field) == Some(value))
    }
}

impl QueryPort for Rc<MockStore> {
    fn search(&self, query: &str, _range: &TimeRange) -> Result<Vec<RawHit>> {
        self.check_failure()?;
        // Newest first, like the real store
        Ok(self
            .hits
            .iter()
            .rev()
            .filter(|hit| {
                query == "*"
                    || hit
                        .source
                        .get("message")
                        .and_then(Value::as_str)
                        .is_some_and(|m| m.contains(query))
            })
            .cloned()
            .collect())
    }

    fn fetch_by_id(&self, id: &str) -> Result<RawHit> {
        self.check_failure()?;
        self.hits
            .iter()
            .find(|hit| hit.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn fetch_context_from(&self, pivot: &LogEntry, count: i64, skip: usize) -> Result<Vec<RawHit>> {
        self.context_calls
            .borrow_mut()
            .push((pivot.id.clone(), count, skip));
        self.check_failure()?;
        if let Some(response) = self.scripted.borrow_mut().pop_front() {
            return response.map_err(Error::FetchFailed);
        }

        let limit = count.unsigned_abs() as usize;
        let in_context = self
            .hits
            .iter()
            .filter(|hit| MockStore::same_context(hit, pivot));
        let hits = if count > 0 {
            in_context
                .filter(|hit| MockStore::timestamp_of(hit) >= pivot.timestamp)
                .skip(skip)
                .take(limit)
                .cloned()
                .collect()
        } else {
            // Descending by timestamp; equal timestamps newest-inserted first
            let before: Vec<RawHit> = in_context
                .filter(|hit| MockStore::timestamp_of(hit) <= pivot.timestamp)
                .cloned()
                .collect();
            before.into_iter().rev().skip(skip).take(limit).collect()
        };
        Ok(hits)
    }
}

/// A [`LogStore`] over `mock` (context field `host`), plus a handle to the mock.
pub fn store_with(mock: MockStore) -> (LogStore, Rc<MockStore>) {
    store_with_normalizer(
        mock,
        Normalizer::default().with_context_fields(vec!["host".to_string()]),
    )
}

pub fn store_with_normalizer(mock: MockStore, normalizer: Normalizer) -> (LogStore, Rc<MockStore>) {
    let mock = Rc::new(mock);
    (LogStore::new(Box::new(mock.clone()), normalizer), mock)
}

/// What a [`RecordingPresenter`] saw for one `render_list` call.
#[derive(Debug, Clone)]
pub struct RecordedFrame {
    pub kind: ViewKind,
    pub title: String,
    pub visible_ids: Vec<String>,
    pub selected_id: Option<String>,
    pub first_index: usize,
    pub total: usize,
    pub state: NavState,
}

/// Presenter that keeps every frame and notice instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub frames: Vec<RecordedFrame>,
    pub notices: Vec<String>,
}

impl RecordingPresenter {
    pub fn last(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }
}

impl Presenter for RecordingPresenter {
    fn render_list(&mut self, view: &ListView<'_>) -> anyhow::Result<()> {
        self.frames.push(RecordedFrame {
            kind: view.kind,
            title: view.title.to_string(),
            visible_ids: view.visible.iter().map(|e| e.id.clone()).collect(),
            selected_id: view.selected_entry().map(|e| e.id.clone()),
            first_index: view.first_index,
            total: view.total,
            state: view.state.clone(),
        });
        Ok(())
    }

    fn notify(&mut self, message: &str) -> anyhow::Result<()> {
        self.notices.push(message.to_string());
        Ok(())
    }
}
