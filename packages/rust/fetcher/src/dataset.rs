//! Fallback dataset client.
//!
//! When the primary API has no starter code, the dataset server is searched
//! with a list of candidate keys. Each search page is scanned row by row; the
//! first row satisfying any of the match predicates (checked in a fixed
//! order) wins. If no candidate finds a row, one bounded page of rows is read
//! and scanned with a looser predicate.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use leettutor_shared::types::string_or_number;
use leettutor_shared::{
    DatasetConfig, DatasetFallbackRecord, ExampleCase, LeetTutorError, ProblemRecord, Result,
    TestSpec, parse_embedded, recover,
};

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Lowercase `text` and replace whitespace runs with `-`.
pub fn slugify(text: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
    WS_RE.replace_all(&text.to_lowercase(), "-").into_owned()
}

/// Keys used to look a problem up in the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackQuery {
    /// The user's input, slugified.
    pub normalized_input: String,
    /// The user's input, lowercased only.
    pub raw_input_lower: String,
    /// Search terms in the order they are tried (no empties, no repeats).
    pub candidates: Vec<String>,
    /// Problem number used by the linear scan.
    pub numeric_id: Option<String>,
}

impl FallbackQuery {
    /// Build the query for `input` (what the user typed) and the primary record.
    ///
    /// Candidates, in order: the normalized input, the record's slug, the
    /// slugified title, and the problem number.
    pub fn new(input: &str, record: &ProblemRecord) -> Self {
        let normalized_input = slugify(input);
        let numeric_id = record.frontend_id().map(str::to_string);

        let ordered = [
            Some(normalized_input.clone()),
            record.title_slug.clone(),
            Some(slugify(&record.title)),
            numeric_id.clone(),
        ];

        let mut candidates: Vec<String> = Vec::new();
        for candidate in ordered.into_iter().flatten() {
            if !candidate.is_empty() && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        Self {
            normalized_input,
            raw_input_lower: input.to_lowercase(),
            candidates,
            numeric_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Response shape shared by `/search` and `/rows`.
#[derive(Debug, Deserialize)]
struct RowsResponse {
    #[serde(default)]
    rows: Vec<RowEnvelope>,
}

#[derive(Debug, Deserialize)]
struct RowEnvelope {
    row: DatasetRow,
}

#[derive(Debug, Clone, Deserialize)]
struct DatasetRow {
    #[serde(default)]
    task_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    question_id: Option<String>,
    #[serde(default)]
    starter_code: Option<String>,
    #[serde(default)]
    entry_point: Option<String>,
    #[serde(default)]
    test: Option<String>,
    #[serde(default)]
    input_output: Option<Value>,
}

impl DatasetRow {
    /// Search predicates, checked in order.
    fn matches_search(&self, term: &str, query: &FallbackQuery) -> bool {
        let task_id = self.task_id.as_deref();
        task_id == Some(term)
            || self.question_id.as_deref() == Some(term)
            || task_id == Some(query.normalized_input.as_str())
    }

    /// Linear-scan predicates, checked in order.
    fn matches_scan(&self, query: &FallbackQuery) -> bool {
        let task_contains = self
            .task_id
            .as_deref()
            .is_some_and(|id| id.contains(&query.raw_input_lower));
        let same_number = match (&self.question_id, &query.numeric_id) {
            (Some(row_id), Some(wanted)) => row_id == wanted,
            _ => false,
        };
        task_contains || same_number
    }

    fn into_record(self) -> DatasetFallbackRecord {
        let test_spec = match self.test.filter(|code| !code.trim().is_empty()) {
            Some(code) => Some(TestSpec::Code(code)),
            None => self
                .input_output
                .and_then(|value| recover(parse_cases(&value)))
                .filter(|cases| !cases.is_empty())
                .map(TestSpec::Cases),
        };

        DatasetFallbackRecord {
            task_id: self.task_id.unwrap_or_default(),
            question_id: self.question_id,
            starter_code: self.starter_code.filter(|code| !code.is_empty()),
            test_spec,
            entry_point: self.entry_point.filter(|name| !name.is_empty()),
        }
    }
}

/// Parse the loosely typed `input_output` column into cases.
///
/// Accepts a list of `{input, output}` objects or a JSON string holding one.
/// Non-string inputs and outputs are rendered as JSON text.
fn parse_cases(value: &Value) -> Result<Vec<ExampleCase>> {
    let items = match value {
        Value::Array(items) => items.clone(),
        Value::String(raw) => parse_embedded::<Vec<Value>>("input_output", raw)?,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(LeetTutorError::parse(format!(
                "input_output: expected a list, got {other}"
            )));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let field = |key: &str| {
                item.get(key).map(render).ok_or_else(|| {
                    LeetTutorError::parse(format!("input_output[{i}]: missing `{key}`"))
                })
            };
            Ok(ExampleCase {
                input: field("input")?,
                output: field("output")?,
            })
        })
        .collect()
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the public dataset server.
#[derive(Debug, Clone)]
pub struct DatasetClient {
    client: Client,
    base_url: Url,
    config: DatasetConfig,
}

impl DatasetClient {
    pub fn new(config: &DatasetConfig, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: crate::build_client(timeout_secs)?,
            base_url: crate::parse_base_url(&config.base_url)?,
            config: config.clone(),
        })
    }

    /// Find the dataset row for a problem. Never fails: every error is logged
    /// and treated as "no match".
    #[instrument(skip_all, fields(candidates = query.candidates.len()))]
    pub async fn fetch_fallback(&self, query: &FallbackQuery) -> Option<DatasetFallbackRecord> {
        for term in &query.candidates {
            match self.search(term).await {
                Ok(rows) => {
                    if let Some(row) = rows.into_iter().find(|r| r.matches_search(term, query)) {
                        info!(%term, task_id = ?row.task_id, "dataset row found by search");
                        return Some(row.into_record());
                    }
                    debug!(%term, "no matching row in search results");
                }
                Err(e) => warn!(%term, error = %e, "dataset search failed"),
            }
        }

        match self.scan().await {
            Ok(rows) => {
                let found = rows.into_iter().find(|r| r.matches_scan(query));
                match &found {
                    Some(row) => info!(task_id = ?row.task_id, "dataset row found by scan"),
                    None => info!("no dataset row matches"),
                }
                found.map(DatasetRow::into_record)
            }
            Err(e) => {
                warn!(error = %e, "dataset scan failed");
                None
            }
        }
    }

    async fn search(&self, term: &str) -> Result<Vec<DatasetRow>> {
        let length = self.config.search_length.to_string();
        self.get_rows(
            "search",
            &[("query", term), ("offset", "0"), ("length", &length)],
        )
        .await
    }

    async fn scan(&self) -> Result<Vec<DatasetRow>> {
        let length = self.config.scan_length.to_string();
        self.get_rows("rows", &[("offset", "0"), ("length", &length)])
            .await
    }

    async fn get_rows(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<DatasetRow>> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                LeetTutorError::config(format!("base URL cannot have a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .push(endpoint);

        url.query_pairs_mut()
            .append_pair("dataset", &self.config.dataset)
            .append_pair("config", &self.config.config)
            .append_pair("split", &self.config.split)
            .extend_pairs(params);

        debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| LeetTutorError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeetTutorError::Network(format!("{url}: HTTP {status}")));
        }

        let body: RowsResponse = response
            .json()
            .await
            .map_err(|e| LeetTutorError::Network(format!("{url}: invalid response body: {e}")))?;

        Ok(body.rows.into_iter().map(|envelope| envelope.row).collect())
    }
}
