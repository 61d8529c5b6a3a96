//! Best-effort parsing of JSON documents embedded in API string fields.
//!
//! The problem API ships `stats` and `similarQuestions` as JSON-encoded
//! strings, and the dataset ships loosely typed test cases. Malformed values
//! must never fail a command: [`parse_embedded`] reports them as
//! [`LeetTutorError::Parse`] and [`recover`] maps that to an absent value.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{LeetTutorError, Result};

/// Parse `raw` as JSON into `T`, naming `field` in the error.
pub fn parse_embedded<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| LeetTutorError::parse(format!("{field}: {e}")))
}

/// Turn a best-effort parse result into an optional value, logging failures.
pub fn recover<T>(result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "ignoring malformed embedded field");
            None
        }
    }
}
