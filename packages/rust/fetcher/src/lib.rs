//! Remote data sources for LeetTutor.
//!
//! - [`ProblemClient`] reads problems from the primary problem API
//!   (`/problem/{id}`, `/daily`). Any non-2xx answer or transport failure is a
//!   [`LeetTutorError::Network`](leettutor_shared::LeetTutorError::Network).
//! - [`DatasetClient`] looks a problem up in the public dataset server when the
//!   primary API has no starter code. It never fails: an unreachable service or
//!   a miss yields `None`.

mod dataset;
mod problem;

use std::time::Duration;

use reqwest::Client;

use leettutor_shared::{LeetTutorError, Result};

pub use dataset::{DatasetClient, FallbackQuery, slugify};
pub use problem::ProblemClient;

/// User-Agent string for all outbound requests.
const USER_AGENT: &str = concat!("LeetTutor/", env!("CARGO_PKG_VERSION"));

/// Build a reqwest client with the shared settings.
fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| LeetTutorError::Network(format!("failed to build HTTP client: {e}")))
}

/// Parse a configured base URL.
fn parse_base_url(raw: &str) -> Result<url::Url> {
    url::Url::parse(raw)
        .map_err(|e| LeetTutorError::config(format!("invalid base URL '{raw}': {e}")))
}
