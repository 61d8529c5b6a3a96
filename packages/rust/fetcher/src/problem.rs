//! Primary problem API client.

use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use leettutor_shared::{FetchConfig, LeetTutorError, ProblemRecord, Result};

/// Client for the primary problem API.
#[derive(Debug, Clone)]
pub struct ProblemClient {
    client: Client,
    base_url: Url,
}

impl ProblemClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            client: crate::build_client(config.timeout_secs)?,
            base_url: crate::parse_base_url(&config.api_base_url)?,
        })
    }

    /// Fetch a problem by numeric id or slug.
    ///
    /// The identifier is sent as-is (percent-encoded as one path segment); an
    /// unknown identifier surfaces as the service's non-2xx answer.
    #[instrument(skip(self))]
    pub async fn fetch_problem(&self, identifier: &str) -> Result<ProblemRecord> {
        let url = self.endpoint(&["problem", identifier])?;
        let record = self.get_record(url).await?;
        info!(title = %record.title, difficulty = %record.difficulty, "problem fetched");
        Ok(record)
    }

    /// Fetch today's daily challenge.
    #[instrument(skip(self))]
    pub async fn fetch_daily(&self) -> Result<ProblemRecord> {
        let url = self.endpoint(&["daily"])?;
        let record = self.get_record(url).await?;
        info!(title = %record.title, "daily challenge fetched");
        Ok(record)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                LeetTutorError::config(format!("base URL cannot have a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_record(&self, url: Url) -> Result<ProblemRecord> {
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

        response
            .json::<ProblemRecord>()
            .await
            .map_err(|e| LeetTutorError::Network(format!("{url}: invalid response body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture(name: &str) -> String {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/json")
            .join(name);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    fn config_for(server: &MockServer) -> FetchConfig {
        FetchConfig {
            api_base_url: server.uri(),
            timeout_secs: 5,
            dataset: None,
        }
    }

    #[tokio::test]
    async fn fetch_problem_parses_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/problem/1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(fixture("problem-two-sum.json")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ProblemClient::new(&config_for(&server)).unwrap();
        let record = client.fetch_problem("1").await.unwrap();

        assert_eq!(record.title, "Two Sum");
        assert_eq!(record.title_slug.as_deref(), Some("two-sum"));
        assert_eq!(record.code_snippets.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            record.example_testcases.as_deref(),
            Some("[2,7,11,15]\n9\n[0,1]\n")
        );
    }

    #[tokio::test]
    async fn fetch_problem_by_slug() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/problem/two-sum"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(fixture("problem-two-sum.json")),
            )
            .mount(&server)
            .await;

        let client = ProblemClient::new(&config_for(&server)).unwrap();
        let record = client.fetch_problem("two-sum").await.unwrap();
        assert_eq!(record.frontend_id(), Some("1"));
    }

    #[tokio::test]
    async fn not_found_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/problem/99999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ProblemClient::new(&config_for(&server)).unwrap();
        let err = client.fetch_problem("99999").await.unwrap_err();

        assert!(matches!(err, LeetTutorError::Network(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn malformed_body_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/daily"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = ProblemClient::new(&config_for(&server)).unwrap();
        let err = client.fetch_daily().await.unwrap_err();
        assert!(err.to_string().contains("invalid response body"));
    }

    #[tokio::test]
    async fn fetch_daily_uses_daily_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/daily"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(fixture("problem-no-snippets.json")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ProblemClient::new(&config_for(&server)).unwrap();
        let record = client.fetch_daily().await.unwrap();
        assert_eq!(record.title, "Reverse Linked List");
        assert_eq!(record.question_frontend_id.as_deref(), Some("206"));
        assert!(record.code_snippets.is_none());
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let config = FetchConfig {
            api_base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            dataset: None,
        };
        let client = ProblemClient::new(&config).unwrap();
        let err = client.fetch_problem("1").await.unwrap_err();
        assert!(matches!(err, LeetTutorError::Network(_)));
    }

    #[test]
    fn endpoint_encodes_identifier_and_keeps_base_path() {
        let config = FetchConfig {
            api_base_url: "https://api.example.com/v1".into(),
            timeout_secs: 5,
            dataset: None,
        };
        let client = ProblemClient::new(&config).unwrap();
        let url = client.endpoint(&["problem", "two sum"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/problem/two%20sum");
    }
}
