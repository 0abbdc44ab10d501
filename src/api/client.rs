//! Jira API client implementation.
//!
//! The client issues authenticated GET requests through an injected
//! [`HttpFetcher`] and exposes the handful of endpoints the reports are
//! built from. Responses follow the muted-exception contract: any body that
//! parses as JSON is handed back to the caller, whatever the status code,
//! so logical errors surface where the payload is interpreted.

use serde_json::Value;
use tracing::{debug, instrument};

use super::auth::Auth;
use super::error::{ApiError, Result};
use super::fetch::HttpFetcher;
use super::types::{Issue, Sprint, SprintReport};
use crate::config::Credentials;

/// The Jira API client.
///
/// Holds the normalized base URL and the Basic-Auth header; all network IO
/// goes through the fetcher. There is no retry policy: every request failure
/// is fatal to the current action.
#[derive(Debug)]
pub struct JiraClient<F> {
    /// The injected HTTP transport.
    fetcher: F,
    /// The base URL for the Jira instance.
    base_url: String,
    /// Authentication credentials.
    auth: Auth,
}

impl<F: HttpFetcher> JiraClient<F> {
    /// Create a client from an explicit credential object.
    pub fn new(credentials: &Credentials, fetcher: F) -> Self {
        let auth = Auth::new(&credentials.email, &credentials.token);
        let base_url = normalize_base_url(&credentials.base_url);

        Self {
            fetcher,
            base_url,
            auth,
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List all sprints of a board.
    ///
    /// Calls `GET /rest/agile/1.0/board/{boardId}/sprint`, following the
    /// `values` collection across pages.
    #[instrument(skip(self))]
    pub async fn board_sprints(&self, board_id: &str) -> Result<Vec<Sprint>> {
        let path = format!("/rest/agile/1.0/board/{}/sprint", board_id);
        let values = self.get_all(&path, "values").await?;

        debug!("Fetched {} sprints", values.len());
        values
            .into_iter()
            .map(|v| parse_payload(v, "sprint"))
            .collect()
    }

    /// List the issues of a sprint.
    ///
    /// Calls `GET /rest/agile/1.0/sprint/{sprintId}/issue`, following the
    /// `issues` collection across pages.
    #[instrument(skip(self))]
    pub async fn sprint_issues(&self, sprint_id: u64) -> Result<Vec<Issue>> {
        let path = format!("/rest/agile/1.0/sprint/{}/issue", sprint_id);
        let issues = self.get_all(&path, "issues").await?;

        debug!("Fetched {} sprint issues", issues.len());
        issues
            .into_iter()
            .map(|v| parse_payload(v, "issue"))
            .collect()
    }

    /// Search issues with a JQL query.
    ///
    /// Calls `GET /rest/api/2/search?jql=...`, following the `issues`
    /// collection across pages via `startAt`.
    #[instrument(skip(self), fields(jql = %jql))]
    pub async fn search_issues(&self, jql: &str) -> Result<Vec<Issue>> {
        let path = format!("/rest/api/2/search?jql={}", urlencoding::encode(jql));
        let issues = self.get_all(&path, "issues").await?;

        debug!("Search matched {} issues", issues.len());
        issues
            .into_iter()
            .map(|v| parse_payload(v, "issue"))
            .collect()
    }

    /// Fetch the aggregated sprint report for one sprint of a board.
    ///
    /// Calls the legacy greenhopper endpoint
    /// `GET /rest/greenhopper/latest/rapid/charts/sprintreport`.
    #[instrument(skip(self))]
    pub async fn sprint_report(&self, board_id: &str, sprint_id: u64) -> Result<SprintReport> {
        let path = format!(
            "/rest/greenhopper/latest/rapid/charts/sprintreport?rapidViewId={}&sprintId={}",
            board_id, sprint_id
        );
        let value = self.get_value(&path).await?;

        parse_payload(value, "sprint report")
    }

    /// Perform a GET request and return the parsed JSON body.
    ///
    /// A non-2xx response whose body is valid JSON is returned as-is; only
    /// transport failures and unparseable error bodies become errors.
    pub async fn get_value(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");

        let response = self.fetcher.get(&url, self.auth.header_value()).await?;

        match serde_json::from_str::<Value>(&response.body) {
            Ok(value) => Ok(value),
            Err(e) if response.is_success() => Err(ApiError::InvalidResponse(format!(
                "failed to parse response: {}",
                e
            ))),
            Err(_) => {
                let status = reqwest::StatusCode::from_u16(response.status)
                    .unwrap_or(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                Err(ApiError::from_status(status, path))
            }
        }
    }

    /// Fetch every page of a paginated collection and flatten it.
    ///
    /// Reads `total` and `maxResults` from the first page. When the first
    /// page does not already cover `total` (and the response does not declare
    /// `isLast: true`), issues one follow-up GET per remaining page with
    /// `startAt` appended, concatenating the named collection field.
    pub async fn get_all(&self, path: &str, collection: &str) -> Result<Vec<Value>> {
        let first = self.get_value(path).await?;
        let mut values = collection_values(&first, collection)?;

        let total = first.get("total").and_then(Value::as_u64);
        let max_results = first.get("maxResults").and_then(Value::as_u64);
        let is_last = first.get("isLast").and_then(Value::as_bool);

        if let (Some(total), Some(max_results)) = (total, max_results) {
            if max_results > 0 && total > max_results && is_last != Some(true) {
                // Pages needed to cover the whole collection; page 0 is
                // already in hand.
                let pages = total.div_ceil(max_results);
                for page in 1..pages {
                    let start_at = page * max_results;
                    let separator = if path.contains('?') { '&' } else { '?' };
                    let page_path = format!("{}{}startAt={}", path, separator, start_at);

                    let data = self.get_value(&page_path).await?;
                    values.extend(collection_values(&data, collection)?);
                }
            }
        }

        Ok(values)
    }
}

/// Extract the named collection field from a page payload.
fn collection_values(data: &Value, collection: &str) -> Result<Vec<Value>> {
    match data.get(collection).and_then(Value::as_array) {
        Some(values) => Ok(values.clone()),
        None => Err(ApiError::InvalidResponse(payload_error(data, collection))),
    }
}

/// Describe a payload that lacks the expected shape.
///
/// Jira reports logical errors as an `errorMessages` array; surface those
/// messages when present.
fn payload_error(data: &Value, expected: &str) -> String {
    if let Some(messages) = data.get("errorMessages").and_then(Value::as_array) {
        let joined = messages
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if !joined.is_empty() {
            return joined;
        }
    }

    format!("response has no '{}' field", expected)
}

/// Deserialize a payload into its typed shape.
fn parse_payload<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            let detail = if value.get("errorMessages").is_some() {
                payload_error(&value, what)
            } else {
                format!("failed to parse {}: {}", what, e)
            };
            Err(ApiError::InvalidResponse(detail))
        }
    }
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::api::fetch::FetchedBody;

    /// Fetcher that replays a fixed queue of responses and records the
    /// requested URLs.
    struct FakeFetcher {
        responses: Mutex<Vec<FetchedBody>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn new(bodies: Vec<&str>) -> Self {
            let responses = bodies
                .into_iter()
                .map(|body| FetchedBody {
                    status: 200,
                    body: body.to_string(),
                })
                .collect();
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_status(status: u16, body: &str) -> Self {
            Self {
                responses: Mutex::new(vec![FetchedBody {
                    status,
                    body: body.to_string(),
                }]),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpFetcher for FakeFetcher {
        async fn get(&self, url: &str, _auth_header: &str) -> Result<FetchedBody> {
            self.calls.lock().unwrap().push(url.to_string());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                panic!("unexpected request: {}", url);
            }
            Ok(responses.remove(0))
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "user@example.com".to_string(),
            token: "secret".to_string(),
            base_url: "https://example.atlassian.net/".to_string(),
            board_id: "77".to_string(),
        }
    }

    fn page(total: u64, max_results: u64, count: usize) -> String {
        let values: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"n": {}}}"#, i))
            .collect();
        format!(
            r#"{{"total": {}, "maxResults": {}, "isLast": false, "values": [{}]}}"#,
            total,
            max_results,
            values.join(",")
        )
    }

    #[test]
    fn test_normalize_base_url_removes_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net/"),
            "https://company.atlassian.net"
        );
    }

    #[test]
    fn test_normalize_base_url_handles_multiple_slashes() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net///"),
            "https://company.atlassian.net"
        );
    }

    #[tokio::test]
    async fn test_get_all_single_page() {
        let fetcher = FakeFetcher::new(vec![
            r#"{"total": 3, "maxResults": 50, "isLast": true, "values": [{}, {}, {}]}"#,
        ]);
        let client = JiraClient::new(&credentials(), fetcher);

        let values = client.get_all("/rest/agile/1.0/board/77/sprint", "values").await.unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(client.fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_get_all_follows_pages_to_cover_total() {
        let first = page(101, 50, 50);
        let second = page(101, 50, 50);
        let third = page(101, 50, 1);
        let fetcher = FakeFetcher::new(vec![first.as_str(), second.as_str(), third.as_str()]);
        let client = JiraClient::new(&credentials(), fetcher);

        let values = client.get_all("/rest/agile/1.0/board/77/sprint", "values").await.unwrap();
        assert_eq!(values.len(), 101);

        let calls = client.fetcher.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[1].ends_with("/sprint?startAt=50"));
        assert!(calls[2].ends_with("/sprint?startAt=100"));
    }

    #[tokio::test]
    async fn test_get_all_exact_multiple_issues_no_empty_page() {
        // 100 items at 50 per page need exactly one follow-up; a floor-based
        // page count would request a third, empty page.
        let first = page(100, 50, 50);
        let second = page(100, 50, 50);
        let fetcher = FakeFetcher::new(vec![first.as_str(), second.as_str()]);
        let client = JiraClient::new(&credentials(), fetcher);

        let values = client.get_all("/rest/agile/1.0/board/77/sprint", "values").await.unwrap();
        assert_eq!(values.len(), 100);
        assert_eq!(client.fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_get_all_never_truncates_tail() {
        for total in [51u64, 99, 149, 151] {
            let max = 50u64;
            let pages = total.div_ceil(max);
            let mut bodies = Vec::new();
            for p in 0..pages {
                let count = std::cmp::min(max, total - p * max) as usize;
                bodies.push(page(total, max, count));
            }
            let refs: Vec<&str> = bodies.iter().map(String::as_str).collect();
            let fetcher = FakeFetcher::new(refs);
            let client = JiraClient::new(&credentials(), fetcher);

            let values = client.get_all("/things", "values").await.unwrap();
            assert_eq!(values.len() as u64, total, "total={}", total);
            assert_eq!(client.fetcher.calls().len() as u64, pages, "total={}", total);
        }
    }

    #[tokio::test]
    async fn test_get_all_respects_is_last() {
        let fetcher = FakeFetcher::new(vec![
            r#"{"total": 100, "maxResults": 50, "isLast": true, "values": [{}]}"#,
        ]);
        let client = JiraClient::new(&credentials(), fetcher);

        let values = client.get_all("/things", "values").await.unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(client.fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_get_all_appends_start_at_after_existing_query() {
        let first = format!(
            r#"{{"total": 60, "maxResults": 50, "issues": [{}]}}"#,
            vec!["{}"; 50].join(",")
        );
        let second = r#"{"total": 60, "maxResults": 50, "issues": [{}, {}, {}, {}, {}, {}, {}, {}, {}, {}]}"#;
        let fetcher = FakeFetcher::new(vec![first.as_str(), second]);
        let client = JiraClient::new(&credentials(), fetcher);

        let values = client
            .get_all("/rest/api/2/search?jql=project%3DPROJ", "issues")
            .await
            .unwrap();
        assert_eq!(values.len(), 60);

        let calls = client.fetcher.calls();
        assert!(calls[1].ends_with("?jql=project%3DPROJ&startAt=50"));
    }

    #[tokio::test]
    async fn test_get_value_muted_error_body_passes_through() {
        let fetcher =
            FakeFetcher::with_status(400, r#"{"errorMessages": ["The JQL is invalid."]}"#);
        let client = JiraClient::new(&credentials(), fetcher);

        let value = client.get_value("/rest/api/2/search?jql=(").await.unwrap();
        assert_eq!(
            value["errorMessages"][0].as_str(),
            Some("The JQL is invalid.")
        );
    }

    #[tokio::test]
    async fn test_get_value_non_json_error_maps_status() {
        let fetcher = FakeFetcher::with_status(404, "<html>dead board</html>");
        let client = JiraClient::new(&credentials(), fetcher);

        let err = client.get_value("/rest/agile/1.0/board/0/sprint").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_all_surfaces_error_messages() {
        let fetcher = FakeFetcher::new(vec![
            r#"{"errorMessages": ["Board does not exist."]}"#,
        ]);
        let client = JiraClient::new(&credentials(), fetcher);

        let err = client.get_all("/rest/agile/1.0/board/0/sprint", "values").await.unwrap_err();
        match err {
            ApiError::InvalidResponse(msg) => assert_eq!(msg, "Board does not exist."),
            other => panic!("expected InvalidResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_board_sprints_parses_typed_values() {
        let fetcher = FakeFetcher::new(vec![
            r#"{
                "total": 2,
                "maxResults": 50,
                "isLast": true,
                "values": [
                    {"id": 1, "state": "closed", "name": "Sprint 1"},
                    {"id": 2, "state": "active", "name": "Sprint 2"}
                ]
            }"#,
        ]);
        let client = JiraClient::new(&credentials(), fetcher);

        let sprints = client.board_sprints("77").await.unwrap();
        assert_eq!(sprints.len(), 2);
        assert_eq!(sprints[1].name, "Sprint 2");

        let calls = client.fetcher.calls();
        assert_eq!(
            calls[0],
            "https://example.atlassian.net/rest/agile/1.0/board/77/sprint"
        );
    }

    #[tokio::test]
    async fn test_search_issues_encodes_jql() {
        let fetcher = FakeFetcher::new(vec![r#"{"total": 0, "maxResults": 50, "issues": []}"#]);
        let client = JiraClient::new(&credentials(), fetcher);

        let issues = client.search_issues("project = PROJ ORDER BY created DESC").await.unwrap();
        assert!(issues.is_empty());

        let calls = client.fetcher.calls();
        assert_eq!(
            calls[0],
            "https://example.atlassian.net/rest/api/2/search?jql=project%20%3D%20PROJ%20ORDER%20BY%20created%20DESC"
        );
    }

    #[tokio::test]
    async fn test_sprint_report_requests_board_and_sprint() {
        let fetcher = FakeFetcher::new(vec![r#"{"contents": {}}"#]);
        let client = JiraClient::new(&credentials(), fetcher);

        let report = client.sprint_report("77", 4511).await.unwrap();
        assert!(report.contents.completed_issues.is_empty());

        let calls = client.fetcher.calls();
        assert_eq!(
            calls[0],
            "https://example.atlassian.net/rest/greenhopper/latest/rapid/charts/sprintreport?rapidViewId=77&sprintId=4511"
        );
    }
}
