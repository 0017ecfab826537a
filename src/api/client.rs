use serde::Deserialize;

use super::query::Query;
use crate::config::Config;
use crate::data::{RowTable, Value};

/// Client for the RescueTime analytic API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    api_url: String,
    api_token: String,
}

/// Raw report body
#[derive(Debug, Deserialize)]
struct ReportResponse {
    #[serde(default)]
    row_headers: Option<Vec<String>>,
    #[serde(default)]
    rows: Option<Vec<Vec<Value>>>,
    /// Set by the API instead of a report when the request is rejected
    #[serde(default)]
    error: Option<String>,
}

impl ApiClient {
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_token: api_token.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_url, &config.api_token)
    }

    /// Full parameter list for a query: credentials, format, then query fields
    fn params(&self, query: &Query) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("key", self.api_token.clone()),
            ("format", "json".to_string()),
        ];
        params.extend(query.to_params());
        params
    }

    /// Fetch one report and normalize it into a [`RowTable`]
    pub async fn fetch(&self, query: &Query) -> Result<RowTable, FetchError> {
        if !query.resolution_applies() {
            tracing::warn!(
                ?query,
                "resolution_time only applies to the interval perspective"
            );
        }

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&self.params(query))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Transport(format!(
                "API returned status {}: {}",
                status,
                body.trim()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let table = parse_report(&body)?;

        if let Some(column) = missing_key_column(query, &table) {
            tracing::warn!(
                restrict_kind = ?query.restrict_kind,
                key_column = column,
                "Report is missing its key column"
            );
        }

        tracing::debug!(
            restrict_kind = ?query.restrict_kind,
            rows = table.row_count(),
            "Fetched report\n{}",
            table
        );

        Ok(table)
    }
}

/// Key column the query's report kind should carry but `table` lacks
fn missing_key_column(query: &Query, table: &RowTable) -> Option<&'static str> {
    query
        .schema()
        .map(|schema| schema.key_column)
        .filter(|column| !table.has_column(column))
}

/// Parse a report body into a normalized table
pub fn parse_report(body: &str) -> Result<RowTable, FetchError> {
    let report: ReportResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Malformed(format!("invalid report JSON: {}", e)))?;

    if let Some(error) = report.error {
        return Err(FetchError::Malformed(format!("API error: {}", error)));
    }

    let headers = report
        .row_headers
        .ok_or_else(|| FetchError::Malformed("missing row_headers".to_string()))?;
    let rows = report
        .rows
        .ok_or_else(|| FetchError::Malformed("missing rows".to_string()))?;

    RowTable::from_report(headers, rows).map_err(|e| FetchError::Malformed(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::{ResolutionTime, RestrictKind};
    use mockito::Matcher;

    const OVERVIEW_BODY: &str = r#"{
        "notes": "data is an array of arrays (rows), column names for rows in row_headers",
        "row_headers": ["Rank", "Time Spent (seconds)", "Number of People", "Category"],
        "rows": [
            [1, 5400, 1, "Software Development"],
            [2, 2730, 1, "Entertainment"]
        ]
    }"#;

    #[test]
    fn test_parse_report() {
        let table = parse_report(OVERVIEW_BODY).unwrap();
        assert_eq!(table.row_count(), 2);
        let spent = table
            .lookup("Time", "Category", &Value::from("Entertainment"))
            .unwrap();
        assert_eq!(spent, Some(&Value::Int(45)));
    }

    #[test]
    fn test_parse_report_malformed() {
        for body in [
            "not json",
            r#"{"rows": []}"#,
            r#"{"row_headers": []}"#,
            r#"{"row_headers": ["a"], "rows": [[1, 2]]}"#,
            r#"{"row_headers": ["a"], "rows": {"a": 1}}"#,
            r##"{"error": "# key not found", "messages": "key not found"}"##,
        ] {
            assert!(
                matches!(parse_report(body), Err(FetchError::Malformed(_))),
                "expected malformed for {}",
                body
            );
        }
    }

    #[test]
    fn test_missing_key_column() {
        let table = parse_report(OVERVIEW_BODY).unwrap();
        assert_eq!(
            missing_key_column(&Query::rank(RestrictKind::Overview), &table),
            None
        );
        assert_eq!(
            missing_key_column(&Query::rank(RestrictKind::Activity), &table),
            Some("Activity")
        );
        assert_eq!(missing_key_column(&Query::default(), &table), None);
    }

    #[test]
    fn test_params_include_key_and_format() {
        let client = ApiClient::new("http://localhost", "secret");
        let params = client.params(&Query::rank(RestrictKind::Overview));
        assert_eq!(params[0], ("key", "secret".to_string()));
        assert_eq!(params[1], ("format", "json".to_string()));
        assert_eq!(params.len(), 4);
    }

    #[tokio::test]
    async fn test_fetch_sends_query_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "secret".into()),
                Matcher::UrlEncoded("format".into(), "json".into()),
                Matcher::UrlEncoded("perspective".into(), "interval".into()),
                Matcher::UrlEncoded("restrict_kind".into(), "productivity".into()),
                Matcher::UrlEncoded("resolution_time".into(), "day".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"row_headers": ["Date", "Time Spent (seconds)", "Number of People", "Productivity"],
                    "rows": [["2024-03-01T00:00:00", 7200, 1, 2], ["2024-03-01T00:00:00", 4830, 1, 1]]}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), "secret");
        let table = client
            .fetch(&Query::interval(RestrictKind::Productivity, ResolutionTime::Day))
            .await
            .unwrap();

        mock.assert_async().await;
        let productive = table
            .lookup("Time", "Productivity", &Value::Int(1))
            .unwrap();
        assert_eq!(productive, Some(&Value::Int(80)));
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), "secret");
        let err = client
            .fetch(&Query::rank(RestrictKind::Overview))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(ref msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_transport_error() {
        let client = ApiClient::new("http://127.0.0.1:1", "secret");
        let err = client
            .fetch(&Query::rank(RestrictKind::Overview))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), "secret");
        let err = client
            .fetch(&Query::rank(RestrictKind::Overview))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }
}
