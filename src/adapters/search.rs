use crate::core::pipeline::MAX_SEARCH_RESULTS;
use crate::domain::model::SearchResult;
use crate::domain::ports::{ConfigProvider, SearchGateway, SearchRequest};
use crate::utils::error::{Result, RoadmapError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const GOOGLE_CUSTOM_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    snippet: Option<String>,
    link: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Google Custom Search JSON API client.
pub struct GoogleSearchGateway {
    client: Client,
    endpoint: String,
    api_key: String,
    engine_id: String,
}

impl GoogleSearchGateway {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        engine_id: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            config.search_endpoint(),
            config.search_api_key(),
            config.search_engine_id(),
        )
    }
}

#[async_trait]
impl SearchGateway for GoogleSearchGateway {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let num = request.num.clamp(1, MAX_SEARCH_RESULTS);
        tracing::debug!("Making search request to: {} (num={})", self.endpoint, num);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", request.query.as_str()),
            ])
            .query(&[("num", num)])
            .send()
            .await
            .map_err(|e| RoadmapError::upstream(None, e.to_string()))?;

        let status = response.status();
        tracing::debug!("Search API response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| RoadmapError::upstream(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(RoadmapError::upstream(Some(status.as_u16()), message));
        }

        let parsed: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            RoadmapError::upstream(
                Some(status.as_u16()),
                format!("malformed search response: {}", e),
            )
        })?;

        Ok(parsed
            .items
            .into_iter()
            .take(num)
            .map(|item| SearchResult::new(item.title, item.snippet, item.link))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FALLBACK_SNIPPET;
    use httpmock::prelude::*;

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            num: 10,
        }
    }

    #[tokio::test]
    async fn test_search_maps_items_in_order() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/customsearch/v1")
                .query_param("key", "test-key")
                .query_param("cx", "engine-1")
                .query_param("q", "Rust tutorial course learn")
                .query_param("num", "10");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "items": [
                        {"title": "The Rust Book", "snippet": "Learn Rust", "link": "https://doc.rust-lang.org/book/"},
                        {"title": "Rust on YouTube", "link": "https://youtube.com/watch?v=1"}
                    ]
                }));
        });

        let gateway = GoogleSearchGateway::new(server.url("/customsearch/v1"), "test-key", "engine-1");
        let results = gateway.search(&request("Rust tutorial course learn")).await.unwrap();

        api_mock.assert();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "The Rust Book");
        assert_eq!(results[0].snippet, "Learn Rust");
        assert_eq!(results[1].snippet, FALLBACK_SNIPPET);
        assert_eq!(results[1].link, "https://youtube.com/watch?v=1");
    }

    #[tokio::test]
    async fn test_missing_items_is_empty_list() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/customsearch/v1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"searchInformation": {"totalResults": "0"}}));
        });

        let gateway = GoogleSearchGateway::new(server.url("/customsearch/v1"), "k", "cx");
        let results = gateway.search(&request("nothing")).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_reports_status_and_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/customsearch/v1");
            then.status(403)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "error": {"code": 403, "message": "Daily Limit Exceeded"}
                }));
        });

        let gateway = GoogleSearchGateway::new(server.url("/customsearch/v1"), "k", "cx");
        let err = gateway.search(&request("rust")).await.unwrap_err();

        match err {
            RoadmapError::Upstream { status, message } => {
                assert_eq!(status, Some(403));
                assert_eq!(message, "Daily Limit Exceeded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_results_capped_at_request_count() {
        let server = MockServer::start();
        let items: Vec<_> = (0..12)
            .map(|i| serde_json::json!({"title": format!("R{}", i), "snippet": "s", "link": format!("https://e.com/{}", i)}))
            .collect();
        server.mock(|when, then| {
            when.method(GET).path("/customsearch/v1");
            then.status(200).json_body(serde_json::json!({ "items": items }));
        });

        let gateway = GoogleSearchGateway::new(server.url("/customsearch/v1"), "k", "cx");
        let results = gateway
            .search(&SearchRequest {
                query: "rust".to_string(),
                num: 3,
            })
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[2].title, "R2");
    }
}
