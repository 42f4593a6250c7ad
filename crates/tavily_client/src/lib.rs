//! Tavily search client.
//!
//! Resolves `{index, country}` pairs to free-text excerpts describing the
//! current index value. The excerpts feed the extraction provider.

use async_trait::async_trait;
use common::providers::SearchProvider;
use common::types::SearchContent;
use common::Error;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const TAVILY_API_URL: &str = "https://api.tavily.com/search";
const MAX_RESULTS: u32 = 3;

/// Tavily API client with connection pooling.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

/// Join the top excerpts into one block for extraction.
fn combine_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("markets-sync/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build Tavily HTTP client");

        Self {
            client,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search_index(
        &self,
        index_name: &str,
        country: &str,
    ) -> Result<SearchContent, Error> {
        let query = format!("{} {} stock index value today", index_name, country);
        debug!("Tavily search: {}", query);

        let body = json!({
            "api_key": self.api_key,
            "query": query,
            "search_depth": "basic",
            "max_results": MAX_RESULTS,
        });

        let resp = self
            .client
            .post(TAVILY_API_URL)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Search(format!("HTTP error for '{}': {}", query, e)))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "Tavily returned {} for '{}': {}",
                status,
                query,
                common::text::truncate(&body, 500)
            )));
        }

        let data: SearchResponse = resp
            .json()
            .await
            .map_err(|e| Error::Search(format!("JSON parse error for '{}': {}", query, e)))?;

        debug!("Got {} search results for '{}'", data.results.len(), query);

        Ok(SearchContent {
            query,
            content: combine_results(&data.results),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search_response() {
        let raw = r#"{
            "query": "FTSE 100 United Kingdom stock index value today",
            "results": [
                {"title": "FTSE 100 today", "url": "https://a.example", "content": "The FTSE 100 closed at 8,210.45."},
                {"title": "Markets", "url": "https://b.example", "content": "London stocks edged higher."}
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(raw).expect("deserializes");
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].title, "FTSE 100 today");
    }

    #[test]
    fn test_combine_results_joins_with_blank_lines() {
        let results = vec![
            SearchResult {
                title: String::new(),
                url: String::new(),
                content: "first".into(),
            },
            SearchResult {
                title: String::new(),
                url: String::new(),
                content: "second".into(),
            },
        ];
        assert_eq!(combine_results(&results), "first\n\nsecond");
    }

    #[test]
    fn test_combine_results_empty() {
        assert_eq!(combine_results(&[]), "");
    }
}
