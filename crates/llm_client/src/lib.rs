//! Extraction client.
//!
//! Turns free-text search excerpts into a structured `{value, found}`
//! reading via the Anthropic Messages API. Parsing of the model output is
//! best-effort: one sanitized retry, then degrade to not-found. A parse
//! failure never propagates to the caller.

use async_trait::async_trait;
use common::providers::ExtractionProvider;
use common::types::ExtractedValue;
use common::Error;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";

/// Anthropic Messages API client for index-value extraction.
pub struct ExtractionClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl ExtractionClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build extraction HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn build_prompt(search_content: &str, index_name: &str) -> String {
        format!(
            r#"Extract the current value of the {index_name} stock index from the following search results.

Return ONLY a JSON object in this exact format, nothing else:
{{"value": "12,345.67", "found": true}}

If you cannot find a clear value, return:
{{"value": null, "found": false}}

Search results:
{search_content}"#
        )
    }

    fn extract_text_content(response_body: &serde_json::Value) -> Result<&str, Error> {
        let content = response_body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| Error::Extraction("missing 'content' array in response".into()))?;

        content
            .iter()
            .find(|item| item["type"] == "text")
            .and_then(|item| item["text"].as_str())
            .ok_or_else(|| Error::Extraction("missing 'text' content in response".into()))
    }
}

/// Parse the model output into an `ExtractedValue`.
///
/// Tries the raw text first; if that fails, strips markdown code fences and
/// retries exactly once. A second failure degrades to not-found.
pub fn parse_extraction(raw: &str) -> ExtractedValue {
    let trimmed = raw.trim();
    if let Ok(parsed) = serde_json::from_str::<ExtractedValue>(trimmed) {
        return parsed;
    }

    let stripped = trimmed
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string();

    match serde_json::from_str::<ExtractedValue>(&stripped) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Unparseable extraction response ({}): {:?}", e, raw);
            ExtractedValue {
                value: None,
                found: false,
            }
        }
    }
}

#[async_trait]
impl ExtractionProvider for ExtractionClient {
    async fn extract_index(
        &self,
        content: &str,
        index_name: &str,
    ) -> Result<ExtractedValue, Error> {
        let payload = json!({
            "model": self.model,
            "max_tokens": 256,
            "messages": [
                {
                    "role": "user",
                    "content": Self::build_prompt(content, index_name),
                }
            ],
        });

        let resp = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Extraction(format!("HTTP error for '{}': {}", index_name, e)))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Extraction(format!(
                "API returned {} for '{}': {}",
                status,
                index_name,
                common::text::truncate(&body, 500)
            )));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::Extraction(format!("JSON parse error for '{}': {}", index_name, e)))?;

        let text = Self::extract_text_content(&body)?;
        debug!("Extraction response for '{}': {}", index_name, text);

        Ok(parse_extraction(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let parsed = parse_extraction(r#"{"value": "12,345.67", "found": true}"#);
        assert_eq!(parsed.value.as_deref(), Some("12,345.67"));
        assert!(parsed.found);
    }

    #[test]
    fn test_parse_null_value() {
        let parsed = parse_extraction(r#"{"value": null, "found": false}"#);
        assert!(parsed.value.is_none());
        assert!(!parsed.found);
    }

    #[test]
    fn test_parse_fenced_json() {
        let parsed = parse_extraction("```json\n{\"value\": \"8,210.45\", \"found\": true}\n```");
        assert_eq!(parsed.value.as_deref(), Some("8,210.45"));
        assert!(parsed.found);
    }

    #[test]
    fn test_parse_fenced_json_without_language_tag() {
        let parsed = parse_extraction("```\n{\"value\": \"910.45\", \"found\": true}\n```");
        assert_eq!(parsed.value.as_deref(), Some("910.45"));
        assert!(parsed.found);
    }

    #[test]
    fn test_parse_garbage_degrades_to_not_found() {
        let parsed = parse_extraction("I could not find a clear value for that index.");
        assert!(parsed.value.is_none());
        assert!(!parsed.found);
    }

    #[test]
    fn test_parse_whitespace_padding() {
        let parsed = parse_extraction("  \n {\"value\": \"1,350.40\", \"found\": true} \n");
        assert_eq!(parsed.value.as_deref(), Some("1,350.40"));
    }

    #[test]
    fn test_extract_text_content_picks_text_block() {
        let body = serde_json::json!({
            "content": [
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "{\"value\": \"1\", \"found\": true}"}
            ]
        });
        let text = ExtractionClient::extract_text_content(&body).expect("text present");
        assert!(text.contains("found"));
    }

    #[test]
    fn test_extract_text_content_missing_is_error() {
        let body = serde_json::json!({"content": []});
        assert!(ExtractionClient::extract_text_content(&body).is_err());
    }
}
