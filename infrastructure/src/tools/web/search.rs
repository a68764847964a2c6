//! `tavily_search` tool: search the web through the Tavily API.
//!
//! Tavily returns an optional AI summary plus ranked sources, already trimmed
//! for model consumption. Each call asks for at most five results with the
//! basic search depth and no raw page content.
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `query` | string | Yes | The search query |
//!
//! # Output Format
//!
//! ```text
//! Summary: <answer>
//!
//! Sources:
//! 1. <title>
//!    <first 200 characters of content>...
//!    <url>
//! ```

use async_trait::async_trait;
use parley_application::ports::tool::{Tool, string_arg};
use parley_domain::{ConversationHistory, ToolDefinition, ToolError, ToolParameter};
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

/// Canonical tool name for the web search tool.
pub const TAVILY_SEARCH: &str = "tavily_search";

const MAX_RESULTS: usize = 5;
const SNIPPET_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
    include_answer: bool,
    include_raw_content: bool,
}

/// Create the [`ToolDefinition`] for `tavily_search`.
pub fn tavily_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        TAVILY_SEARCH,
        "Search the web for current information: recent news, facts that may have \
         changed, real-time data. Returns a summary and the top sources.",
    )
    .with_parameter(
        ToolParameter::new(
            "query",
            "Clear, specific search query (e.g. \"latest Rust release\")",
            true,
        )
        .with_type("string"),
    )
}

pub struct TavilySearchTool {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    definition: ToolDefinition,
}

impl TavilySearchTool {
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            definition: tavily_search_definition(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Tool for TavilySearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn call(
        &self,
        args: &serde_json::Value,
        _context: &ConversationHistory,
    ) -> Result<String, ToolError> {
        let start = Instant::now();
        let query = string_arg(args, "query")?;

        let body = SearchRequest {
            api_key: &self.api_key,
            query,
            max_results: MAX_RESULTS,
            search_depth: "basic",
            include_answer: true,
            include_raw_content: false,
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ToolError::execution_failed(format!(
                "Search API returned error: {}",
                response.status()
            )));
        }

        let data: serde_json::Value = response.json().await.map_err(|e| {
            ToolError::execution_failed(format!("Failed to parse search results: {}", e))
        })?;

        debug!(
            query,
            duration_ms = start.elapsed().as_millis() as u64,
            "tavily search completed"
        );
        Ok(format_search_results(query, &data))
    }
}

/// Format a Tavily response as plain text for the model.
pub fn format_search_results(query: &str, data: &serde_json::Value) -> String {
    let Some(results) = data.get("results").and_then(|r| r.as_array()) else {
        return format!("No web results found for query: '{}'", query);
    };

    let mut parts: Vec<String> = Vec::new();

    if let Some(answer) = data["answer"].as_str()
        && !answer.is_empty()
    {
        parts.push(format!("Summary: {}\n", answer));
    }

    parts.push("Sources:".to_string());
    for (i, result) in results.iter().take(MAX_RESULTS).enumerate() {
        let title = result["title"].as_str().unwrap_or("Untitled");
        let url = result["url"].as_str().unwrap_or("");
        let snippet: String = result["content"]
            .as_str()
            .unwrap_or("")
            .chars()
            .take(SNIPPET_CHARS)
            .collect();
        parts.push(format!("{}. {}\n   {}...\n   {}\n", i + 1, title, snippet, url));
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_with_answer_and_sources() {
        let data = json!({
            "answer": "Rust 1.90 is the latest release.",
            "results": [
                {"title": "Rust Blog", "url": "https://blog.rust-lang.org", "content": "Announcing Rust 1.90"},
                {"url": "https://example.com", "content": "No title here"}
            ]
        });

        let output = format_search_results("latest rust", &data);
        assert_eq!(
            output,
            "Summary: Rust 1.90 is the latest release.\n\n\
             Sources:\n\
             1. Rust Blog\n   Announcing Rust 1.90...\n   https://blog.rust-lang.org\n\n\
             2. Untitled\n   No title here...\n   https://example.com\n"
        );
    }

    #[test]
    fn test_format_without_answer() {
        let data = json!({"answer": null, "results": [{"title": "A", "url": "u", "content": "c"}]});
        let output = format_search_results("q", &data);
        assert!(output.starts_with("Sources:\n1. A"));
        assert!(!output.contains("Summary"));
    }

    #[test]
    fn test_format_missing_results() {
        assert_eq!(
            format_search_results("nothing", &json!({})),
            "No web results found for query: 'nothing'"
        );
        assert_eq!(
            format_search_results("nothing", &serde_json::Value::Null),
            "No web results found for query: 'nothing'"
        );
    }

    #[test]
    fn test_format_truncates_and_limits() {
        let long = "x".repeat(500);
        let results: Vec<_> = (0..8)
            .map(|i| json!({"title": format!("T{i}"), "url": "u", "content": long}))
            .collect();
        let output = format_search_results("q", &json!({"results": results}));

        assert!(output.contains("5. T4"));
        assert!(!output.contains("6. T5"));
        assert!(output.contains(&format!("   {}...\n", "x".repeat(200))));
        assert!(!output.contains(&"x".repeat(201)));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let tool = TavilySearchTool::new(reqwest::Client::new(), "key", "https://api.tavily.com/");
        assert_eq!(tool.endpoint(), "https://api.tavily.com/search");
        assert_eq!(tool.name(), TAVILY_SEARCH);
    }

    #[test]
    fn test_request_body_shape() {
        let body = SearchRequest {
            api_key: "k",
            query: "q",
            max_results: MAX_RESULTS,
            search_depth: "basic",
            include_answer: true,
            include_raw_content: false,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "api_key": "k",
                "query": "q",
                "max_results": 5,
                "search_depth": "basic",
                "include_answer": true,
                "include_raw_content": false
            })
        );
    }
}
