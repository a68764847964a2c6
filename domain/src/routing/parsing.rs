//! Parsing classifier decisions out of free-form model output.
//!
//! Classifiers are asked to answer with a single JSON object, but fast models
//! often wrap it in prose or code fences. These functions pull the first
//! top-level object out of the text and deserialize it. They never fail
//! loudly: `None` means the output could not be understood.

use super::decision::{RouteDecision, ToolDecision};

/// Return the first balanced top-level `{...}` in `raw`, if any.
///
/// Braces inside JSON strings are respected.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let mut start = None;
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in raw.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' if start.is_some() => in_string = true,
            '{' => {
                start.get_or_insert(idx);
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|s| &raw[s..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a `{"model": "...", "reasoning": "..."}` answer.
pub fn parse_route_decision(raw: &str) -> Option<RouteDecision> {
    let json = extract_json_object(raw)?;
    serde_json::from_str(json).ok()
}

/// Parse a `{"tools": [...], "reasoning": "..."}` answer.
///
/// A bare JSON array of names is accepted as well.
pub fn parse_tool_decision(raw: &str) -> Option<ToolDecision> {
    if let Some(json) = extract_json_object(raw) {
        return serde_json::from_str(json).ok();
    }
    let trimmed = raw.trim();
    let (start, end) = (trimmed.find('[')?, trimmed.rfind(']')?);
    if end < start {
        return None;
    }
    let tools: Vec<String> = serde_json::from_str(&trimmed[start..=end]).ok()?;
    Some(ToolDecision {
        tools,
        reasoning: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_object_from_prose_and_fences() {
        let raw = "Sure!\n```json\n{\"model\": \"openai:gpt-5\", \"reasoning\": \"use {braces}\"}\n```";
        assert_eq!(
            extract_json_object(raw),
            Some("{\"model\": \"openai:gpt-5\", \"reasoning\": \"use {braces}\"}")
        );
    }

    #[test]
    fn test_extract_nested_object() {
        let raw = r#"x {"a": {"b": 1}} {"c": 2}"#;
        assert_eq!(extract_json_object(raw), Some(r#"{"a": {"b": 1}}"#));
    }

    #[test]
    fn test_extract_unbalanced_returns_none() {
        assert_eq!(extract_json_object("{\"a\": 1"), None);
        assert_eq!(extract_json_object("no json here"), None);
    }

    #[test]
    fn test_parse_route_decision() {
        let decision =
            parse_route_decision(r#"{"model": "openai:gpt-5", "reasoning": "simple"}"#).unwrap();
        assert_eq!(decision.model.as_str(), "openai:gpt-5");
        assert_eq!(decision.reasoning.as_deref(), Some("simple"));

        let decision = parse_route_decision(r#"{"model": "x:y"}"#).unwrap();
        assert!(decision.reasoning.is_none());

        assert!(parse_route_decision(r#"{"reasoning": "no model"}"#).is_none());
    }

    #[test]
    fn test_parse_tool_decision_object_and_array() {
        let decision = parse_tool_decision(r#"{"tools": ["calculator"], "reasoning": "math"}"#).unwrap();
        assert_eq!(decision.tools, vec!["calculator"]);

        let decision = parse_tool_decision(r#"Tools: ["calculator", "tavily_search"]"#).unwrap();
        assert_eq!(decision.tools, vec!["calculator", "tavily_search"]);

        let decision = parse_tool_decision(r#"{"tools": []}"#).unwrap();
        assert!(decision.tools.is_empty());

        assert!(parse_tool_decision("none needed").is_none());
    }
}
