//! Prompt templates for the routing phase

use crate::routing::ModelRoute;
use crate::tool::ToolDefinition;

/// Templates for the fast classifier models
pub struct RouterPromptTemplate;

impl RouterPromptTemplate {
    /// System prompt for the model classifier.
    ///
    /// `routes` pairs each selectable route with a short capability note.
    pub fn model_router_system(routes: &[(ModelRoute, String)]) -> String {
        let mut prompt = String::from(
            "Analyze the user's latest query and select the best model to handle it.\n\nModel capabilities:\n",
        );

        for (route, capability) in routes {
            prompt.push_str(&format!("- {}: {}\n", route, capability));
        }

        prompt.push_str(
            r#"
Consider:
- Query complexity (simple vs. multi-step reasoning)
- Domain (technical, creative, general)
- User intent (quick answer vs. detailed analysis)

Always provide reasoning for your selection.

Respond with a single JSON object and nothing else:
{"model": "<one of the model identifiers above>", "reasoning": "<one sentence>"}"#,
        );

        prompt
    }

    /// System prompt for the tool classifier
    pub fn tool_router_system(tools: &[ToolDefinition]) -> String {
        let mut prompt = String::from(
            "Analyze the user's query and select which tools are needed to answer it.\n\nAvailable tools:\n",
        );

        for tool in tools {
            prompt.push_str(&format!("- {}: {}\n", tool.name, tool.description));
        }

        prompt.push_str(
            r#"
Rules:
- Only select tools that are NECESSARY for the query
- If the query needs multiple tools, select all relevant ones
- If no tools are needed (general knowledge, simple Q&A), return empty list
- Be conservative - don't select tools unless truly needed

Examples:
- "What is 5 factorial?" → ["calculator"]
- "Who won the 2024 Super Bowl?" → ["tavily_search"]
- "Calculate 5! and search for Python news" → ["calculator", "tavily_search"]
- "What is the capital of France?" → []

Respond with a single JSON object and nothing else:
{"tools": ["<tool name>", ...], "reasoning": "<one sentence>"}"#,
        );

        prompt
    }
}
