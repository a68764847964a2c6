//! Console output for use-case results

use colored::Colorize;
use parley_application::{ConversationSummary, ModelEntry, SendMessageOutput};
use parley_domain::{ModelMessage, RequestPart, ResponsePart};

/// Formats use-case results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The reply followed by a one-line footer
    pub fn format_reply(output: &SendMessageOutput) -> String {
        format!(
            "{}\n\n{}\n",
            output.reply,
            format!(
                "conversation {} · {} messages · {} tokens",
                output.conversation_id, output.message_count, output.total_tokens
            )
            .dimmed()
        )
    }

    pub fn format_summary(summary: &ConversationSummary) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!(
            "Conversation {}",
            summary.conversation_id
        )));
        output.push_str(&format!(
            "{} {}   {} {}   {} {}\n",
            "Status:".cyan().bold(),
            summary.status,
            "Messages:".cyan().bold(),
            summary.message_count,
            "Tokens:".cyan().bold(),
            summary.total_tokens
        ));

        for message in summary.history.message_content() {
            output.push('\n');
            output.push_str(&Self::format_message(message));
        }

        output
    }

    fn format_message(message: &ModelMessage) -> String {
        let mut lines = Vec::new();
        match message {
            ModelMessage::Request(request) => {
                for part in &request.parts {
                    match part {
                        RequestPart::UserPrompt { content } => {
                            lines.push(format!("{} {}", "you>".green().bold(), content));
                        }
                        RequestPart::SystemPrompt { content } => {
                            lines.push(format!("{} {}", "system>".dimmed(), content));
                        }
                        RequestPart::ToolReturn {
                            tool_name, content, ..
                        } => {
                            lines.push(format!(
                                "{} {}",
                                format!("{}>", tool_name).magenta(),
                                content
                            ));
                        }
                    }
                }
            }
            ModelMessage::Response(response) => {
                let label = response.model_name.as_deref().unwrap_or("model");
                for part in &response.parts {
                    match part {
                        ResponsePart::Text { content } => {
                            lines.push(format!("{} {}", format!("{}>", label).yellow().bold(), content));
                        }
                        ResponsePart::ToolCall {
                            tool_name, args, ..
                        } => {
                            lines.push(format!(
                                "{} calls {}({})",
                                format!("{}>", label).yellow(),
                                tool_name,
                                args
                            ));
                        }
                    }
                }
            }
        }
        lines.join("\n") + "\n"
    }

    pub fn format_models(models: &[ModelEntry]) -> String {
        let mut output = String::new();
        let width = models
            .iter()
            .map(|m| m.identifier.len())
            .max()
            .unwrap_or(0);

        for model in models {
            let marker = if model.is_default { "*" } else { " " };
            output.push_str(&format!(
                "{} {:<width$}  {:<8}  {}\n",
                marker.green().bold(),
                model.identifier,
                model.tier_class.to_string(),
                model.notes.as_deref().unwrap_or("").dimmed(),
                width = width
            ));
        }
        output
    }

    /// Configuration sources and whether each exists
    pub fn format_config_sources(sources: &[(String, bool)]) -> String {
        let mut output = Self::header("Configuration files");
        for (path, exists) in sources {
            let status = if *exists {
                "found".green()
            } else {
                "missing".dimmed()
            };
            output.push_str(&format!("  [{}] {}\n", status, path));
        }
        output
    }

    pub fn format_json<T: serde::Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    fn header(title: &str) -> String {
        format!("{}\n{}\n", title.bold(), "─".repeat(title.chars().count()))
    }
}
