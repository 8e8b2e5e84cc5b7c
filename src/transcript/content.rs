use serde_json::{Map, Value};

use super::record::{Content, ContentBlock};

const MAX_COMMAND_LEN: usize = 200;
const QUESTION_MARKER: &str = "질문";

/// Tools whose `tool_use` blocks get a dedicated label.
///
/// Closed set: every other tool name falls into [`ToolCall::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCall<'a> {
    /// Read, Glob and Grep.
    Lookup(&'a str),
    /// Edit and Write.
    FileWrite(&'a str),
    Bash,
    AskUserQuestion,
    Task,
    Skill,
    Other(&'a str),
}

impl<'a> ToolCall<'a> {
    pub fn from_name(name: &'a str) -> Self {
        match name {
            "Read" | "Glob" | "Grep" => ToolCall::Lookup(name),
            "Edit" | "Write" => ToolCall::FileWrite(name),
            "Bash" => ToolCall::Bash,
            "AskUserQuestion" => ToolCall::AskUserQuestion,
            "Task" => ToolCall::Task,
            "Skill" => ToolCall::Skill,
            other => ToolCall::Other(other),
        }
    }

    /// Render the one-line labels for this call. Questions yield one label each.
    pub fn labels(self, input: &Map<String, Value>) -> Vec<String> {
        match self {
            ToolCall::Lookup(name) => {
                let target = Some(str_param(input, "file_path"))
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| str_param(input, "pattern"));
                vec![format!("[Tool: {name} → {target}]")]
            }
            ToolCall::FileWrite(name) => {
                vec![format!("[Tool: {name} → {}]", str_param(input, "file_path"))]
            }
            ToolCall::Bash => {
                let description = str_param(input, "description");
                let label = if description.is_empty() {
                    truncate(str_param(input, "command"), MAX_COMMAND_LEN)
                } else {
                    description.to_string()
                };
                vec![format!("[Tool: Bash → `{label}`]")]
            }
            ToolCall::AskUserQuestion => input
                .get("questions")
                .and_then(|q| q.as_array())
                .map(|questions| {
                    questions
                        .iter()
                        .map(|q| {
                            let text = q.get("question").and_then(|t| t.as_str()).unwrap_or_default();
                            format!("[{QUESTION_MARKER}: {text}]")
                        })
                        .collect()
                })
                .unwrap_or_default(),
            ToolCall::Task => {
                vec![format!("[Tool: Task → {}]", str_param(input, "description"))]
            }
            ToolCall::Skill => vec![format!("[Skill: {}]", str_param(input, "skill"))],
            ToolCall::Other(name) => vec![format!("[Tool: {name}]")],
        }
    }
}

/// Flatten a record's content into display text.
///
/// Block outputs that are blank are dropped; the rest are joined by newlines.
pub fn extract_text(content: &Content) -> String {
    match content {
        Content::Text(text) => text.clone(),
        Content::Blocks(blocks) => {
            let mut parts: Vec<String> = Vec::new();
            for block in blocks {
                match block {
                    ContentBlock::Text(text) | ContentBlock::Raw(text) => parts.push(text.clone()),
                    ContentBlock::ToolUse { name, input } => {
                        parts.extend(ToolCall::from_name(name).labels(input));
                    }
                    // Tool output and reasoning stay out of the document.
                    ContentBlock::ToolResult | ContentBlock::Thinking | ContentBlock::Unknown => {}
                }
            }
            parts.retain(|p| !p.trim().is_empty());
            parts.join("\n")
        }
        Content::Other(value) => value.to_string(),
    }
}

fn str_param<'a>(input: &'a Map<String, Value>, key: &str) -> &'a str {
    input.get(key).and_then(|v| v.as_str()).unwrap_or_default()
}

/// Truncate to `max_chars` characters, appending `...` when anything was cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
