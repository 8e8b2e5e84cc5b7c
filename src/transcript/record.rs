use serde::Deserialize;
use serde_json::{Map, Value};

/// One line of a Claude Code session transcript, as it appears on disk.
///
/// Fields are kept loose (`Value`) so that an unexpected shape on one field
/// never rejects the whole line; [`Record::from_entry`] narrows them.
#[derive(Debug, Deserialize)]
pub struct RawEntry {
    #[serde(rename = "type", default)]
    kind: Value,
    #[serde(rename = "isSidechain", default)]
    is_sidechain: Value,
    #[serde(default)]
    timestamp: Value,
    #[serde(default)]
    message: Value,
}

/// A transcript line narrowed to the fields the exporter reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub kind: String,
    pub role: String,
    pub content: Content,
    pub timestamp: String,
    pub is_sidechain: bool,
}

/// The `message.content` field: either a bare string or a list of blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Blocks(Vec<ContentBlock>),
    /// Anything else; rendered through its JSON text.
    Other(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    ToolUse { name: String, input: Map<String, Value> },
    ToolResult,
    Thinking,
    /// A bare string sitting directly in the block list.
    Raw(String),
    /// An object with an unrecognized `type`; contributes nothing.
    Unknown,
}

impl Record {
    pub fn from_entry(entry: RawEntry) -> Self {
        let kind = entry.kind.as_str().unwrap_or_default().to_string();
        let role = entry
            .message
            .get("role")
            .and_then(|r| r.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| kind.clone());
        let content = entry
            .message
            .get("content")
            .map(Content::from_value)
            .unwrap_or_else(|| Content::Text(String::new()));
        let timestamp = entry.timestamp.as_str().unwrap_or_default().to_string();

        Self {
            kind,
            role,
            content,
            timestamp,
            is_sidechain: is_truthy(&entry.is_sidechain),
        }
    }

    /// Only user and assistant turns belong to the conversation narrative.
    pub fn is_conversational(&self) -> bool {
        matches!(self.kind.as_str(), "user" | "assistant")
    }
}

impl Content {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Content::Text(s.clone()),
            Value::Array(items) => Content::Blocks(items.iter().map(ContentBlock::from_value).collect()),
            other => Content::Other(other.clone()),
        }
    }
}

impl ContentBlock {
    pub fn from_value(value: &Value) -> Self {
        let obj = match value {
            Value::String(s) => return ContentBlock::Raw(s.clone()),
            Value::Object(obj) => obj,
            _ => return ContentBlock::Unknown,
        };

        match obj.get("type").and_then(|t| t.as_str()) {
            Some("text") => ContentBlock::Text(
                obj.get("text")
                    .and_then(|t| t.as_str())
                    .unwrap_or_default()
                    .to_string(),
            ),
            Some("tool_use") => ContentBlock::ToolUse {
                name: obj
                    .get("name")
                    .and_then(|n| n.as_str())
                    .unwrap_or("unknown")
                    .to_string(),
                input: obj
                    .get("input")
                    .and_then(|i| i.as_object())
                    .cloned()
                    .unwrap_or_default(),
            },
            Some("tool_result") => ContentBlock::ToolResult,
            Some("thinking") => ContentBlock::Thinking,
            _ => ContentBlock::Unknown,
        }
    }
}

/// JSON truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
