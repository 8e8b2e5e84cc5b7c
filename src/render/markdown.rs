use crate::transcript::parser::Conversation;
use crate::transcript::timestamp::{local_date_minute, DISPLAY_ZONE_LABEL};

use super::topic::extract_topic;

const TITLE_SNIPPET_CHARS: usize = 80;

/// A rendered session and the topic slug it should be named after.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub markdown: String,
    pub topic: String,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.markdown.is_empty()
    }
}

/// Render a conversation as markdown. An empty conversation yields an empty document.
pub fn format_markdown(conversation: &Conversation, index: usize) -> Document {
    let messages = &conversation.messages;
    let Some(first) = messages.first() else {
        return Document::default();
    };

    let session_date =
        local_date_minute(&first.raw_timestamp).unwrap_or_else(|| "unknown".to_string());
    let title = conversation
        .first_user_message()
        .map(|m| {
            m.text
                .chars()
                .take(TITLE_SNIPPET_CHARS)
                .collect::<String>()
                .replace('\n', " ")
        })
        .unwrap_or_default();

    let mut lines = vec![
        format!("# Session {index}: {title}"),
        String::new(),
        format!("- **Session ID**: `{}`", conversation.session_id),
        format!("- **시작 시각**: {session_date} {DISPLAY_ZONE_LABEL}"),
        format!("- **메시지 수**: {}", messages.len()),
        String::new(),
        "---".to_string(),
        String::new(),
    ];

    for msg in messages {
        let role_label = if msg.is_user() { "User" } else { "Assistant" };
        lines.push(format!("### {role_label} ({})", msg.display_timestamp));
        lines.push(String::new());
        lines.push(msg.text.clone());
        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(String::new());
    }

    Document {
        markdown: lines.join("\n"),
        topic: extract_topic(messages),
    }
}
