use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use tracing::debug;

use super::content::extract_text;
use super::record::{RawEntry, Record};
use super::tags::strip_system_tags;
use super::timestamp::local_clock;

/// A normalized, display-ready turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: String,
    pub text: String,
    /// Clock time in the display offset, or the raw value if it did not parse.
    pub display_timestamp: String,
    pub raw_timestamp: String,
}

impl Message {
    pub fn is_user(&self) -> bool {
        self.role == "user"
    }
}

/// All surviving messages of one session file, in file order.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    pub session_id: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn first_user_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_user())
    }
}

/// Turn a record into a message, or `None` if it does not belong in the document.
pub fn filter_record(record: &Record) -> Option<Message> {
    if !record.is_conversational() || record.is_sidechain {
        return None;
    }

    let text = strip_system_tags(&extract_text(&record.content));
    if text.trim().is_empty() {
        return None;
    }

    Some(Message {
        role: record.role.clone(),
        text,
        display_timestamp: local_clock(&record.timestamp),
        raw_timestamp: record.timestamp.clone(),
    })
}

/// Parse a Claude Code session JSONL file into a conversation.
/// Streams line-by-line; malformed lines are skipped.
pub fn parse_session(path: &Path) -> anyhow::Result<Conversation> {
    let session_id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!("parsing {}", path.display());

    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let mut conversation = Conversation {
        session_id,
        messages: Vec::new(),
    };

    for (idx, line) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = match line {
            Ok(l) => l,
            // Invalid UTF-8 only spoils this line; any other read error is the file's.
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                debug!("skipping undecodable line {line_num}: {e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let entry: RawEntry = match serde_json::from_str(line) {
            Ok(e) => e,
            Err(e) => {
                debug!("skipping invalid JSON at line {line_num}: {e}");
                continue;
            }
        };

        if let Some(message) = filter_record(&Record::from_entry(entry)) {
            conversation.messages.push(message);
        }
    }

    debug!("found {} messages", conversation.messages.len());
    Ok(conversation)
}
