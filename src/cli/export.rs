use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::config;
use crate::render::markdown::format_markdown;
use crate::transcript::parser;

/// Options for one `export` invocation.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub project_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub exclude_current: bool,
    pub current_session: Option<String>,
    pub session: Option<String>,
}

/// State scoped to a single export run.
#[derive(Debug, Default)]
pub struct ExportRun {
    used_topics: HashMap<String, usize>,
}

impl ExportRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// First use of a topic keeps it bare; repeats get `-1`, `-2`, ...
    pub fn claim_topic(&mut self, topic: &str) -> String {
        let seen = self.used_topics.entry(topic.to_string()).or_insert(0);
        let claimed = if *seen == 0 {
            topic.to_string()
        } else {
            format!("{topic}-{seen}")
        };
        *seen += 1;
        claimed
    }
}

/// What happened to one selected session file.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Written {
        index: usize,
        path: PathBuf,
        message_count: usize,
    },
    Empty {
        index: usize,
        session_id: String,
    },
    Unreadable {
        index: usize,
        session_id: String,
    },
}

pub fn run(options: ExportOptions) -> anyhow::Result<()> {
    let project_dir = config::resolve_project_dir(options.project_dir.as_deref())?;
    std::fs::create_dir_all(&options.output_dir)?;

    let files = select_sessions(
        discover_sessions(&project_dir)?,
        options.exclude_current,
        options.current_session.as_deref(),
        options.session.as_deref(),
    );

    if files.is_empty() {
        println!("No session files found.");
        return Ok(());
    }

    println!(
        "Exporting {} session(s) to {}/",
        files.len(),
        options.output_dir.display()
    );

    let mut export_run = ExportRun::new();
    for outcome in export_sessions(&files, &options.output_dir, &mut export_run)? {
        match outcome {
            SessionOutcome::Written {
                index,
                path,
                message_count,
            } => {
                let name = path.file_name().unwrap_or_default().to_string_lossy();
                println!("  Session {index}: {name} ({message_count} messages)");
            }
            SessionOutcome::Empty { index, session_id } => {
                println!("  Session {index} ({}): empty, skipping", short_id(&session_id));
            }
            SessionOutcome::Unreadable { index, session_id } => {
                println!("  Session {index} ({}): unreadable, skipping", short_id(&session_id));
            }
        }
    }

    println!("Done.");
    Ok(())
}

/// All `*.jsonl` files directly in `dir`, oldest modification first.
pub fn discover_sessions(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(config::SESSION_EXTENSION)
        {
            continue;
        }
        let mtime = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        files.push((mtime, path));
    }

    // Stable sort; ties keep name order.
    files.sort_by(|a, b| a.1.cmp(&b.1));
    files.sort_by_key(|(mtime, _)| *mtime);
    debug!("discovered {} session file(s) in {}", files.len(), dir.display());
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Apply current-session exclusion and the `--session` substring filter.
///
/// Exclusion is by exact id only; `exclude_current` without an id excludes nothing.
pub fn select_sessions(
    mut files: Vec<PathBuf>,
    exclude_current: bool,
    current_session: Option<&str>,
    session_filter: Option<&str>,
) -> Vec<PathBuf> {
    match current_session {
        Some(current) => files.retain(|f| session_id(f) != current),
        None if exclude_current => {
            debug!("--exclude-current given without --current-session, nothing excluded");
        }
        None => {}
    }

    if let Some(filter) = session_filter {
        files.retain(|f| session_id(f).contains(filter));
    }
    files
}

/// Parse, render and write each file in order, numbering from 1.
pub fn export_sessions(
    files: &[PathBuf],
    output_dir: &Path,
    export_run: &mut ExportRun,
) -> anyhow::Result<Vec<SessionOutcome>> {
    let mut outcomes = Vec::with_capacity(files.len());

    for (idx, file) in files.iter().enumerate() {
        let index = idx + 1;
        let conversation = match parser::parse_session(file) {
            Ok(c) => c,
            Err(e) => {
                warn!("failed to read {}: {e}", file.display());
                outcomes.push(SessionOutcome::Unreadable {
                    index,
                    session_id: session_id(file),
                });
                continue;
            }
        };

        let document = format_markdown(&conversation, index);
        if document.is_empty() {
            outcomes.push(SessionOutcome::Empty {
                index,
                session_id: conversation.session_id,
            });
            continue;
        }

        let topic = export_run.claim_topic(&document.topic);
        let path = output_dir.join(format!("chatsession-{index}-{topic}.md"));
        std::fs::write(&path, &document.markdown)?;

        outcomes.push(SessionOutcome::Written {
            index,
            path,
            message_count: conversation.messages.len(),
        });
    }

    Ok(outcomes)
}

fn session_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    const USER_LINE: &str = r#"{"type":"user","message":{"role":"user","content":"Fix the bug"},"timestamp":"2026-02-21T10:00:00Z"}"#;

    fn write_session(dir: &Path, id: &str, body: &str, age_secs: u64) -> PathBuf {
        let path = dir.join(format!("{id}.jsonl"));
        std::fs::write(&path, body).unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(age_secs);
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
        path
    }

    #[test]
    fn test_claim_topic_dedup() {
        let mut run = ExportRun::new();
        assert_eq!(run.claim_topic("fix-the-bug"), "fix-the-bug");
        assert_eq!(run.claim_topic("fix-the-bug"), "fix-the-bug-1");
        assert_eq!(run.claim_topic("other"), "other");
        assert_eq!(run.claim_topic("fix-the-bug"), "fix-the-bug-2");
    }

    #[test]
    fn test_new_run_starts_clean() {
        let mut first = ExportRun::new();
        first.claim_topic("untitled");
        let mut second = ExportRun::new();
        assert_eq!(second.claim_topic("untitled"), "untitled");
    }

    #[test]
    fn test_discover_sorted_by_mtime() {
        let dir = tempfile::tempdir().unwrap();
        write_session(dir.path(), "aaa", "", 10);
        write_session(dir.path(), "bbb", "", 300);
        write_session(dir.path(), "ccc", "", 100);
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("sub.jsonl")).unwrap();

        let ids: Vec<String> = discover_sessions(dir.path())
            .unwrap()
            .iter()
            .map(|p| session_id(p))
            .collect();
        assert_eq!(ids, vec!["bbb", "ccc", "aaa"]);
    }

    #[test]
    fn test_select_sessions() {
        let files: Vec<PathBuf> = ["old-abc123", "mid-xyz", "new-abc123x"]
            .iter()
            .map(|id| PathBuf::from(format!("/p/{id}.jsonl")))
            .collect();

        let only = select_sessions(files.clone(), false, None, Some("abc123"));
        assert_eq!(only.iter().map(|p| session_id(p)).collect::<Vec<_>>(), ["old-abc123", "new-abc123x"]);

        let without = select_sessions(files.clone(), false, Some("mid-xyz"), None);
        assert_eq!(without.len(), 2);
        assert!(!without.iter().any(|p| session_id(p) == "mid-xyz"));

        // Exact id match only.
        let untouched = select_sessions(files.clone(), false, Some("mid"), None);
        assert_eq!(untouched.len(), 3);

        // The toggle alone has no id to match, so every file stays.
        let toggle_only = select_sessions(files.clone(), true, None, None);
        assert_eq!(toggle_only, files);

        let explicit = select_sessions(files, true, Some("old-abc123"), Some("abc123"));
        assert_eq!(explicit.iter().map(|p| session_id(p)).collect::<Vec<_>>(), ["new-abc123x"]);
    }

    #[test]
    fn test_export_dedups_topics_and_skips_empty() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let sidechain = r#"{"type":"user","isSidechain":true,"message":{"role":"user","content":"Fix the bug"}}"#;
        let files = vec![
            write_session(input.path(), "s1", USER_LINE, 40),
            write_session(input.path(), "s2", sidechain, 30),
            write_session(input.path(), "s3", USER_LINE, 20),
            write_session(input.path(), "s4", USER_LINE, 10),
        ];

        let mut run = ExportRun::new();
        let outcomes = export_sessions(&files, output.path(), &mut run).unwrap();

        assert_eq!(
            outcomes[1],
            SessionOutcome::Empty {
                index: 2,
                session_id: "s2".to_string()
            }
        );
        let mut written: Vec<String> = std::fs::read_dir(output.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        written.sort();
        assert_eq!(
            written,
            vec![
                "chatsession-1-fix-the-bug.md",
                "chatsession-3-fix-the-bug-1.md",
                "chatsession-4-fix-the-bug-2.md",
            ]
        );

        let doc = std::fs::read_to_string(output.path().join("chatsession-3-fix-the-bug-1.md")).unwrap();
        assert!(doc.starts_with("# Session 3: Fix the bug\n"));
        assert!(doc.contains("- **Session ID**: `s3`"));
    }

    #[test]
    fn test_missing_file_reported_unreadable() {
        let output = tempfile::tempdir().unwrap();
        let files = vec![PathBuf::from("/nonexistent/gone.jsonl")];
        let outcomes = export_sessions(&files, output.path(), &mut ExportRun::new()).unwrap();
        assert_eq!(
            outcomes,
            vec![SessionOutcome::Unreadable {
                index: 1,
                session_id: "gone".to_string()
            }]
        );
    }

    #[test]
    fn test_read_error_reported_unreadable_and_batch_continues() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let dir_path = input.path().join("broken.jsonl");
        std::fs::create_dir(&dir_path).unwrap();
        let files = vec![dir_path, write_session(input.path(), "ok", USER_LINE, 0)];

        let outcomes = export_sessions(&files, output.path(), &mut ExportRun::new()).unwrap();
        assert_eq!(
            outcomes[0],
            SessionOutcome::Unreadable {
                index: 1,
                session_id: "broken".to_string()
            }
        );
        assert!(matches!(outcomes[1], SessionOutcome::Written { index: 2, .. }));
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0f3c2a9e-1111"), "0f3c2a9e");
        assert_eq!(short_id("abc"), "abc");
    }
}
