use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ExportError;

pub const DEFAULT_OUTPUT_DIR: &str = "./sessions";
pub const SESSION_EXTENSION: &str = "jsonl";
const PROJECT_DIR_ENV: &str = "SESSION_EXPORT_PROJECT_DIR";

/// `~/.claude/projects`, where Claude Code keeps one directory per project.
pub fn projects_root() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".claude").join("projects"))
}

/// Claude Code names project directories after the cwd with `/` replaced by `-`.
pub fn escape_project_path(cwd: &Path) -> String {
    cwd.to_string_lossy()
        .replace('/', "-")
        .trim_start_matches('-')
        .to_string()
}

/// Find the project directory for `cwd` under `projects_root`.
/// Exact name first, then the first directory whose name contains the escaped cwd.
pub fn find_project_dir(cwd: &Path, projects_root: &Path) -> Option<PathBuf> {
    let escaped = escape_project_path(cwd);
    let candidate = projects_root.join(&escaped);
    debug!("looking for project dir: {}", candidate.display());
    if candidate.is_dir() {
        return Some(candidate);
    }

    let mut entries: Vec<PathBuf> = std::fs::read_dir(projects_root)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    entries.sort();

    let found = entries.into_iter().find(|p| {
        p.file_name()
            .is_some_and(|name| name.to_string_lossy().contains(&escaped))
    });
    if let Some(ref dir) = found {
        debug!("partial match found: {}", dir.display());
    }
    found
}

/// Resolve the session directory to export.
///
/// Priority:
/// 1. `--project-dir`
/// 2. `SESSION_EXPORT_PROJECT_DIR` env var
/// 3. Current working directory → matching directory under `~/.claude/projects`
pub fn resolve_project_dir(explicit: Option<&Path>) -> Result<PathBuf, ExportError> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => match std::env::var(PROJECT_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
            _ => std::env::current_dir()
                .ok()
                .zip(projects_root())
                .and_then(|(cwd, root)| find_project_dir(&cwd, &root)),
        },
    };

    candidate
        .filter(|dir| dir.is_dir())
        .ok_or(ExportError::ProjectDirNotFound)
}
