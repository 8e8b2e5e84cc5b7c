use std::path::PathBuf;

use thiserror::Error;

/// Fatal preconditions. Everything else is recovered from locally.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not find project directory. Use --project-dir.")]
    ProjectDirNotFound,
    #[error("{} not found", .0.display())]
    InputNotFound(PathBuf),
    #[error("No segments found in {}", .0.display())]
    NoCaptionSegments(PathBuf),
}
