use std::path::{Path, PathBuf};

use tracing::debug;

use crate::caption;
use crate::error::ExportError;

const TRANSCRIPT_HTML_SUFFIX: &str = ".transcript.txt.html";

pub fn run(input: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    if !input.exists() {
        return Err(ExportError::InputNotFound(input.to_path_buf()).into());
    }

    let output = output.unwrap_or_else(|| default_output_path(input));
    debug!("input:  {}", input.display());
    debug!("output: {}", output.display());

    let html = std::fs::read_to_string(input)?;
    let segments = caption::parse_html_segments(&html);
    debug!("parsed {} segments from HTML", segments.len());
    if segments.is_empty() {
        return Err(ExportError::NoCaptionSegments(input.to_path_buf()).into());
    }

    std::fs::write(&output, caption::segments_to_srt(&segments))?;
    println!("OK: {} entries written to {}", segments.len(), output.display());
    Ok(())
}

/// `day2.transcript.txt.html` → `day2.transcript.srt`; anything else swaps its extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(TRANSCRIPT_HTML_SUFFIX) {
        Some(base) => input.with_file_name(format!("{base}.transcript.srt")),
        None => input.with_extension("srt"),
    }
}
