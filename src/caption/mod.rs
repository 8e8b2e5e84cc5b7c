//! Meeting-transcript HTML to SRT subtitles.
//!
//! Each caption segment in the exported HTML carries its start offset in a
//! `data-timestamp` attribute (milliseconds). A cue ends where the next one
//! starts; the last cue is held for [`LAST_CUE_MS`].

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

pub const LAST_CUE_MS: u64 = 8000;

static SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<div\s+class="JnEIz[^"]*"[^>]*data-timestamp="(\d+)"[^>]*>.*?<div\s+class="wyBDIb"[^>]*>(.*?)</div></div>"#,
    )
    .unwrap()
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start_ms: u64,
    pub text: String,
}

/// Extract non-empty caption segments in document order.
pub fn parse_html_segments(html: &str) -> Vec<Segment> {
    SEGMENT_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let start_ms = match caps[1].parse::<u64>() {
                Ok(ms) => ms,
                Err(e) => {
                    debug!("skipping segment with timestamp {}: {e}", &caps[1]);
                    return None;
                }
            };
            let text = clean_text(&caps[2]);
            (!text.is_empty()).then_some(Segment { start_ms, text })
        })
        .collect()
}

fn clean_text(raw: &str) -> String {
    let text = TAG_RE
        .replace_all(raw, "")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    BLANK_LINES_RE.replace_all(&text, "\n").trim().to_string()
}

/// `HH:MM:SS,mmm`
pub fn srt_time(ms: u64) -> String {
    format!(
        "{:02}:{:02}:{:02},{:03}",
        ms / 3_600_000,
        (ms % 3_600_000) / 60_000,
        (ms % 60_000) / 1000,
        ms % 1000
    )
}

/// Every cue, including the last, is followed by a blank line.
pub fn segments_to_srt(segments: &[Segment]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        let end_ms = segments
            .get(i + 1)
            .map(|next| next.start_ms)
            .unwrap_or(segment.start_ms.saturating_add(LAST_CUE_MS));
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            srt_time(segment.start_ms),
            srt_time(end_ms),
            segment.text
        );
    }
    out
}
